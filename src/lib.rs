//! # Docket
//!
//! Case-status lookups against a district court website whose entry point,
//! form layout and result markup are not known in advance.
//!
//! ## Architecture
//!
//! A lookup is a strictly sequential pipeline:
//!
//! ```text
//! EndpointResolver → StrategyGenerator → SubmissionExecutor → RecordExtractor
//! ```
//!
//! - [`engine`]: endpoint probing, submission strategies, response gating
//!   and record extraction
//! - [`fetcher`]: the outbound HTTP capability the engine runs on
//! - [`domain`]: queries, records, outcomes and the diagnostic trail
//!
//! ## Quick Start
//!
//! ```bash
//! # Check the court site is reachable
//! docket probe
//!
//! # List case types offered by the search form
//! docket case-types
//!
//! # Look up a case, giving up after two minutes
//! docket search RCS 123 2021 --deadline-secs 120
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct holds the loaded configuration
/// and builds a fresh engine per lookup.
pub mod app;

/// Command-line interface using clap.
///
/// - `search <type> <number> <year>` - Look up a case
/// - `probe` - Test the connection to the court site
/// - `case-types` - List case types from the live form
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/docket/config.toml`, or the file given with
/// `--config`.
pub mod config;

/// Core domain models.
///
/// - [`CaseQuery`](domain::CaseQuery): Validated lookup request
/// - [`CaseRecord`](domain::CaseRecord): Normalized case data
/// - [`Outcome`](domain::Outcome): The result of every lookup
/// - [`Diagnostics`](domain::Diagnostics): Provenance trail
pub mod domain;

/// The case lookup engine.
pub mod engine;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async transport trait
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;
