pub mod connection;
pub mod diagnostics;
pub mod outcome;
pub mod query;
pub mod record;

pub use connection::{CaseTypeOption, ConnectionReport, PageLanguage, SearchCapability};
pub use diagnostics::{
    AttemptOutcome, ButtonSummary, Diagnostics, EndpointProbeResult, FormSummary, InputSummary,
    OptionSummary, PageAnalysis, PageInfo, SelectSummary, SubmissionAttempt,
};
pub use outcome::{ObstacleElement, ObstacleKind, ObstacleReport, Outcome};
pub use query::CaseQuery;
pub use record::{CaseRecord, Confidence, HeuristicEvidence, OrderBook, OrderEntry, Parties, MAX_ORDERS};
