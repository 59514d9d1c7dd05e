//! The case lookup engine.
//!
//! A query runs strictly in sequence:
//!
//! 1. [`EndpointResolver`] probes candidate URLs and keeps the first genuine
//!    search page.
//! 2. The search page is loaded, summarized and checked for challenges.
//! 3. [`StrategyGenerator`] turns the query and the page's hidden fields into
//!    an ordered list of parameter sets.
//! 4. [`SubmissionExecutor`] tries each set against each method/path pair,
//!    gating every response through [`ObstacleDetector`] and
//!    [`ResponseClassifier`] before [`RecordExtractor`] sees it.
//!
//! Every exit path yields an [`Outcome`] carrying the diagnostic trail.
//! A [`CaseEngine`] owns its HTTP session and endpoint cache, so concurrent
//! queries must each use their own instance.

pub mod classifier;
pub mod config;
pub mod dates;
pub mod executor;
pub mod extractor;
pub mod fallback;
pub(crate) mod html;
pub mod obstacle;
pub mod orders;
pub mod page;
pub mod resolver;
pub mod strategy;

use std::sync::Arc;

use scraper::Html;
use tracing::{error, info, warn};

use crate::app::{DocketError, Result};
use crate::domain::{
    CaseQuery, CaseTypeOption, ConnectionReport, Diagnostics, ObstacleReport, Outcome, PageAnalysis,
    PageInfo, SearchCapability,
};
use crate::fetcher::{FetchRequest, Fetcher, FetcherConfig, HttpFetcher};

pub use classifier::{Classification, ResponseClassifier};
pub use config::{AttemptSpec, EngineConfig, FieldScheme, SubmitMarker};
pub use dates::DateNormalizer;
pub use executor::SubmissionExecutor;
pub use extractor::{RecordExtractor, StructuredExtractor};
pub use fallback::HeuristicFallback;
pub use obstacle::ObstacleDetector;
pub use resolver::EndpointResolver;
pub use strategy::{HiddenFields, ParameterSet, StrategyGenerator};

/// What the search page allows before any submission is made
enum SearchPage {
    Obstructed {
        analysis: PageAnalysis,
        report: ObstacleReport,
    },
    Ready {
        analysis: PageAnalysis,
        hidden: HiddenFields,
        sets: Vec<ParameterSet>,
    },
}

pub struct CaseEngine {
    config: EngineConfig,
    fetcher: Arc<dyn Fetcher>,
    resolver: EndpointResolver,
    generator: StrategyGenerator,
    executor: SubmissionExecutor,
}

impl CaseEngine {
    /// An engine with its own HTTP session
    pub fn new(config: EngineConfig, fetcher_config: FetcherConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(fetcher_config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            resolver: EndpointResolver::new(fetcher.clone(), config.clone()),
            generator: StrategyGenerator::new(config.clone()),
            executor: SubmissionExecutor::new(fetcher.clone(), config.clone()),
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look up one case. Never fails: every failure becomes an [`Outcome`].
    pub async fn fetch_case(&mut self, query: &CaseQuery) -> Outcome {
        info!("Fetching case {} from {}", query, self.config.court_name);
        let mut diagnostics = Diagnostics::new(query, &self.config.court_name);

        let Some(url) = self.resolve(&mut diagnostics).await else {
            return Outcome::Unreachable {
                details: format!(
                    "Could not find a working {} URL. The website may be down or restructured.",
                    self.config.court_name
                ),
                diagnostics,
            };
        };

        let request = FetchRequest::get(&url, self.config.page_timeout());
        let response = match self.fetcher.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to load search page {}: {}", url, e);
                return Outcome::Unreachable {
                    details: format!("Failed to access search page: {}", e),
                    diagnostics,
                };
            }
        };
        diagnostics.search_page = Some(PageInfo::from(&response));

        if !response.is_ok() {
            let details = if response.status == 404 {
                "Search page not found. The site structure may have changed.".to_string()
            } else {
                format!("HTTP error {}", response.status)
            };
            warn!("Search page {} returned HTTP {}", url, response.status);
            return Outcome::Unreachable {
                details,
                diagnostics,
            };
        }
        diagnostics.step("Search page loaded");

        match self.inspect_search_page(&response.text(), query) {
            SearchPage::Obstructed { analysis, report } => {
                warn!("Challenge on search page {}", url);
                diagnostics.page_analysis = Some(analysis);
                diagnostics.step("Challenge detected on search page");
                Outcome::Obstructed {
                    captcha: report,
                    diagnostics,
                }
            }
            SearchPage::Ready {
                analysis,
                hidden,
                sets,
            } => {
                diagnostics.page_analysis = Some(analysis);
                diagnostics.hidden_fields = hidden.names();
                diagnostics.strategies_generated = sets.len();

                if sets.is_empty() || self.config.attempts.is_empty() {
                    let e = DocketError::Engine("no submission strategies configured".into());
                    return Outcome::Error {
                        details: e.to_string(),
                        diagnostics,
                    };
                }

                diagnostics.step(format!("Generated {} submission strategies", sets.len()));
                self.executor.submit(&url, &sets, query, diagnostics).await
            }
        }
    }

    /// Resolve the endpoint and report what the search page offers
    pub async fn test_connection(&mut self) -> ConnectionReport {
        let mut report = ConnectionReport::new(&self.config.court_name);
        let candidates = self.config.candidate_urls.clone();
        let cached = self.resolver.resolved().is_some();
        let resolved = self.resolver.resolve(&candidates).await;
        if !cached {
            report.probes = self.resolver.probes().to_vec();
        }

        let Some(url) = resolved else {
            report.message = format!("{} website is not accessible", self.config.court_name);
            report.tested_urls = candidates;
            return report;
        };

        report.reachable = true;
        report.message = format!("{} website is accessible", self.config.court_name);
        report.working_url = Some(url.clone());

        let request = FetchRequest::get(&url, self.config.probe_timeout());
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                let document = Html::parse_document(&response.text());
                let forms = page::analyze_page(&document).forms.len();
                let captcha = ObstacleDetector::new().detect(&document);

                report.forms_found = Some(forms);
                report.captcha_required = Some(captcha.blocked);
                report.captcha_kind = captcha.kind;
                report.search_capability = Some(match (forms > 0, captcha.blocked) {
                    (true, false) => SearchCapability::Available,
                    (true, true) => SearchCapability::AvailableWithCaptcha,
                    (false, _) => SearchCapability::FormsNotFound,
                });
                report.language = Some(page::detect_language(&document));
            }
            Err(e) => {
                report.search_capability = Some(SearchCapability::Error(e.to_string()));
            }
        }

        report
    }

    /// Case types offered by the live search form; empty on any failure
    pub async fn supported_case_types(&mut self) -> Vec<CaseTypeOption> {
        let candidates = self.config.candidate_urls.clone();
        let Some(url) = self.resolver.resolve(&candidates).await else {
            return Vec::new();
        };

        let request = FetchRequest::get(&url, self.config.probe_timeout());
        match self.fetcher.fetch(&request).await {
            Ok(response) if response.is_ok() => {
                page::case_type_options(&Html::parse_document(&response.text()))
            }
            Ok(response) => {
                warn!("Case types unavailable: HTTP {}", response.status);
                Vec::new()
            }
            Err(e) => {
                warn!("Case types unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn resolve(&mut self, diagnostics: &mut Diagnostics) -> Option<String> {
        if let Some(url) = self.resolver.resolved() {
            let url = url.to_string();
            diagnostics.resolved_url = Some(url.clone());
            diagnostics.step(format!("Endpoint {} reused from cache", url));
            return Some(url);
        }

        let candidates = self.config.candidate_urls.clone();
        let resolved = self.resolver.resolve(&candidates).await;
        diagnostics.probes = self.resolver.probes().to_vec();
        diagnostics.resolved_url = resolved.clone();
        match &resolved {
            Some(url) => diagnostics.step(format!("Resolved endpoint {}", url)),
            None => diagnostics.step("No candidate URL passed validation"),
        }
        resolved
    }

    fn inspect_search_page(&self, body: &str, query: &CaseQuery) -> SearchPage {
        let document = Html::parse_document(body);
        let analysis = page::analyze_page(&document);

        let report = ObstacleDetector::new().detect(&document);
        if report.blocked {
            return SearchPage::Obstructed { analysis, report };
        }

        let hidden = self.generator.hidden_fields(&document);
        let sets = self.generator.generate_with(&hidden, query);
        SearchPage::Ready {
            analysis,
            hidden,
            sets,
        }
    }
}
