use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EndpointProbeResult, ObstacleKind};

/// Whether the search page can be used for automated lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCapability {
    Available,
    AvailableWithCaptcha,
    FormsNotFound,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLanguage {
    English,
    /// Marathi court terms appear alongside English
    Bilingual,
}

/// Result of a connectivity check against the court site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub reachable: bool,
    pub court: String,
    pub working_url: Option<String>,
    pub message: String,
    pub checked_at: DateTime<Utc>,
    pub forms_found: Option<usize>,
    pub captcha_required: Option<bool>,
    pub captcha_kind: Option<ObstacleKind>,
    pub search_capability: Option<SearchCapability>,
    pub language: Option<PageLanguage>,
    pub probes: Vec<EndpointProbeResult>,
    /// Candidates tried, reported only when none resolved
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tested_urls: Vec<String>,
}

impl ConnectionReport {
    pub fn new(court: &str) -> Self {
        Self {
            reachable: false,
            court: court.to_string(),
            working_url: None,
            message: String::new(),
            checked_at: Utc::now(),
            forms_found: None,
            captcha_required: None,
            captcha_kind: None,
            search_capability: None,
            language: None,
            probes: Vec::new(),
            tested_urls: Vec::new(),
        }
    }
}

/// A case type offered by the live search form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTypeOption {
    pub value: String,
    pub label: String,
}
