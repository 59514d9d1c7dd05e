use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CaseQuery;
use crate::fetcher::{FetchResponse, Method};

/// Result of probing one candidate entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointProbeResult {
    pub url: String,
    pub reachable: bool,
    pub status: Option<u16>,
    pub content_length: usize,
    pub content_type: Option<String>,
    /// Number of content signals found in the body
    pub validity_score: usize,
    pub selected: bool,
    pub error: Option<String>,
}

/// How a single submission attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    ParseFailed,
    HttpFailed,
    Exception,
    Obstructed,
}

/// One {strategy, method, suffix} combination tried against the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAttempt {
    /// 1-based index into the parameter-set list
    pub strategy_index: usize,
    pub strategy_name: String,
    pub method: Method,
    pub endpoint_suffix: String,
    pub outcome: AttemptOutcome,
    pub status: Option<u16>,
    pub detail: Option<String>,
    /// SHA-256 of the response body, hex encoded
    pub response_digest: Option<String>,
    pub at: DateTime<Utc>,
}

/// Summary of a fetched page's HTTP metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub status: u16,
    pub content_length: usize,
    pub content_type: Option<String>,
    pub final_url: String,
}

impl From<&FetchResponse> for PageInfo {
    fn from(response: &FetchResponse) -> Self {
        Self {
            status: response.status,
            content_length: response.body.len(),
            content_type: response.content_type.clone(),
            final_url: response.final_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSummary {
    pub name: Option<String>,
    pub input_type: String,
    pub value: String,
    pub id: Option<String>,
    pub placeholder: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSummary {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSummary {
    pub name: Option<String>,
    pub id: Option<String>,
    pub options_count: usize,
    pub sample_options: Vec<OptionSummary>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSummary {
    pub button_type: String,
    pub name: Option<String>,
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub index: usize,
    pub action: String,
    pub method: String,
    pub id: String,
    pub classes: Vec<String>,
    pub inputs: Vec<InputSummary>,
    pub selects: Vec<SelectSummary>,
    pub buttons: Vec<ButtonSummary>,
}

/// Structure of the search page as first seen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub title: Option<String>,
    pub language: Option<String>,
    pub forms: Vec<FormSummary>,
}

/// Provenance trail for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub query: CaseQuery,
    pub court: String,
    pub started_at: DateTime<Utc>,
    pub probes: Vec<EndpointProbeResult>,
    pub resolved_url: Option<String>,
    pub search_page: Option<PageInfo>,
    pub page_analysis: Option<PageAnalysis>,
    pub hidden_fields: Vec<String>,
    pub strategies_generated: usize,
    pub attempts: Vec<SubmissionAttempt>,
    pub steps: Vec<String>,
}

impl Diagnostics {
    pub fn new(query: &CaseQuery, court: &str) -> Self {
        Self {
            query: query.clone(),
            court: court.to_string(),
            started_at: Utc::now(),
            probes: Vec::new(),
            resolved_url: None,
            search_page: None,
            page_analysis: None,
            hidden_fields: Vec::new(),
            strategies_generated: 0,
            attempts: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn step(&mut self, note: impl Into<String>) {
        self.steps.push(note.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_from_response() {
        let response = FetchResponse {
            status: 200,
            final_url: "https://example.com/".into(),
            content_type: Some("text/html".into()),
            body: vec![b'x'; 42],
        };
        let info = PageInfo::from(&response);
        assert_eq!(info.content_length, 42);
        assert_eq!(info.status, 200);
    }
}
