use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::MAX_ORDERS;
use crate::fetcher::Method;

/// The field that marks a form as submitted, e.g. `btnSearch=Search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMarker {
    pub field: String,
    pub value: String,
}

/// One guess at the remote form's field names.
///
/// Maps the three query attributes plus a submit marker onto parameter
/// names. `extra` holds fixed fields the convention expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldScheme {
    pub name: String,
    pub case_type: String,
    pub case_number: String,
    pub year: String,
    pub submit: SubmitMarker,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl FieldScheme {
    fn new(
        name: &str,
        fields: [&str; 3],
        submit: (&str, &str),
        extra: &[(&str, &str)],
    ) -> Self {
        Self {
            name: name.to_string(),
            case_type: fields[0].to_string(),
            case_number: fields[1].to_string(),
            year: fields[2].to_string(),
            submit: SubmitMarker {
                field: submit.0.to_string(),
                value: submit.1.to_string(),
            },
            extra: extra
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// One {method, path suffix} combination tried per parameter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSpec {
    pub method: Method,
    #[serde(default)]
    pub suffix: String,
}

impl AttemptSpec {
    fn new(method: Method, suffix: &str) -> Self {
        Self {
            method,
            suffix: suffix.to_string(),
        }
    }

    /// Target URL for this attempt against `base`
    pub fn target(&self, base: &str) -> String {
        if self.suffix.is_empty() {
            base.to_string()
        } else {
            format!("{}{}", base.trim_end_matches('/'), self.suffix)
        }
    }
}

/// Configuration for the case lookup engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Court name written into every record
    pub court_name: String,

    /// Lowercase term that marks a heading as the case title (default: "wardha")
    pub court_indicator: String,

    /// Site root used to resolve relative document links
    pub base_url: String,

    /// Entry points probed in order; the first valid one is used
    pub candidate_urls: Vec<String>,

    /// Terms counted (case-insensitively) to decide a page is a court page
    pub signal_terms: Vec<String>,

    /// Minimum number of signal terms a candidate must contain (default: 3)
    pub min_signal_score: usize,

    /// Minimum candidate body size in bytes (default: 1000)
    pub min_body_bytes: usize,

    /// Timeout for candidate probes in seconds (default: 15)
    pub probe_timeout_secs: u64,

    /// Timeout for loading the search page in seconds (default: 20)
    pub page_timeout_secs: u64,

    /// Timeout for each submission in seconds (default: 30)
    pub submit_timeout_secs: u64,

    /// Pause between parameter sets in milliseconds (default: 2000)
    pub pause_between_strategies_ms: u64,

    /// Phrases that mean the site asserts the case does not exist
    pub not_found_phrases: Vec<String>,

    /// Hidden fields collected first, before any other hidden input
    pub hidden_field_names: Vec<String>,

    /// File extensions treated as case documents
    pub document_extensions: Vec<String>,

    /// Description used when a document link has no text
    pub document_placeholder: String,

    /// Lowercase terms naming the court's locality, used as fallback evidence
    pub locality_terms: Vec<String>,

    /// Maximum orders kept on a record (default: 10)
    pub max_orders: usize,

    /// Field-name schemes, most plausible first
    pub schemes: Vec<FieldScheme>,

    /// Method/suffix combinations tried for each scheme, in order
    pub attempts: Vec<AttemptSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let base_url = "https://wardha.dcourts.gov.in".to_string();
        Self {
            court_name: "District and Sessions Court, Wardha".to_string(),
            court_indicator: "wardha".to_string(),
            candidate_urls: vec![
                format!("{}/case-status-search-by-case-number/", base_url),
                format!("{}/case-status-search-by-case-type/", base_url),
                format!("{}/case-status/", base_url),
                "https://districts.ecourts.gov.in/wardha/case-status".to_string(),
                "https://districts.ecourts.gov.in/wardha".to_string(),
                "https://services.ecourts.gov.in/ecourtindia_v6/".to_string(),
                "https://ecourts.gov.in/ecourts_home/static/district_court.php?state_cd=27&dist_cd=664"
                    .to_string(),
                format!("{}/", base_url),
                "https://hcservices.ecourts.gov.in/hcservices/Client/".to_string(),
                "https://njdg.ecourts.gov.in/njdgnew/index.php".to_string(),
            ],
            base_url,
            signal_terms: strings(&[
                "case",
                "court",
                "wardha",
                "district",
                "ecourts",
                "case status",
                "case number",
                "filing",
                "petitioner",
                "maharashtra",
                "judicial",
                "search",
            ]),
            min_signal_score: 3,
            min_body_bytes: 1000,
            probe_timeout_secs: 15,
            page_timeout_secs: 20,
            submit_timeout_secs: 30,
            pause_between_strategies_ms: 2000,
            not_found_phrases: strings(&[
                "no record found",
                "record not found",
                "invalid case",
                "case not found",
                "no data available",
                "no records found",
                "invalid input",
                "please enter valid",
                "not exist",
                "error occurred",
                "invalid case number",
                "case does not exist",
                "रेकॉर्ड आढळला नाही",
                "केस सापडला नाही",
                "अवैध केस",
                "कोणताही डेटा उपलब्ध नाही",
                "कृपया वैध माहिती टाका",
            ]),
            hidden_field_names: strings(&[
                "__VIEWSTATE",
                "__VIEWSTATEGENERATOR",
                "__EVENTVALIDATION",
                "__EVENTTARGET",
                "__EVENTARGUMENT",
                "__LASTFOCUS",
                "__VIEWSTATEENCRYPTED",
                "__PREVIOUSPAGE",
                "__SCROLLPOSITIONX",
                "__SCROLLPOSITIONY",
                "javax.faces.ViewState",
                "authenticity_token",
                "csrf_token",
                "_token",
                "session_id",
                "form_token",
            ]),
            document_extensions: strings(&["pdf", "doc", "docx"]),
            document_placeholder: "Court Document".to_string(),
            locality_terms: strings(&["wardha", "maharashtra", "district court", "जिल्हा न्यायालय"]),
            max_orders: MAX_ORDERS,
            schemes: default_schemes(),
            attempts: vec![
                AttemptSpec::new(Method::Post, ""),
                AttemptSpec::new(Method::Post, "/case-status-result"),
                AttemptSpec::new(Method::Post, "/search"),
                AttemptSpec::new(Method::Get, ""),
                AttemptSpec::new(Method::Get, "/case-status"),
            ],
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_schemes() -> Vec<FieldScheme> {
    vec![
        FieldScheme::new(
            "ecourts",
            ["case_type", "case_no", "case_year"],
            ("submit", "Submit"),
            &[("court_code", "wardha")],
        ),
        FieldScheme::new(
            "compact",
            ["casetype", "caseno", "caseyear"],
            ("Submit", "Search"),
            &[("district", "Wardha")],
        ),
        FieldScheme::new(
            "aspnet_text",
            ["txtCaseType", "txtCaseNo", "txtYear"],
            ("btnSearch", "Search"),
            &[("ddlDistrict", "Wardha")],
        ),
        FieldScheme::new(
            "aspnet_dropdown",
            ["ddlCaseType", "txtCaseNumber", "ddlYear"],
            ("Button1", "Submit"),
            &[("ddlCourt", "District Court Wardha")],
        ),
        FieldScheme::new(
            "state_codes",
            ["case_type_name", "case_number", "filing_year"],
            ("search_button", "Get Case Status"),
            &[("state_code", "27"), ("district_code", "664")],
        ),
        FieldScheme::new(
            "simple",
            ["type", "number", "year"],
            ("action", "search"),
            &[],
        ),
        FieldScheme::new(
            "api_style",
            ["caseType", "caseNumber", "filingYear"],
            ("searchType", "case_number"),
            &[("format", "html")],
        ),
    ]
}

impl EngineConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn pause_between_strategies(&self) -> Duration {
        Duration::from_millis(self.pause_between_strategies_ms)
    }

    /// A config with no pacing, for driving the engine against local fixtures
    pub fn unpaced() -> Self {
        Self {
            pause_between_strategies_ms: 0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = EngineConfig::default();
        assert_eq!(config.candidate_urls.len(), 10);
        assert_eq!(config.min_signal_score, 3);
        assert_eq!(config.min_body_bytes, 1000);
        assert_eq!(config.schemes.len(), 7);
        assert_eq!(config.attempts.len(), 5);
        assert_eq!(config.max_orders, 10);
        assert_eq!(config.schemes[0].case_number, "case_no");
        assert_eq!(config.attempts[0], AttemptSpec::new(Method::Post, ""));
    }

    #[test]
    fn test_timeouts() {
        let config = EngineConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(15));
        assert_eq!(config.page_timeout(), Duration::from_secs(20));
        assert_eq!(config.submit_timeout(), Duration::from_secs(30));
        assert_eq!(config.pause_between_strategies(), Duration::from_secs(2));
        assert_eq!(EngineConfig::unpaced().pause_between_strategies(), Duration::ZERO);
    }

    #[test]
    fn test_attempt_target_joins_suffix() {
        let post = AttemptSpec::new(Method::Post, "/search");
        assert_eq!(post.target("https://example.com/status/"), "https://example.com/status/search");
        assert_eq!(post.target("https://example.com/status"), "https://example.com/status/search");

        let bare = AttemptSpec::new(Method::Get, "");
        assert_eq!(bare.target("https://example.com/status/"), "https://example.com/status/");
    }
}
