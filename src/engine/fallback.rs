use scraper::Html;
use tracing::info;

use crate::domain::{CaseQuery, CaseRecord, Confidence, HeuristicEvidence};
use crate::engine::dates::date_tokens;
use crate::engine::html::visible_text;
use crate::engine::EngineConfig;

const MIN_TEXT_CHARS: usize = 500;
const MAX_EVIDENCE_DATES: usize = 5;

const LEGAL_TERMS: [&str; 17] = [
    "petitioner",
    "respondent",
    "plaintiff",
    "defendant",
    "hearing",
    "order",
    "judgment",
    "court",
    "case",
    "filing",
    "status",
    "अर्जदार",
    "प्रतिवादी",
    "सुनावणी",
    "आदेश",
    "न्यायालय",
    "केस",
];

pub const PLACEHOLDER_STATUS: &str = "Case found but requires detailed parsing";
pub const PLACEHOLDER_STAGE: &str = "Information extraction in progress";
pub const PLACEHOLDER_NOTE: &str =
    "Case located by pattern matching only; verify the details manually on the court website";

/// Second extraction stage: confirms the page mentions the case and returns
/// a low-confidence placeholder record when it does.
///
/// Only invoked after structured extraction produced nothing. The record it
/// returns never carries parties or a filing date.
pub struct HeuristicFallback<'a> {
    config: &'a EngineConfig,
}

impl<'a> HeuristicFallback<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, document: &Html, query: &CaseQuery) -> Option<CaseRecord> {
        let text = visible_text(document).to_lowercase();
        if text.chars().count() <= MIN_TEXT_CHARS || !query.is_mentioned_in(&text) {
            return None;
        }

        let evidence = self.evidence(&text);
        if evidence.is_empty() {
            return None;
        }

        info!("Falling back to pattern matching for {}", query);

        let mut record = CaseRecord::new(query, &self.config.court_name);
        record.status = Some(PLACEHOLDER_STATUS.to_string());
        record.stage = Some(PLACEHOLDER_STAGE.to_string());
        record.notes = Some(PLACEHOLDER_NOTE.to_string());
        record.confidence = Confidence::Low;
        record.evidence = Some(evidence);
        Some(record)
    }

    fn evidence(&self, text: &str) -> HeuristicEvidence {
        let mut dates: Vec<String> = Vec::new();
        for token in date_tokens(text) {
            if dates.len() == MAX_EVIDENCE_DATES {
                break;
            }
            if !dates.iter().any(|d| d == token) {
                dates.push(token.to_string());
            }
        }

        HeuristicEvidence {
            dates,
            legal_terms: present(text, LEGAL_TERMS.iter().copied()),
            locality_terms: present(text, self.config.locality_terms.iter().map(String::as_str)),
        }
    }
}

fn present<'t>(text: &str, terms: impl Iterator<Item = &'t str>) -> Vec<String> {
    terms
        .filter(|term| text.contains(&term.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        let padding = "<p>This portal provides information about matters listed before the court.</p>"
            .repeat(8);
        Html::parse_document(&format!("<html><body>{}{}</body></html>", body, padding))
    }

    #[test]
    fn test_placeholder_is_flagged_low_confidence() {
        let config = EngineConfig::default();
        let query = CaseQuery::new("RCS", "123", 2021);
        let document = page(
            "<div>Case 123/2021 listed on 10-01-2022 and 10-01-2022, next 15-02-2022. \
             Wardha district court. सुनावणी pending.</div>",
        );

        let record = HeuristicFallback::new(&config).extract(&document, &query).unwrap();

        assert!(record.requires_verification());
        assert_eq!(record.status.as_deref(), Some(PLACEHOLDER_STATUS));
        assert!(record.parties.is_empty());
        assert_eq!(record.filing_date, None);
        assert!(record.notes.is_some());

        let evidence = record.evidence.unwrap();
        assert_eq!(evidence.dates, vec!["10-01-2022", "15-02-2022"]);
        assert!(evidence.legal_terms.contains(&"सुनावणी".to_string()));
        assert!(evidence.legal_terms.contains(&"court".to_string()));
        assert!(evidence.locality_terms.contains(&"wardha".to_string()));
    }

    #[test]
    fn test_requires_number_and_year() {
        let config = EngineConfig::default();
        let query = CaseQuery::new("RCS", "123", 2021);
        let document = page("<div>Case 123 of an unknown year</div>");
        assert!(HeuristicFallback::new(&config).extract(&document, &query).is_none());
    }

    #[test]
    fn test_mention_without_evidence_rejected() {
        let config = EngineConfig::default();
        let query = CaseQuery::new("RCS", "123", 2021);
        let filler = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.</p>"
            .repeat(8);
        let document = Html::parse_document(&format!(
            "<html><body><div>Item 123 from 2021</div>{}</body></html>",
            filler
        ));
        assert!(HeuristicFallback::new(&config).extract(&document, &query).is_none());
    }

    #[test]
    fn test_short_pages_rejected() {
        let config = EngineConfig::default();
        let query = CaseQuery::new("RCS", "123", 2021);
        let document = Html::parse_document("<html><body>Case 123/2021</body></html>");
        assert!(HeuristicFallback::new(&config).extract(&document, &query).is_none());
    }

    #[test]
    fn test_at_most_five_dates() {
        let config = EngineConfig::default();
        let query = CaseQuery::new("RCS", "7", 2020);
        let dates: String = (1..=8).map(|d| format!(" 0{}-01-2020", d)).collect();
        let document = page(&format!("<div>Case 7/2020 {}</div>", dates));

        let record = HeuristicFallback::new(&config).extract(&document, &query).unwrap();
        assert_eq!(record.evidence.unwrap().dates.len(), 5);
    }
}
