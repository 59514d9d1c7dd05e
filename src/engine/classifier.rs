use scraper::Html;

use crate::engine::html::visible_text;

/// Whether a response page asserts the case does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The page contains one of the configured "no record" phrases
    DefinitelyNotFound { phrase: String },
    Unknown,
}

impl Classification {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Classification::DefinitelyNotFound { .. })
    }
}

/// Scans visible text for bilingual "no record" phrases.
pub struct ResponseClassifier {
    phrases: Vec<String>,
}

impl ResponseClassifier {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, document: &Html) -> Classification {
        self.classify_text(&visible_text(document))
    }

    pub fn classify_text(&self, text: &str) -> Classification {
        let text = text.to_lowercase();
        match self.phrases.iter().find(|phrase| text.contains(phrase.as_str())) {
            Some(phrase) => Classification::DefinitelyNotFound {
                phrase: phrase.clone(),
            },
            None => Classification::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::new(&EngineConfig::default().not_found_phrases)
    }

    #[test]
    fn test_english_phrase_any_case() {
        let document = Html::parse_document("<html><body><div>NO RECORD FOUND</div></body></html>");
        assert_eq!(
            classifier().classify(&document),
            Classification::DefinitelyNotFound {
                phrase: "no record found".into()
            }
        );
    }

    #[test]
    fn test_phrase_split_across_elements() {
        let document = Html::parse_document("<html><body><span>Case</span>\n<b>not found</b></body></html>");
        assert!(classifier().classify(&document).is_not_found());
    }

    #[test]
    fn test_marathi_phrase() {
        let document = Html::parse_document("<html><body><p>रेकॉर्ड आढळला नाही</p></body></html>");
        assert!(classifier().classify(&document).is_not_found());
    }

    #[test]
    fn test_case_details_page_is_unknown() {
        let document = Html::parse_document(
            "<html><body><table><tr><td>Petitioner</td><td>Ramesh Kumar</td></tr></table></body></html>",
        );
        assert_eq!(classifier().classify(&document), Classification::Unknown);
    }

    #[test]
    fn test_phrase_in_script_is_ignored() {
        let document = Html::parse_document(
            "<html><head><script>var msg = 'No record found';</script></head><body>Details</body></html>",
        );
        assert_eq!(classifier().classify(&document), Classification::Unknown);
    }
}
