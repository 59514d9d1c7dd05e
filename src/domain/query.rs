use std::fmt;

use serde::{Deserialize, Serialize};

/// A case lookup request. Validated by the caller before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i32,
}

impl CaseQuery {
    pub fn new(case_type: impl Into<String>, case_number: impl Into<String>, filing_year: i32) -> Self {
        Self {
            case_type: case_type.into(),
            case_number: case_number.into(),
            filing_year,
        }
    }

    pub fn year(&self) -> String {
        self.filing_year.to_string()
    }

    /// Whether `text` mentions both the case number and the filing year.
    ///
    /// Case-insensitive. An empty case number never matches.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        let number = self.case_number.trim().to_lowercase();
        if number.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        text.contains(&number) && text.contains(&self.year())
    }
}

impl fmt::Display for CaseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.case_type, self.case_number, self.filing_year)
    }
}
