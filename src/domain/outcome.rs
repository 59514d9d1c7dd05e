use serde::{Deserialize, Serialize};

use crate::domain::{CaseRecord, Diagnostics};

/// Kind of verification challenge found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Image,
    Input,
    Div,
    Recaptcha,
    RecaptchaIframe,
    RecaptchaScript,
    InputPlaceholder,
    TextBased,
}

/// A structural challenge signal and how many elements matched it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleElement {
    pub kind: ObstacleKind,
    pub selector: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleReport {
    pub blocked: bool,
    /// First matching kind; `TextBased` only when no structural kind matched
    pub kind: Option<ObstacleKind>,
    pub elements: Vec<ObstacleElement>,
}

/// The engine's only externally observed result.
///
/// Every variant carries the diagnostic trail accumulated up to the point
/// the query ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Found {
        record: CaseRecord,
        diagnostics: Diagnostics,
    },
    NotFound {
        reason: String,
        strategies_attempted: usize,
        diagnostics: Diagnostics,
    },
    Obstructed {
        captcha: ObstacleReport,
        diagnostics: Diagnostics,
    },
    Unreachable {
        details: String,
        diagnostics: Diagnostics,
    },
    Error {
        details: String,
        diagnostics: Diagnostics,
    },
}

impl Outcome {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Outcome::Found { diagnostics, .. }
            | Outcome::NotFound { diagnostics, .. }
            | Outcome::Obstructed { diagnostics, .. }
            | Outcome::Unreachable { diagnostics, .. }
            | Outcome::Error { diagnostics, .. } => diagnostics,
        }
    }

    pub fn record(&self) -> Option<&CaseRecord> {
        match self {
            Outcome::Found { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found { .. } => "found",
            Outcome::NotFound { .. } => "not_found",
            Outcome::Obstructed { .. } => "obstructed",
            Outcome::Unreachable { .. } => "unreachable",
            Outcome::Error { .. } => "error",
        }
    }
}
