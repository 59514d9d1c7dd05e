use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CaseQuery;

/// Maximum number of order entries kept on a record
pub const MAX_ORDERS: usize = 10;

/// Parties to a case, in discovery order with duplicates suppressed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    pub petitioners: Vec<String>,
    pub respondents: Vec<String>,
}

impl Parties {
    /// Returns false if the name was already present
    pub fn add_petitioner(&mut self, name: &str) -> bool {
        push_unique(&mut self.petitioners, name)
    }

    /// Returns false if the name was already present
    pub fn add_respondent(&mut self, name: &str) -> bool {
        push_unique(&mut self.respondents, name)
    }

    pub fn is_empty(&self) -> bool {
        self.petitioners.is_empty() && self.respondents.is_empty()
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) -> bool {
    if names.iter().any(|n| n == name) {
        return false;
    }
    names.push(name.to_string());
    true
}

/// An order, judgment or other document attached to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub description: String,
    /// Absolute URL of the document, when one was linked
    pub document_link: Option<String>,
    /// Canonical `YYYY-MM-DD` when parsable, otherwise the raw token
    pub date: Option<String>,
}

/// Ordered collection of orders with no two entries sharing a description.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    entries: Vec<OrderEntry>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, description: &str) -> bool {
        self.entries.iter().any(|e| e.description == description)
    }

    /// Returns false (and drops the entry) if the description was already seen
    pub fn push(&mut self, entry: OrderEntry) -> bool {
        if self.contains(&entry.description) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First-seen entries, at most `limit` of them
    pub fn into_entries(mut self, limit: usize) -> Vec<OrderEntry> {
        self.entries.truncate(limit);
        self.entries
    }
}

/// How a record was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Fields recovered from tables or labeled containers
    Structured,
    /// The page only mentions the case; details need manual verification
    Low,
}

/// Patterns that justified a low-confidence record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicEvidence {
    pub dates: Vec<String>,
    pub legal_terms: Vec<String>,
    pub locality_terms: Vec<String>,
}

impl HeuristicEvidence {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.legal_terms.is_empty() && self.locality_terms.is_empty()
    }
}

/// Normalized case record produced by extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub title: String,
    pub court_name: String,
    pub parties: Parties,
    pub filing_date: Option<String>,
    pub next_hearing_date: Option<String>,
    pub status: Option<String>,
    pub stage: Option<String>,
    pub judge: Option<String>,
    pub orders: Vec<OrderEntry>,
    pub last_updated: DateTime<Utc>,
    pub notes: Option<String>,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<HeuristicEvidence>,
}

impl CaseRecord {
    /// Empty structured record titled after the query
    pub fn new(query: &CaseQuery, court_name: &str) -> Self {
        Self {
            title: query.to_string(),
            court_name: court_name.to_string(),
            parties: Parties::default(),
            filing_date: None,
            next_hearing_date: None,
            status: None,
            stage: None,
            judge: None,
            orders: Vec::new(),
            last_updated: Utc::now(),
            notes: None,
            confidence: Confidence::Structured,
            evidence: None,
        }
    }

    /// At least one party, date, status, stage, judge or order is present
    pub fn is_meaningful(&self) -> bool {
        !self.parties.is_empty()
            || self.filing_date.is_some()
            || self.next_hearing_date.is_some()
            || self.status.is_some()
            || self.stage.is_some()
            || self.judge.is_some()
            || !self.orders.is_empty()
    }

    pub fn requires_verification(&self) -> bool {
        self.confidence == Confidence::Low
    }
}
