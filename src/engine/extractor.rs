use std::sync::LazyLock;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::{CaseQuery, CaseRecord, MAX_ORDERS};
use crate::engine::dates::DateNormalizer;
use crate::engine::fallback::HeuristicFallback;
use crate::engine::html::{clean_value, element_text, selector};
use crate::engine::orders::OrderCollector;
use crate::engine::EngineConfig;

static ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELLS: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3, h4"));
static DETAIL_CONTAINERS: LazyLock<Selector> =
    LazyLock::new(|| selector("div.case-details, div.case-info, div.result, div.case-data"));
static LABELS: LazyLock<Selector> = LazyLock::new(|| selector("label, span, strong, b"));

const PETITIONER: [&str; 5] = ["petitioner", "applicant", "plaintiff", "अर्जदार", "फिर्यादी"];
const RESPONDENT: [&str; 4] = ["respondent", "defendant", "प्रतिवादी", "बचावपक्ष"];
const HEARING: [&str; 5] = ["next", "hearing", "list", "सुनावणी", "पुढील"];
const FILING: [&str; 3] = ["filing", "दाखल", "registration"];
const DATE: [&str; 2] = ["date", "तारीख"];
const STATUS_OR_STAGE: [&str; 4] = ["status", "stage", "स्थिती", "टप्पा"];
const CURRENT: [&str; 3] = ["current", "present", "सध्याचा"];
const JUDGE: [&str; 3] = ["judge", "न्यायाधीश", "न्यायमूर्ती"];

/// Record field a table or container label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Petitioner,
    Respondent,
    FilingDate,
    HearingDate,
    Status,
    Stage,
    /// Fills status only when nothing else has
    CurrentStatus,
    Judge,
}

/// Maps a bilingual label to the field it names.
///
/// Hearing dates are checked before filing dates so "Next Hearing Date" is
/// never read as a filing date. Labels that only say "date" are ignored.
pub fn classify_label(label: &str) -> Option<Field> {
    let label = label.to_lowercase();
    let has = |terms: &[&str]| terms.iter().any(|t| label.contains(t));

    if has(&PETITIONER) {
        Some(Field::Petitioner)
    } else if has(&RESPONDENT) {
        Some(Field::Respondent)
    } else if has(&HEARING) && has(&DATE) {
        Some(Field::HearingDate)
    } else if has(&FILING) && has(&DATE) {
        Some(Field::FilingDate)
    } else if has(&STATUS_OR_STAGE) {
        if label.contains("status") {
            Some(Field::Status)
        } else {
            Some(Field::Stage)
        }
    } else if has(&CURRENT) {
        Some(Field::CurrentStatus)
    } else if has(&JUDGE) {
        Some(Field::Judge)
    } else {
        None
    }
}

/// First extraction stage: tables, headings and labeled containers.
pub struct StructuredExtractor<'a> {
    config: &'a EngineConfig,
    dates: DateNormalizer,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            dates: DateNormalizer::new(),
        }
    }

    /// A record when at least one meaningful field was recovered
    pub fn extract(&self, document: &Html, query: &CaseQuery) -> Option<CaseRecord> {
        let mut record = CaseRecord::new(query, &self.config.court_name);

        self.read_tables(document, &mut record);
        self.read_title(document, query, &mut record);
        self.read_containers(document, query, &mut record);

        record.orders = OrderCollector::new(self.config)
            .collect(document)
            .into_entries(self.config.max_orders.min(MAX_ORDERS));

        if record.is_meaningful() {
            Some(record)
        } else {
            debug!("Structured extraction found nothing for {}", query);
            None
        }
    }

    fn read_tables(&self, document: &Html, record: &mut CaseRecord) {
        for row in document.select(&ROWS) {
            let cells: Vec<String> = row.select(&CELLS).map(element_text).collect();
            if cells.len() < 2 {
                continue;
            }
            let value = clean_value(&cells[1]);
            if value.is_empty() {
                continue;
            }
            if let Some(field) = classify_label(&cells[0]) {
                self.apply(record, field, value);
            }
        }
    }

    fn read_title(&self, document: &Html, query: &CaseQuery, record: &mut CaseRecord) {
        let indicator = self.config.court_indicator.to_lowercase();
        let title = document.select(&HEADINGS).map(element_text).find(|text| {
            !text.is_empty()
                && (query.is_mentioned_in(text)
                    || (!indicator.is_empty() && text.to_lowercase().contains(&indicator)))
        });
        if let Some(title) = title {
            record.title = title;
        }
    }

    fn read_containers(&self, document: &Html, query: &CaseQuery, record: &mut CaseRecord) {
        let containers = document
            .select(&DETAIL_CONTAINERS)
            .filter(|container| query.is_mentioned_in(&element_text(*container)));

        for container in containers {
            for label in container.select(&LABELS) {
                let text = element_text(label);
                let Some(field) = classify_label(clean_value(&text)) else {
                    continue;
                };
                if let Some(value) = adjacent_value(label) {
                    self.apply(record, field, &value);
                }
            }
        }
    }

    fn apply(&self, record: &mut CaseRecord, field: Field, value: &str) {
        match field {
            Field::Petitioner => {
                record.parties.add_petitioner(value);
            }
            Field::Respondent => {
                record.parties.add_respondent(value);
            }
            Field::FilingDate => record.filing_date = self.dates.normalize_field(value),
            Field::HearingDate => record.next_hearing_date = self.dates.normalize_field(value),
            Field::Status => record.status = Some(value.to_string()),
            Field::Stage => record.stage = Some(value.to_string()),
            Field::CurrentStatus => {
                record.status.get_or_insert_with(|| value.to_string());
            }
            Field::Judge => record.judge = Some(value.to_string()),
        }
    }
}

/// Text of the first non-blank sibling after `label`, separators stripped
fn adjacent_value(label: ElementRef<'_>) -> Option<String> {
    for sibling in label.next_siblings() {
        let value = match sibling.value() {
            Node::Text(text) => clean_value(text).to_string(),
            Node::Element(_) => {
                let element = ElementRef::wrap(sibling)?;
                clean_value(&element_text(element)).to_string()
            }
            _ => continue,
        };
        if !value.is_empty() {
            return Some(value);
        }
        if matches!(sibling.value(), Node::Element(_)) {
            return None;
        }
    }
    None
}

/// The two-stage extraction pipeline: structured first, heuristic fallback
/// only when the structured stage comes back empty.
pub struct RecordExtractor<'a> {
    structured: StructuredExtractor<'a>,
    fallback: HeuristicFallback<'a>,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            structured: StructuredExtractor::new(config),
            fallback: HeuristicFallback::new(config),
        }
    }

    pub fn extract(&self, document: &Html, query: &CaseQuery) -> Option<CaseRecord> {
        self.structured
            .extract(document, query)
            .or_else(|| self.fallback.extract(document, query))
    }
}
