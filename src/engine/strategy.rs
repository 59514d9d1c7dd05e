use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::CaseQuery;
use crate::engine::html::selector;
use crate::engine::{EngineConfig, FieldScheme};

static INPUTS: LazyLock<Selector> = LazyLock::new(|| selector("input"));

/// Hidden form fields in document order, first occurrence of a name wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenFields {
    fields: Vec<(String, String)>,
}

impl HiddenFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, name: &str, value: &str) {
        if self.get(name).is_none() {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }
}

/// One candidate request payload, ready to send as query or form data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// 1-based priority; lower is tried first
    pub priority: usize,
    pub scheme: String,
    pub fields: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_if_absent(&mut self, name: &str, value: &str) {
        if self.get(name).is_none() {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }
}

/// Builds the ordered list of parameter sets to try against the search form.
pub struct StrategyGenerator {
    config: EngineConfig,
}

impl StrategyGenerator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// One parameter set per configured scheme, in scheme order, each with
    /// the page's hidden fields filling the names the scheme leaves unset.
    pub fn generate(&self, document: &Html, query: &CaseQuery) -> Vec<ParameterSet> {
        let hidden = self.hidden_fields(document);
        self.generate_with(&hidden, query)
    }

    pub fn generate_with(&self, hidden: &HiddenFields, query: &CaseQuery) -> Vec<ParameterSet> {
        self.config
            .schemes
            .iter()
            .enumerate()
            .map(|(i, scheme)| {
                let mut set = apply_scheme(i + 1, scheme, query);
                for (name, value) in &hidden.fields {
                    set.set_if_absent(name, value);
                }
                set
            })
            .collect()
    }

    /// Hidden inputs, with well-known state tokens collected first.
    ///
    /// Well-known names are taken only when they carry a value; every other
    /// hidden input is taken as-is.
    pub fn hidden_fields(&self, document: &Html) -> HiddenFields {
        let hidden: Vec<(&str, &str)> = document
            .select(&INPUTS)
            .filter(|input| {
                input
                    .value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
            })
            .filter_map(|input| {
                let element = input.value();
                let name = element.attr("name")?;
                Some((name, element.attr("value").unwrap_or("")))
            })
            .collect();

        let mut fields = HiddenFields::default();

        for known in &self.config.hidden_field_names {
            if let Some((name, value)) = hidden.iter().find(|(n, _)| *n == known.as_str()) {
                if !value.is_empty() {
                    debug!("Found hidden field {}", name);
                    fields.insert(name, value);
                }
            }
        }

        for (name, value) in &hidden {
            if !name.is_empty() {
                fields.insert(name, value);
            }
        }

        fields
    }
}

fn apply_scheme(priority: usize, scheme: &FieldScheme, query: &CaseQuery) -> ParameterSet {
    let mut set = ParameterSet {
        priority,
        scheme: scheme.name.clone(),
        fields: Vec::new(),
    };
    set.set_if_absent(&scheme.case_type, &query.case_type);
    set.set_if_absent(&scheme.case_number, &query.case_number);
    set.set_if_absent(&scheme.year, &query.year());
    set.set_if_absent(&scheme.submit.field, &scheme.submit.value);
    for (name, value) in &scheme.extra {
        set.set_if_absent(name, value);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPNET_FORM: &str = r#"
        <html><body><form method="post">
            <input type="hidden" name="__VIEWSTATE" value="dDwtMTA4">
            <input type="hidden" name="__EVENTVALIDATION" value="">
            <input type="hidden" name="tracking" value="abc">
            <input type="HIDDEN" name="tracking" value="second">
            <input type="hidden" name="case_no" value="from-page">
            <input type="text" name="txtCaseNo">
        </form></body></html>
    "#;

    fn generator() -> StrategyGenerator {
        StrategyGenerator::new(EngineConfig::default())
    }

    #[test]
    fn test_hidden_fields_first_occurrence_wins() {
        let hidden = generator().hidden_fields(&Html::parse_document(ASPNET_FORM));
        assert_eq!(hidden.get("__VIEWSTATE"), Some("dDwtMTA4"));
        assert_eq!(hidden.get("tracking"), Some("abc"));
        assert_eq!(hidden.get("__EVENTVALIDATION"), Some(""));
        assert_eq!(hidden.get("txtCaseNo"), None);
        assert_eq!(hidden.names()[0], "__VIEWSTATE");
        assert_eq!(hidden.len(), 4);
    }

    #[test]
    fn test_one_set_per_scheme_in_priority_order() {
        let query = CaseQuery::new("RCS", "123", 2021);
        let sets = generator().generate(&Html::parse_document(ASPNET_FORM), &query);

        assert_eq!(sets.len(), 7);
        assert_eq!(sets[0].priority, 1);
        assert_eq!(sets[0].scheme, "ecourts");
        assert_eq!(sets[0].get("case_type"), Some("RCS"));
        assert_eq!(sets[0].get("case_year"), Some("2021"));
        assert_eq!(sets[2].get("txtCaseNo"), Some("123"));
        assert_eq!(sets[6].get("filingYear"), Some("2021"));
    }

    #[test]
    fn test_scheme_keys_take_precedence_over_hidden() {
        let query = CaseQuery::new("RCS", "123", 2021);
        let sets = generator().generate(&Html::parse_document(ASPNET_FORM), &query);

        assert_eq!(sets[0].get("case_no"), Some("123"));
        assert_eq!(sets[1].get("case_no"), Some("from-page"));
        for set in &sets {
            assert_eq!(set.get("__VIEWSTATE"), Some("dDwtMTA4"));
        }
    }

    #[test]
    fn test_no_hidden_fields() {
        let query = CaseQuery::new("CC", "9", 2019);
        let sets = generator().generate(&Html::parse_document("<html></html>"), &query);
        assert_eq!(sets[5].fields.len(), 4);
        assert_eq!(sets[5].get("action"), Some("search"));
    }
}
