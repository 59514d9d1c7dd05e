//! Read-only inspection of the search page: form layout, language and the
//! case types the form offers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::{
    ButtonSummary, CaseTypeOption, FormSummary, InputSummary, OptionSummary, PageAnalysis,
    PageLanguage, SelectSummary,
};
use crate::engine::html::{element_text, selector, visible_text};

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HTML_ROOT: LazyLock<Selector> = LazyLock::new(|| selector("html"));
static FORMS: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static INPUTS: LazyLock<Selector> = LazyLock::new(|| selector("input"));
static SELECTS: LazyLock<Selector> = LazyLock::new(|| selector("select"));
static OPTIONS: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static BUTTONS: LazyLock<Selector> = LazyLock::new(|| selector("button"));

static CASE_TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)case.*type|type.*case").unwrap());

const SAMPLE_OPTIONS: usize = 10;
const MAX_CASE_TYPES: usize = 30;
const PLACEHOLDER_LABELS: [&str; 3] = ["select", "choose", "निवडा"];
const MARATHI_COURT_TERMS: [&str; 4] = ["न्यायालय", "केस", "सुनावणी", "आदेश"];

pub fn analyze_page(document: &Html) -> PageAnalysis {
    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());
    let language = document
        .select(&HTML_ROOT)
        .next()
        .and_then(|html| html.value().attr("lang"))
        .map(str::to_string);

    PageAnalysis {
        title,
        language,
        forms: document
            .select(&FORMS)
            .enumerate()
            .map(|(index, form)| summarize_form(index, form))
            .collect(),
    }
}

fn summarize_form(index: usize, form: ElementRef<'_>) -> FormSummary {
    let element = form.value();
    FormSummary {
        index,
        action: attr(form, "action"),
        method: element.attr("method").unwrap_or("get").to_uppercase(),
        id: attr(form, "id"),
        classes: element.classes().map(str::to_string).collect(),
        inputs: form.select(&INPUTS).map(summarize_input).collect(),
        selects: form.select(&SELECTS).map(summarize_select).collect(),
        buttons: form.select(&BUTTONS).map(summarize_button).collect(),
    }
}

fn summarize_input(input: ElementRef<'_>) -> InputSummary {
    let element = input.value();
    InputSummary {
        name: element.attr("name").map(str::to_string),
        input_type: element.attr("type").unwrap_or("text").to_string(),
        value: attr(input, "value"),
        id: element.attr("id").map(str::to_string),
        placeholder: attr(input, "placeholder"),
        required: element.attr("required").is_some(),
    }
}

fn summarize_select(select: ElementRef<'_>) -> SelectSummary {
    let element = select.value();
    let options: Vec<ElementRef<'_>> = select.select(&OPTIONS).collect();
    SelectSummary {
        name: element.attr("name").map(str::to_string),
        id: element.attr("id").map(str::to_string),
        options_count: options.len(),
        sample_options: options
            .iter()
            .take(SAMPLE_OPTIONS)
            .map(|option| OptionSummary {
                value: attr(*option, "value"),
                text: element_text(*option),
                selected: option.value().attr("selected").is_some(),
            })
            .collect(),
        required: element.attr("required").is_some(),
    }
}

fn summarize_button(button: ElementRef<'_>) -> ButtonSummary {
    let element = button.value();
    ButtonSummary {
        button_type: element.attr("type").unwrap_or("button").to_string(),
        name: element.attr("name").map(str::to_string),
        value: attr(button, "value"),
        text: element_text(button),
    }
}

fn attr(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or("").to_string()
}

/// Options of every case-type select, skipping blanks and placeholders
pub fn case_type_options(document: &Html) -> Vec<CaseTypeOption> {
    document
        .select(&SELECTS)
        .filter(|select| {
            select
                .value()
                .attr("name")
                .is_some_and(|name| CASE_TYPE_NAME.is_match(name))
        })
        .flat_map(|select| select.select(&OPTIONS))
        .filter_map(|option| {
            let value = option.value().attr("value")?.trim();
            let label = element_text(option);
            let lowered = label.trim().to_lowercase();
            let placeholder = PLACEHOLDER_LABELS.contains(&lowered.as_str());
            (!value.is_empty() && value != "0" && !placeholder).then(|| CaseTypeOption {
                value: value.to_string(),
                label,
            })
        })
        .take(MAX_CASE_TYPES)
        .collect()
}

pub fn detect_language(document: &Html) -> PageLanguage {
    let text = visible_text(document);
    if MARATHI_COURT_TERMS.iter().any(|term| text.contains(term)) {
        PageLanguage::Bilingual
    } else {
        PageLanguage::English
    }
}
