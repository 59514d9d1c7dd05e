use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

/// Plausible year range for court dates
pub const MIN_YEAR: i32 = 1950;
pub const MAX_YEAR: i32 = 2030;

/// Layouts tried in order; the first that parses to a plausible year wins
const LAYOUTS: [&str; 20] = [
    "%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d",
    "%d-%m-%y", "%d/%m/%y", "%y-%m-%d", "%y/%m/%d",
    "%d.%m.%Y", "%d.%m.%y", "%Y.%m.%d",
    "%d %m %Y", "%d %m %y", "%Y %m %d",
    "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y",
    "%B %d %Y", "%b %d %Y",
];

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

static DAY_FIRST_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{1,2}[-/.][0-9]{1,2}[-/.][0-9]{4}\b").unwrap());

static YEAR_FIRST_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{4}[-/.][0-9]{1,2}[-/.][0-9]{1,2}\b").unwrap());

/// Parses loosely formatted court dates into `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer;

impl DateNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Canonical `YYYY-MM-DD` form of `raw`, or `raw` unchanged when no
    /// layout or digit interpretation fits. Never fails.
    pub fn normalize(&self, raw: &str) -> String {
        match self.canonical(raw) {
            Some(date) => date,
            None => {
                debug!("Could not parse date: {}", raw);
                raw.to_string()
            }
        }
    }

    /// Like [`normalize`](Self::normalize) but blank input yields `None`
    pub fn normalize_field(&self, raw: &str) -> Option<String> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(self.normalize(raw))
    }

    fn canonical(&self, raw: &str) -> Option<String> {
        let text = ascii_digits(raw.trim());
        if text.is_empty() {
            return None;
        }

        if let Some(date) = parse_layouts(&text) {
            return Some(date.format("%Y-%m-%d").to_string());
        }

        from_digit_runs(&text)
    }
}

fn parse_layouts(text: &str) -> Option<NaiveDate> {
    LAYOUTS
        .iter()
        .filter_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        .find(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
}

/// Reads the first three digit runs as day, month, year
fn from_digit_runs(text: &str) -> Option<String> {
    let mut runs = DIGIT_RUN.find_iter(text).map(|m| m.as_str().parse::<u32>());
    let day = runs.next()?.ok()?;
    let month = runs.next()?.ok()?;
    let mut year = runs.next()?.ok()?;

    if year < 100 {
        year += if year < 30 { 2000 } else { 1900 };
    }

    let year = i32::try_from(year).ok()?;
    let valid = (1..=31).contains(&day)
        && (1..=12).contains(&month)
        && (MIN_YEAR..=MAX_YEAR).contains(&year);

    valid.then(|| format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Devanagari digits to ASCII so Marathi pages parse like English ones
fn ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '०'..='९' => char::from(b'0' + (c as u32 - '०' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// First date-shaped token in `text`: day-first shapes before year-first
pub fn find_date_token(text: &str) -> Option<&str> {
    DAY_FIRST_TOKEN
        .find(text)
        .or_else(|| YEAR_FIRST_TOKEN.find(text))
        .map(|m| m.as_str())
}

/// Every date-shaped token in `text`, day-first shapes first
pub fn date_tokens(text: &str) -> Vec<&str> {
    DAY_FIRST_TOKEN
        .find_iter(text)
        .chain(YEAR_FIRST_TOKEN.find_iter(text))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        DateNormalizer::new().normalize(raw)
    }

    #[test]
    fn test_day_first_layouts() {
        assert_eq!(normalize("15-03-2023"), "2023-03-15");
        assert_eq!(normalize("15/03/2023"), "2023-03-15");
        assert_eq!(normalize("15.03.2023"), "2023-03-15");
        assert_eq!(normalize("15 03 2023"), "2023-03-15");
        assert_eq!(normalize("5-3-2023"), "2023-03-05");
    }

    #[test]
    fn test_year_first_layouts() {
        assert_eq!(normalize("2023-03-15"), "2023-03-15");
        assert_eq!(normalize("2023/03/15"), "2023-03-15");
        assert_eq!(normalize("2023.03.15"), "2023-03-15");
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(normalize("15-03-23"), "2023-03-15");
        assert_eq!(normalize("01/12/99"), "1999-12-01");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(normalize("March 15, 2023"), "2023-03-15");
        assert_eq!(normalize("Mar 15, 2023"), "2023-03-15");
        assert_eq!(normalize("15 March 2023"), "2023-03-15");
        assert_eq!(normalize("15 Mar 2023"), "2023-03-15");
    }

    #[test]
    fn test_canonical_form_is_stable() {
        let once = normalize("07/08/2019");
        assert_eq!(once, "2019-08-07");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_digit_run_fallback() {
        assert_eq!(normalize("Date: 15th of 03, 2023"), "2023-03-15");
        assert_eq!(normalize("15 / 3 / 21 (tentative)"), "2021-03-15");
    }

    #[test]
    fn test_devanagari_digits() {
        assert_eq!(normalize("१५-०३-२०२३"), "2023-03-15");
    }

    #[test]
    fn test_unparsable_returned_unchanged() {
        assert_eq!(normalize("garbage"), "garbage");
        assert_eq!(normalize("  not a date  "), "  not a date  ");
        assert_eq!(normalize("12-34"), "12-34");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_out_of_range_years_rejected() {
        assert_eq!(normalize("15-03-1890"), "15-03-1890");
        assert_eq!(normalize("15-03-2099"), "15-03-2099");
        assert_eq!(normalize("45-03-2020"), "45-03-2020");
    }

    #[test]
    fn test_huge_digit_runs_do_not_panic() {
        let raw = "99999999999999999999-1-2020";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_normalize_field_blank_is_none() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize_field("   "), None);
        assert_eq!(normalizer.normalize_field("15-03-2023"), Some("2023-03-15".into()));
    }

    #[test]
    fn test_find_date_token_prefers_day_first() {
        assert_eq!(find_date_token("Order 2023-01-05 dated 15/03/2023"), Some("15/03/2023"));
        assert_eq!(find_date_token("Judgment 2023.01.05"), Some("2023.01.05"));
        assert_eq!(find_date_token("No dates here"), None);
    }

    #[test]
    fn test_date_tokens_collects_all() {
        let tokens = date_tokens("Filed 01-02-2020, heard 2021/05/06 and 03.04.2021");
        assert_eq!(tokens, vec!["01-02-2020", "03.04.2021", "2021/05/06"]);
    }
}
