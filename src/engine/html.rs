//! Text helpers shared by the page inspectors.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

const INVISIBLE: [&str; 4] = ["script", "style", "noscript", "template"];

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector literal")
}

/// Visible text of an element with whitespace collapsed to single spaces
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

/// Visible text of the whole document, whitespace collapsed.
///
/// Text inside script, style, noscript and template elements is skipped.
pub(crate) fn visible_text(document: &Html) -> String {
    let pieces = document.root_element().descendants().filter_map(|node| {
        let Node::Text(text) = node.value() else {
            return None;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| INVISIBLE.contains(&e.name()))
        });
        (!hidden).then_some(&**text)
    });
    collapse(pieces)
}

fn collapse<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in pieces.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Trim surrounding whitespace and label separators such as `:` or `-`
pub(crate) fn clean_value(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches([':', '-', '–'])
        .trim_end_matches(':')
        .trim()
}
