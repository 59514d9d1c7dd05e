use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::{ObstacleElement, ObstacleKind, ObstacleReport};
use crate::engine::html::{selector, visible_text};

const STRUCTURAL_SIGNALS: [(&str, ObstacleKind); 7] = [
    (r#"img[src*="captcha"]"#, ObstacleKind::Image),
    (r#"input[name*="captcha"]"#, ObstacleKind::Input),
    ("div.captcha", ObstacleKind::Div),
    (".g-recaptcha", ObstacleKind::Recaptcha),
    (r#"iframe[src*="recaptcha"]"#, ObstacleKind::RecaptchaIframe),
    (r#"script[src*="recaptcha"]"#, ObstacleKind::RecaptchaScript),
    (r#"input[placeholder*="captcha"]"#, ObstacleKind::InputPlaceholder),
];

const TEXT_MARKERS: [&str; 3] = ["captcha", "verification code", "security code"];

static SIGNALS: LazyLock<Vec<(&'static str, Selector, ObstacleKind)>> = LazyLock::new(|| {
    STRUCTURAL_SIGNALS
        .iter()
        .map(|(css, kind)| (*css, selector(css), *kind))
        .collect()
});

/// Detects CAPTCHA and similar verification challenges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObstacleDetector;

impl ObstacleDetector {
    pub fn new() -> Self {
        Self
    }

    /// Pure inspection of `document`; reports every structural signal found
    /// and the first matching kind.
    pub fn detect(&self, document: &Html) -> ObstacleReport {
        let mut report = ObstacleReport::default();

        for (css, selector, kind) in SIGNALS.iter() {
            let count = document.select(selector).count();
            if count == 0 {
                continue;
            }
            report.blocked = true;
            report.kind.get_or_insert(*kind);
            report.elements.push(ObstacleElement {
                kind: *kind,
                selector: css.to_string(),
                count,
            });
        }

        let text = visible_text(document).to_lowercase();
        if TEXT_MARKERS.iter().any(|marker| text.contains(marker)) {
            report.blocked = true;
            report.kind.get_or_insert(ObstacleKind::TextBased);
        }

        report
    }
}
