use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::EndpointProbeResult;
use crate::engine::EngineConfig;
use crate::fetcher::{FetchRequest, Fetcher};

/// Finds the first candidate URL that serves a genuine search page.
///
/// The selected URL is cached for the lifetime of the resolver; later calls
/// return it without probing again.
pub struct EndpointResolver {
    fetcher: Arc<dyn Fetcher>,
    config: EngineConfig,
    resolved: Option<String>,
    probes: Vec<EndpointProbeResult>,
}

impl EndpointResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: EngineConfig) -> Self {
        Self {
            fetcher,
            config,
            resolved: None,
            probes: Vec::new(),
        }
    }

    /// Probe `candidates` in order and return the first valid one.
    ///
    /// Network errors are recorded and treated as a non-match. Each uncached
    /// call starts a fresh probe list.
    pub async fn resolve(&mut self, candidates: &[String]) -> Option<String> {
        if let Some(url) = &self.resolved {
            return Some(url.clone());
        }

        self.probes.clear();

        for url in candidates {
            info!("Testing candidate URL: {}", url);
            let probe = self.probe(url).await;
            let selected = probe.selected;
            self.probes.push(probe);

            if selected {
                info!("Working URL found: {}", url);
                self.resolved = Some(url.clone());
                return Some(url.clone());
            }
        }

        error!("No working URL found among {} candidates", candidates.len());
        None
    }

    /// Probe results of the most recent uncached call, in probe order
    pub fn probes(&self) -> &[EndpointProbeResult] {
        &self.probes
    }

    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    async fn probe(&self, url: &str) -> EndpointProbeResult {
        let request = FetchRequest::get(url, self.config.probe_timeout());

        let response = match self.fetcher.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Candidate URL {} failed: {}", url, e);
                return EndpointProbeResult {
                    url: url.to_string(),
                    reachable: false,
                    status: None,
                    content_length: 0,
                    content_type: None,
                    validity_score: 0,
                    selected: false,
                    error: Some(e.to_string()),
                };
            }
        };

        let score = if response.is_ok() {
            self.signal_score(&response.text())
        } else {
            0
        };

        let selected = response.is_ok()
            && response.body.len() > self.config.min_body_bytes
            && response.content_type().to_lowercase().contains("html")
            && score >= self.config.min_signal_score;

        let error = (response.is_ok() && !selected).then(|| {
            format!(
                "Content validation failed - indicators: {}/{}",
                score,
                self.config.signal_terms.len()
            )
        });

        EndpointProbeResult {
            url: url.to_string(),
            reachable: true,
            status: Some(response.status),
            content_length: response.body.len(),
            content_type: response.content_type.clone(),
            validity_score: score,
            selected,
            error,
        }
    }

    /// Number of signal terms present in `body`, case-insensitively
    pub fn signal_score(&self, body: &str) -> usize {
        let body = body.to_lowercase();
        self.config
            .signal_terms
            .iter()
            .filter(|term| body.contains(&term.to_lowercase()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::fetcher::Method;

    fn court_page() -> String {
        let mut page = String::from(
            "<html><head><title>District Court Wardha</title></head><body>\
             <h1>Case Status</h1><p>Search by case number and filing year.</p>",
        );
        page.push_str(&"<p>eCourts services</p>".repeat(60));
        page.push_str("</body></html>");
        page
    }

    fn candidates(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_skips_404_and_selects_valid_page() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond(Method::Get, "https://a.example/", 404, "text/html", "missing")
                .html(Method::Get, "https://b.example/", &court_page()),
        );
        let mut resolver = EndpointResolver::new(fetcher, EngineConfig::default());

        let url = resolver
            .resolve(&candidates(&["https://a.example/", "https://b.example/"]))
            .await;

        assert_eq!(url.as_deref(), Some("https://b.example/"));
        assert_eq!(resolver.probes().len(), 2);
        assert!(!resolver.probes()[0].selected);
        assert!(resolver.probes()[1].selected);
        assert!(resolver.probes()[1].validity_score >= 3);
    }

    #[tokio::test]
    async fn test_resolution_is_cached() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond(Method::Get, "https://a.example/", 404, "text/html", "missing")
                .html(Method::Get, "https://b.example/", &court_page()),
        );
        let mut resolver = EndpointResolver::new(fetcher.clone(), EngineConfig::default());
        let list = candidates(&["https://a.example/", "https://b.example/", "https://c.example/"]);

        let first = resolver.resolve(&list).await;
        let second = resolver.resolve(&list).await;

        assert_eq!(first, second);
        assert_eq!(fetcher.count(Method::Get, "https://a.example/"), 1);
        assert_eq!(fetcher.count(Method::Get, "https://b.example/"), 1);
        assert_eq!(fetcher.count(Method::Get, "https://c.example/"), 0);
    }

    #[tokio::test]
    async fn test_network_error_is_not_fatal() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .fail(Method::Get, "https://a.example/", "connection refused")
                .html(Method::Get, "https://b.example/", &court_page()),
        );
        let mut resolver = EndpointResolver::new(fetcher, EngineConfig::default());

        let url = resolver
            .resolve(&candidates(&["https://a.example/", "https://b.example/"]))
            .await;

        assert_eq!(url.as_deref(), Some("https://b.example/"));
        let failed = &resolver.probes()[0];
        assert!(!failed.reachable);
        assert_eq!(failed.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_rejects_small_or_non_html_or_unrelated_pages() {
        let unrelated = format!("<html><body>{}</body></html>", "lorem ipsum ".repeat(200));
        let fetcher = Arc::new(
            MockFetcher::new()
                .html(Method::Get, "https://small.example/", "<html>court case search</html>")
                .respond(Method::Get, "https://json.example/", 200, "application/json", &court_page())
                .html(Method::Get, "https://blog.example/", &unrelated),
        );
        let mut resolver = EndpointResolver::new(fetcher, EngineConfig::default());

        let url = resolver
            .resolve(&candidates(&[
                "https://small.example/",
                "https://json.example/",
                "https://blog.example/",
            ]))
            .await;

        assert_eq!(url, None);
        assert!(resolver.probes().iter().all(|p| p.reachable && !p.selected));
        assert_eq!(resolver.probes()[2].validity_score, 0);
        assert!(resolver.resolved().is_none());
    }

    #[tokio::test]
    async fn test_failed_resolutions_do_not_accumulate_results() {
        let fetcher = Arc::new(MockFetcher::new());
        let mut resolver = EndpointResolver::new(fetcher, EngineConfig::default());
        let list = candidates(&["https://a.example/", "https://b.example/"]);

        for _ in 0..3 {
            assert_eq!(resolver.resolve(&list).await, None);
            assert_eq!(resolver.probes().len(), 2);
        }
    }

    #[test]
    fn test_signal_score_is_case_insensitive() {
        let resolver = EndpointResolver::new(Arc::new(MockFetcher::new()), EngineConfig::default());
        assert_eq!(resolver.signal_score("COURT of WARDHA District"), 3);
        assert_eq!(resolver.signal_score("nothing relevant"), 0);
    }
}
