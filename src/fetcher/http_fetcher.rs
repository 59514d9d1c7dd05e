use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::app::Result;
use crate::fetcher::{FetchRequest, FetchResponse, Fetcher, FetcherConfig, Method};

const RETRY_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// reqwest-based fetcher with its own cookie jar.
///
/// Each instance owns an independent session; the connection pool and
/// cookies are released when it is dropped.
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        headers.insert("dnt", HeaderValue::from_static("1"));

        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client, config })
    }

    async fn send_once(&self, request: &FetchRequest) -> Result<reqwest::Response> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url).query(&request.params),
            Method::Post => self.client.post(&request.url).form(&request.params),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(builder.timeout(request.timeout).send().await?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut attempt = 0;
        let response = loop {
            let response = self.send_once(request).await?;
            if attempt >= self.config.max_retries || !RETRY_STATUSES.contains(&response.status()) {
                break response;
            }

            attempt += 1;
            warn!(
                "{} {} returned {}, retry {}/{}",
                request.method,
                request.url,
                response.status(),
                attempt,
                self.config.max_retries
            );
            tokio::time::sleep(self.config.retry_delay(attempt)).await;
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response.bytes().await?.to_vec();
        debug!("{} {} -> {} ({} bytes)", request.method, request.url, status, body.len());

        Ok(FetchResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_default_config() {
        assert!(HttpFetcher::new(FetcherConfig::default()).is_ok());
    }

    #[test]
    fn test_builds_with_strict_tls() {
        let config = FetcherConfig {
            accept_invalid_certs: false,
            ..Default::default()
        };
        assert!(HttpFetcher::new(config).is_ok());
    }
}
