//! Scripted fetcher for tests. Unrouted requests answer 404.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{DocketError, Result};
use crate::fetcher::{FetchRequest, FetchResponse, Fetcher, Method};

enum Reply {
    Response(FetchResponse),
    Error(String),
}

#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        let response = FetchResponse {
            status,
            final_url: url.to_string(),
            content_type: Some(content_type.to_string()),
            body: body.as_bytes().to_vec(),
        };
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_string()), Reply::Response(response));
        self
    }

    pub fn html(self, method: Method, url: &str, body: &str) -> Self {
        self.respond(method, url, 200, "text/html; charset=utf-8", body)
    }

    pub fn fail(self, method: Method, url: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_string()), Reply::Error(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let routes = self.routes.lock().unwrap();
        match routes.get(&(request.method, request.url.clone())) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::Error(message)) => Err(DocketError::Other(message.clone())),
            None => Ok(FetchResponse {
                status: 404,
                final_url: request.url.clone(),
                content_type: Some("text/html".to_string()),
                body: b"<html><body>Not Found</body></html>".to_vec(),
            }),
        }
    }
}
