//! In-memory transport for tests. Routes match on a URL substring; the first
//! matching route answers. Unrouted requests get a 404.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{HttpRequest, HttpResponse, HttpTransport, TubifyResult};

#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Vec<(String, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: impl Into<String>, status: u16, body: Value) -> Self {
        self.routes
            .push((pattern.into(), HttpResponse::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url.contains(pattern))
            .count()
    }

    pub fn total(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(&self, request: HttpRequest) -> TubifyResult<HttpResponse> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::new(404, json!({"error": "no mock route"})));

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        Ok(response)
    }
}
