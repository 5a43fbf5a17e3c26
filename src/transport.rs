use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;

use crate::http_client::http_client;

pub const NETWORK_ERROR: &str = "Network error occurred";

/// Blocking GET returning the response body of a 2xx reply.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;
}

pub fn status_error(status: StatusCode) -> anyhow::Error {
    anyhow!("API request failed: {status}")
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        let client = http_client(self.timeout)?;

        let mut req = client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.send().context(NETWORK_ERROR)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        resp.text().context(NETWORK_ERROR)
    }
}

#[derive(Debug, Clone)]
pub enum StubReply {
    Body(String),
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Canned transport: known URLs answer with a body or a status, everything
/// else behaves like an unreachable host. Backs offline mode and the tests.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: HashMap<String, StubReply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.insert(url.into(), StubReply::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(url.into(), StubReply::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            });
        }

        match self.routes.get(url) {
            Some(StubReply::Body(body)) => Ok(body.clone()),
            Some(StubReply::Status(code)) => {
                let status = StatusCode::from_u16(*code)
                    .context("invalid stub status")
                    .context(NETWORK_ERROR)?;
                Err(status_error(status))
            }
            None => Err(anyhow!("no route to {url}").context(NETWORK_ERROR)),
        }
    }
}
