use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use super::graph::GraphSnapshot;
use super::parse::parse_snapshot;

/// Reply to an extraction trigger. `status` is `queued` or `completed`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExtractionStatus {
    pub document_id: String,
    pub status: String,
    #[serde(default)]
    pub entities_found: usize,
    #[serde(default)]
    pub relationships_found: usize,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ExtractionClient {
    http: Client,
    api_url: String,
}

impl ExtractionClient {
    pub fn new(api_url: &str, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
        })
    }

    fn graph_url(&self, document_id: &str, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/graph/{document_id}/{action}", self.api_url),
            None => format!("{}/graph/{document_id}", self.api_url),
        }
    }

    pub fn fetch_graph(&self, document_id: &str) -> Result<GraphSnapshot> {
        let url = self.graph_url(document_id, None);
        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("failed to request {url}"))?;
        let body = checked(response, &url)?
            .text()
            .with_context(|| format!("failed to read body from {url}"))?;
        parse_snapshot(&body).with_context(|| format!("invalid graph payload from {url}"))
    }

    pub fn trigger_extraction(&self, document_id: &str) -> Result<ExtractionStatus> {
        self.post_trigger(document_id, "extract")
    }

    pub fn trigger_reextraction(&self, document_id: &str) -> Result<ExtractionStatus> {
        self.post_trigger(document_id, "reextract")
    }

    fn post_trigger(&self, document_id: &str, action: &str) -> Result<ExtractionStatus> {
        let url = self.graph_url(document_id, Some(action));
        let response = self
            .http
            .post(&url)
            .send()
            .with_context(|| format!("failed to request {url}"))?;
        let status = checked(response, &url)?
            .json::<ExtractionStatus>()
            .with_context(|| format!("invalid extraction status from {url}"))?;

        tracing::info!(
            document_id = %status.document_id,
            action,
            status = %status.status,
            entities = status.entities_found,
            relationships = status.relationships_found,
            message = %status.message,
            task_id = status.task_id.as_deref().unwrap_or("-"),
            "extraction requested"
        );
        Ok(status)
    }
}

fn checked(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response.text().unwrap_or_default();
    Err(anyhow!("{url} returned {status}: {detail}"))
}
