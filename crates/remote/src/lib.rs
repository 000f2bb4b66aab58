//! HTTP clients for the remote timetable solver and the schedule store.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sched_core::{ScheduleGenerator, ScheduleStore};
use serde::Serialize;
use tracing::info;
use types::{GenerateRequest, GenerateResponse, SaveRequest};

fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("building http client")
}

async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
) -> anyhow::Result<reqwest::Response> {
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("POST {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(anyhow!("POST {url} returned {status}: {text}"));
    }
    Ok(resp)
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Calls `POST {base}/generate`.
pub struct HttpGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: join(base_url, "generate"),
        })
    }
}

#[async_trait]
impl ScheduleGenerator for HttpGenerator {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResponse> {
        info!(class = %req.class_id, term = %req.term_id, "requesting generated grid");
        let resp = post_json(&self.client, &self.url, &req).await?;
        resp.json::<GenerateResponse>()
            .await
            .context("decoding generate response")
    }
}

/// Calls `POST {base}/schedules`; any 2xx counts as saved.
pub struct HttpStore {
    client: reqwest::Client,
    url: String,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: join(base_url, "schedules"),
        })
    }
}

#[async_trait]
impl ScheduleStore for HttpStore {
    async fn save(&self, req: SaveRequest) -> anyhow::Result<()> {
        info!(class = %req.class_id, slots = req.slots.len(), "saving grid");
        post_json(&self.client, &self.url, &req).await?;
        Ok(())
    }
}
