use std::sync::Arc;

use async_trait::async_trait;
use remote::{HttpGenerator, HttpStore};
use sched_core::{ScheduleGenerator, ScheduleStore};
use sessions::{InMemSessions, InMemStore};
use tracing::info;
use types::{GenerateRequest, GenerateResponse, SaveRequest};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<InMemSessions<DispatchGenerator, DispatchStore>>,
}

/// Remote solver when configured; otherwise every generate call fails.
pub struct DispatchGenerator {
    remote: Option<HttpGenerator>,
}

#[async_trait]
impl ScheduleGenerator for DispatchGenerator {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResponse> {
        match &self.remote {
            Some(g) => g.generate(req).await,
            None => anyhow::bail!("no timetable generator configured"),
        }
    }
}

/// Remote store when configured, in-memory store otherwise.
pub struct DispatchStore {
    remote: Option<HttpStore>,
    local: InMemStore,
}

#[async_trait]
impl ScheduleStore for DispatchStore {
    async fn save(&self, req: SaveRequest) -> anyhow::Result<()> {
        match &self.remote {
            Some(s) => s.save(req).await,
            None => self.local.save(req).await,
        }
    }
}

impl AppState {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let remote_gen = cfg
            .generator_url
            .as_deref()
            .map(|url| HttpGenerator::new(url, cfg.http_timeout))
            .transpose()?;
        let remote_store = cfg
            .store_url
            .as_deref()
            .map(|url| HttpStore::new(url, cfg.http_timeout))
            .transpose()?;
        info!(
            generator = remote_gen.is_some(),
            remote_store = remote_store.is_some(),
            "collaborators configured"
        );

        let sessions = InMemSessions::new(
            DispatchGenerator { remote: remote_gen },
            DispatchStore {
                remote: remote_store,
                local: InMemStore::new(),
            },
        );
        Ok(Self {
            sessions: Arc::new(sessions),
        })
    }
}
