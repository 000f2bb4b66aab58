use std::time::Duration;

use anyhow::Context;

const PREFIX: &str = "TIMETABLE__";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub generator_url: Option<String>,
    pub store_url: Option<String>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            generator_url: None,
            store_url: None,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| get(&format!("{PREFIX}{name}")).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(port) = var("SERVER__PORT") {
            cfg.port = port
                .parse()
                .with_context(|| format!("invalid {PREFIX}SERVER__PORT: {port}"))?;
        }
        cfg.generator_url = var("GENERATOR__URL");
        cfg.store_url = var("STORE__URL");
        if let Some(secs) = var("HTTP__TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid {PREFIX}HTTP__TIMEOUT_SECS: {secs}"))?;
            cfg.http_timeout = Duration::from_secs(secs);
        }
        Ok(cfg)
    }
}
