use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use validator::Validate;

use crate::domain::SortOrder;

/// Public WattMap model endpoint.
pub const DEFAULT_PREDICTOR_URL: &str =
    "https://port-0-gu-ai-pn2llx5u8tfw.sel5.cloudtype.app/model/predict";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub predictor: PredictorConfig,
    #[validate(nested)]
    pub ui: UiConfig,
    #[validate(nested)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1024))]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            request_timeout_secs: 300,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictorConfig {
    #[validate(url)]
    pub url: String,
    /// Unset means the HTTP client's own default applies.
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PREDICTOR_URL.to_string(),
            timeout_seconds: None,
            user_agent: concat!("wattmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UiConfig {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 1, max = 1000))]
    pub preview_rows: usize,
    pub sort_order: SortOrder,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "WattMap".to_string(),
            preview_rows: 10,
            sort_order: SortOrder::Lexicographic,
        }
    }
}

/// Browser sessions live in memory; these bound how many and for how long.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    #[validate(range(min = 1))]
    pub idle_timeout_secs: u64,
    #[validate(range(min = 1))]
    pub max_sessions: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            max_sessions: 1000,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("WATTMAP__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("invalid configuration")?;
        cfg.validate().context("configuration failed validation")?;
        Ok(cfg)
    }
}
