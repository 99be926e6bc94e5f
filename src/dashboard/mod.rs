pub mod result;
pub mod upload;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::forecast::{HttpPredictionService, PredictionService};
use crate::session::SessionStore;

pub use result::{render, ChartPoint, GroupView, ResultView};
pub use upload::{preview, submit, Preview, SubmitOutcome};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub sessions: SessionStore,
    pub predictor: Arc<dyn PredictionService>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let predictor = Arc::new(HttpPredictionService::new(&cfg.predictor)?);
        Ok(Self::with_predictor(cfg, predictor))
    }

    pub fn with_predictor(cfg: Config, predictor: Arc<dyn PredictionService>) -> Self {
        Self {
            sessions: SessionStore::new(&cfg.session),
            cfg,
            predictor,
        }
    }
}
