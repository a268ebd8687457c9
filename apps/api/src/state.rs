use std::sync::Arc;

use crate::config::Config;
use crate::scoring::{BatchConfig, MatchRanker};
use crate::store::PlacementStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgStore. Tests use MemoryStore.
    pub store: Arc<dyn PlacementStore>,
    /// Scoring pipeline with the taxonomy chosen at startup.
    pub ranker: Arc<MatchRanker>,
    pub batch: BatchConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn PlacementStore>, ranker: Arc<MatchRanker>, config: &Config) -> Self {
        Self {
            store,
            ranker,
            batch: BatchConfig {
                parallel_threshold: config.scoring_parallel_threshold,
                workers: config.scoring_workers,
            },
        }
    }
}
