use std::sync::Arc;

use crate::application::{ChatPipeline, IndexService, RetrievalService};
use crate::infrastructure::Config;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub indexer: Arc<IndexService>,
    pub retriever: Arc<RetrievalService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<ChatPipeline>,
        indexer: Arc<IndexService>,
        retriever: Arc<RetrievalService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            pipeline,
            indexer,
            retriever,
            config,
        }
    }
}
