use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rag_chat::api::{create_router, AppState};
use rag_chat::application::{
    ChatPipeline, IndexService, QueryContextualizer, RetrievalService, SessionMemory,
};
use rag_chat::domain::ports::{CompletionService, EmbeddingService};
use rag_chat::infrastructure::{
    Config, FsDocumentSource, GroqCompletion, InMemoryVectorIndex, OpenAiEmbedding,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,rag_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".into());
    let config = Arc::new(Config::load(&config_path)?);

    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    let completion: Arc<dyn CompletionService> = Arc::new(GroqCompletion::from_config(&config.llm));
    let index = Arc::new(InMemoryVectorIndex::new());
    let source = Arc::new(FsDocumentSource::new(&config.corpus.data_dir));

    let indexer = Arc::new(IndexService::new(
        source,
        embedding.clone(),
        index.clone(),
        config.chunking.chunk_size,
        config.chunking.overlap,
    ));
    let retriever = Arc::new(RetrievalService::new(
        embedding,
        index,
        config.retrieval.top_k,
    ));
    let sessions = Arc::new(SessionMemory::new(config.session.capacity));
    let pipeline = Arc::new(ChatPipeline::new(
        sessions,
        QueryContextualizer::new(completion.clone()),
        retriever.clone(),
        completion,
        config.retrieval.top_k,
    ));

    if !config.corpus.source_id.is_empty() {
        let chunks = indexer.prepare(&config.corpus.source_id).await?;
        info!(source_id = %config.corpus.source_id, chunks, "corpus indexed");
    }

    let state = AppState::new(pipeline, indexer, retriever, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
