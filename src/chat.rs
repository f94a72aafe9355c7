use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rag_chat::application::{
    ChatPipeline, IndexService, QueryContextualizer, RetrievalService, SessionMemory,
};
use rag_chat::domain::ports::{CompletionService, EmbeddingService};
use rag_chat::infrastructure::{
    Config, FsDocumentSource, GroqCompletion, InMemoryVectorIndex, OpenAiEmbedding,
};

const SESSION_ID: &str = "terminal";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat=info,rag_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".into());
    let config = Config::load(&config_path)?;

    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    let completion: Arc<dyn CompletionService> = Arc::new(GroqCompletion::from_config(&config.llm));
    let index = Arc::new(InMemoryVectorIndex::new());
    let source = Arc::new(FsDocumentSource::new(&config.corpus.data_dir));

    let indexer = IndexService::new(
        source,
        embedding.clone(),
        index.clone(),
        config.chunking.chunk_size,
        config.chunking.overlap,
    );
    let retriever = Arc::new(RetrievalService::new(
        embedding,
        index,
        config.retrieval.top_k,
    ));
    let pipeline = ChatPipeline::new(
        Arc::new(SessionMemory::new(config.session.capacity)),
        QueryContextualizer::new(completion.clone()),
        retriever,
        completion,
        config.retrieval.top_k,
    );

    let chunks = match indexer.prepare(&config.corpus.source_id).await {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Fatal: could not index '{}': {e}", config.corpus.source_id);
            eprintln!("Check corpus.data_dir and corpus.source_id in {config_path}.");
            std::process::exit(1);
        }
    };

    println!("RAG chatbot ready ({chunks} chunks indexed). Type 'exit' to quit.");
    println!("{}", "-".repeat(50));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();

        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            println!("Chat session ended. Goodbye!");
            break;
        }
        if question.is_empty() {
            continue;
        }

        match pipeline.ask(SESSION_ID, question).await {
            Ok(answer) => {
                println!("\nBot: {}", answer.text);
                println!("     ({} chunks cited)\n", answer.used_chunks.len());
            }
            Err(e) => {
                eprintln!("\nError during {}: {e}\n", e.stage());
            }
        }
    }

    Ok(())
}
