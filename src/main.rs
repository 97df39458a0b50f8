use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use clause_extractor::application::ports::{ExtractionRepository, LlmClient};
use clause_extractor::application::services::{ExtractionService, ExtractionWorker};
use clause_extractor::infrastructure::llm::{MockLlmClient, OpenAiClient};
use clause_extractor::infrastructure::observability::init_tracing;
use clause_extractor::infrastructure::persistence::{
    create_pool, InMemoryExtractionRepository, PgExtractionRepository,
};
use clause_extractor::infrastructure::text_extraction::CompositeExtractor;
use clause_extractor::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(settings.logging.json);

    let repository: Arc<dyn ExtractionRepository> = match &settings.database.url {
        Some(url) => {
            let pool = create_pool(url, &settings.database).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgExtractionRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory repository");
            Arc::new(InMemoryExtractionRepository::new())
        }
    };

    let llm_client: Arc<dyn LlmClient> = if settings.llm.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY not set, using mock LLM client");
        Arc::new(MockLlmClient)
    } else {
        Arc::new(OpenAiClient::new(&settings.llm))
    };

    let text_extractor = Arc::new(CompositeExtractor::new(settings.extraction.max_text_chars));

    let (sender, receiver) = mpsc::channel(settings.extraction.queue_capacity);

    let worker = ExtractionWorker::new(
        receiver,
        text_extractor,
        llm_client,
        Arc::clone(&repository),
    );
    tokio::spawn(worker.run());

    let extraction_service = Arc::new(ExtractionService::new(Arc::clone(&repository), sender));

    let state = AppState {
        extraction_service,
        repository,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
