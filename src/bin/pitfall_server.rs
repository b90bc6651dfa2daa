use std::sync::Arc;

use tracing::info;

use pitfall_assessor::api::{create_router, AppState};
use pitfall_assessor::assessment::AssessmentWorkflow;
use pitfall_assessor::config::Config;
use pitfall_assessor::directory::MemoryDirectory;
use pitfall_assessor::scorer::load_scorer;
use pitfall_assessor::session::new_session_store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitfall_assessor=info,tower_http=debug".into()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Select the scorer once, from artifact availability
    let scorer = load_scorer(&config.model_path)?;

    // Wire up the injected stores and the workflow
    let app_state = AppState {
        directory: Arc::new(MemoryDirectory::new()),
        sessions: new_session_store(),
        workflow: Arc::new(AssessmentWorkflow::new(scorer)),
    };

    let app = create_router(app_state);

    let addr = config.listen_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
