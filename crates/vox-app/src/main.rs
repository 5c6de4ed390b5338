//! Vox server binary - composition root.
//!
//! 1. Load `.env` and resolve configuration (file, env, CLI)
//! 2. Initialize tracing
//! 3. Build the session store, Vertex AI client and conversation engine
//! 4. Build the Cloud TTS client and speech adapter
//! 5. Start the axum API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use vox_api::state::AppState;
use vox_chat::{ConversationEngine, InMemorySessionStore, VertexGeminiClient};
use vox_core::config::VoxConfig;
use vox_core::error::VoxError;
use vox_speech::{GoogleTtsClient, SpeechAdapter};

use cli::CliArgs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before the runtime starts: set_var is only sound single-threaded.
    cli::load_dotenv();

    let args = CliArgs::parse();
    let config_file = args.resolve_config_path();
    let config = cli::load_config(&args, &config_file);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!("Starting Vox v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))?;

    Ok(())
}

async fn run(config: VoxConfig) -> Result<(), VoxError> {
    if config.llm.project_id.is_none() {
        tracing::warn!("GCP_PROJECT_ID is not set; /ask will fail until it is configured");
    }
    if !config.google.is_configured() {
        tracing::warn!(
            "Neither GOOGLE_ACCESS_TOKEN nor GOOGLE_API_KEY is set; Google requests will be unauthenticated"
        );
    }

    // Conversation.
    let store = Arc::new(InMemorySessionStore::new());
    let model = Arc::new(VertexGeminiClient::new(
        config.llm.clone(),
        config.google.clone(),
    ));
    let engine = ConversationEngine::new(store, model);
    tracing::info!(
        model = %config.llm.model,
        location = %config.llm.location,
        "Conversation engine ready"
    );

    // Speech.
    let synthesizer = Arc::new(GoogleTtsClient::new(&config.speech, config.google.clone()));
    let speech =
        SpeechAdapter::new(synthesizer).with_default_locale(config.speech.default_locale.clone());
    tracing::info!(locale = %config.speech.default_locale, "Speech adapter ready");

    let state =
        AppState::new(engine, speech).with_default_session_id(&config.session.default_id);

    vox_api::start_server(&config.server, state).await
}
