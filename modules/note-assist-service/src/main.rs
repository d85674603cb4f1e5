//! Note Assist Service — standalone binary serving the AI-assist endpoint.
//!
//! Forwards prompts to the Anthropic API when `ANTHROPIC_API_KEY` is set,
//! otherwise answers with canned demo responses.
//! Default: http://127.0.0.1:9110/

use note_assist_service::assist::AssistProxy;
use note_assist_service::claude::{ClaudeClient, TextGenerator};
use note_assist_service::config::Config;
use note_assist_service::routes::{self, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::debug!("Loaded config: {:?}", config);

    let generator: Option<Arc<dyn TextGenerator>> = match &config.anthropic_api_key {
        Some(key) => match ClaudeClient::new(
            key,
            Some(&config.anthropic_endpoint),
            Some(&config.anthropic_model),
        ) {
            Ok(client) => {
                log::info!("Using Anthropic provider (model {})", config.anthropic_model);
                let client: Arc<dyn TextGenerator> =
                    Arc::new(client.with_max_tokens(config.max_tokens));
                Some(client)
            }
            Err(e) => {
                log::error!("Anthropic client unavailable, serving demo responses: {}", e);
                None
            }
        },
        None => {
            log::warn!("ANTHROPIC_API_KEY not set — serving demo responses");
            None
        }
    };

    let state = Arc::new(AppState::new(AssistProxy::new(generator)));

    let cors = tower_http::cors::CorsLayer::permissive();
    let app = routes::router(state).layer(cors);

    let addr = config.bind_addr();
    log::info!("Note Assist Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
