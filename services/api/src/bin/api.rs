//! services/api/src/bin/api.rs

use api_lib::{
    adapters::OpenAiChatAdapter,
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use notes_hub_core::{ChatGateway, ChatService, Workspace};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Chat Gateway ---
    let chat_service: Option<Arc<dyn ChatService>> = match &config.chat_api_key {
        Some(api_key) => {
            info!(
                "Chat assistant enabled (model {} at {}).",
                config.chat_model, config.chat_api_base
            );
            let adapter: Arc<dyn ChatService> = Arc::new(OpenAiChatAdapter::from_credentials(
                api_key,
                &config.chat_api_base,
                config.chat_model.clone(),
            ));
            Some(adapter)
        }
        None => {
            warn!("API_KEY environment variable not set. Chat replies will explain how to configure it.");
            None
        }
    };
    let chat = ChatGateway::new(chat_service);

    // --- 3. Build the Session Workspace ---
    let workspace = if config.seed_sample_notes {
        info!("Seeding the workspace with sample notes.");
        Workspace::seeded()
    } else {
        Workspace::default()
    };

    let app_state = Arc::new(AppState::new(workspace, config.clone(), chat));

    // --- 4. Create the Web Router ---
    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid CORS origin '{}': {}",
            config.cors_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state))
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
