use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nursery_hub_backend::config::Config;
use nursery_hub_backend::domain::message_sender::{LoggingSender, MessageSender, SmtpEmailSender};
use nursery_hub_backend::rest::{api_router, AppState};
use nursery_hub_backend::storage::yaml::Connection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    info!("Opening data directory {}", config.data_dir.display());
    let connection = Arc::new(Connection::new(&config.data_dir)?);

    let sender: Arc<dyn MessageSender> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpEmailSender::new(smtp.clone())?),
        None => {
            info!("SMTP not configured; outbound messages will only be logged");
            Arc::new(LoggingSender)
        }
    };
    let state = AppState::new(connection, sender);

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(cors)
        .with_state(state);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
