use std::sync::{Arc, Mutex};

use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cleanbook::config::AppConfig;
use cleanbook::db;
use cleanbook::handlers;
use cleanbook::services::email::resend::ResendProvider;
use cleanbook::services::email::{DisabledEmail, EmailProvider};
use cleanbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let email: Box<dyn EmailProvider> = if config.resend_api_key.is_empty() {
        tracing::warn!("RESEND_API_KEY not set, confirmation emails disabled");
        Box::new(DisabledEmail)
    } else {
        tracing::info!("sending confirmation emails as {}", config.email_from);
        Box::new(ResendProvider::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
        ))
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        email,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/slots/:date",
            get(handlers::slots::get_slots).put(handlers::slots::update_slots),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            put(handlers::bookings::update_booking).delete(handlers::bookings::delete_booking),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
