//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod mailer;

use auth::{
    AuthAppState, AuthServices, PgCredentialStore, SeedSuperAdminInput, SeedSuperAdminUseCase,
    admin_router, auth_router, business_router, user_router,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::mailer::Mailer;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let services = AuthServices::new(config.auth)?;
    let store = PgCredentialStore::new(pool.clone());
    let mailer = Mailer::from_config(config.smtp.as_ref())?;
    let state = AuthAppState::new(store, mailer, services);

    // Startup seeding: a failure here should not prevent server startup
    if let Some(seed) = config.super_admin {
        let seeder = SeedSuperAdminUseCase::new(Arc::clone(&state.store), state.services.clone());
        let input = SeedSuperAdminInput {
            email: seed.email,
            full_name: seed.full_name,
            password: seed.password,
        };
        match seeder.execute(input).await {
            Ok(created) => tracing::info!(created, "Super admin seed checked"),
            Err(e) => tracing::warn!(error = %e, "Super admin seed failed, continuing anyway"),
        }
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .nest("/api/business", business_router(state.clone()))
        .nest("/api/users", user_router(state.clone()))
        .nest("/api/admin", admin_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
