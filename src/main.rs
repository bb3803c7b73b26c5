//! bankd - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Initialize logging
//! 2. Load and validate configuration from environment variables
//! 3. Create the database connection pool and run migrations
//! 4. Build the shared application state (store, token maker, task
//!    distributor, mailer)
//! 5. Spawn the background email task processor
//! 6. Build the HTTP router and serve

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bankd::{
    AppState, app, config, db,
    store::Store,
    token::jwt::JwtTokenMaker,
    worker::{EmailSender, HttpMailer, LogMailer, PgTaskDistributor, TaskProcessor},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let store = Store::new(pool.clone());

    let token_maker = JwtTokenMaker::new(&config.token_secret)
        .map_err(|e| anyhow::anyhow!("cannot create token maker: {e}"))?;

    let mailer: Arc<dyn EmailSender> = match (&config.mail_gateway_url, &config.mail_gateway_secret)
    {
        (Some(url), Some(secret)) => Arc::new(HttpMailer::new(url.clone(), secret.clone())?),
        _ => {
            tracing::warn!("no mail gateway configured, mail will be logged instead");
            Arc::new(LogMailer)
        }
    };

    let processor = TaskProcessor::new(store.clone(), mailer, config.worker_poll_interval());
    tokio::spawn(processor.run());

    let state = AppState {
        store,
        token_maker: Arc::new(token_maker),
        distributor: Arc::new(PgTaskDistributor::new(pool)),
        config: Arc::new(config.clone()),
    };

    let app = app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
