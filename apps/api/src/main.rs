use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recruit_api::config::Config;
use recruit_api::db::{create_pool, run_migrations};
use recruit_api::dispatch::{FanoutDispatcher, InAppChannel, WebhookChannel};
use recruit_api::jobs::PgJobLookup;
use recruit_api::lifecycle::ApplicationLifecycle;
use recruit_api::routes::build_router;
use recruit_api::state::AppState;
use recruit_api::store::PgApplicationStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("recruit_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&db).await?;

    let mut dispatcher = FanoutDispatcher::new().with_channel(Arc::new(InAppChannel::new(db.clone())));
    if let Some(url) = &config.notification_webhook_url {
        let webhook = WebhookChannel::new(
            url.clone(),
            Duration::from_secs(config.notification_webhook_timeout_secs),
        )?;
        dispatcher = dispatcher.with_channel(Arc::new(webhook));
    }
    info!("Notification channels: {:?}", dispatcher.channel_names());

    let lifecycle = ApplicationLifecycle::new(
        Arc::new(PgApplicationStore::new(db.clone())),
        Arc::new(PgJobLookup::new(db)),
        Arc::new(dispatcher),
        config.status_authorization,
    );
    info!(
        "Status changes authorized by policy {:?}",
        lifecycle.authorization()
    );

    let state = AppState {
        lifecycle: Arc::new(lifecycle),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
