use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ormpad_studio::{
    config::{Args, StudioConfig},
    create_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ormpad={},tower_http=info", log_filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: StudioConfig = args.into();
    let listen_addr = config.listen_addr();
    let base_url = config.base_url();

    // Builds the engine, creates tables, and seeds unless --no-seed.
    let state = AppState::new(config)?;

    let app = create_router(state);
    let listener = TcpListener::bind(&listen_addr).await?;

    tracing::info!("ormpad studio running on {}", base_url);
    tracing::info!("health check at {}/health", base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
