use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixelwar_rs::{config::Config, router, storage::FileStore, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelwar_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let storage = Arc::new(FileStore::new(&config.storage.data_dir));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Pixelwar server running on http://{}", addr);
    tracing::info!(
        "   Canvas {}x{}, {} players, {}s rounds, snapshots in {}",
        config.game.canvas_width,
        config.game.canvas_height,
        config.game.max_players,
        config.game.duration_secs,
        config.storage.data_dir.display()
    );

    let app = router(AppState::new(config.game, storage));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
