use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use corkboard_api::AppStateInner;
use corkboard_api::dashboard::DashboardCache;
use corkboard_api::storage::PhotoStore;
use corkboard_gateway::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corkboard=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("CORKBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CORKBOARD_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path = std::env::var("CORKBOARD_DB_PATH").unwrap_or_else(|_| "corkboard.db".into());
    let upload_dir: PathBuf = std::env::var("CORKBOARD_UPLOAD_DIR")
        .unwrap_or_else(|_| "./uploads".into())
        .into();

    // Init database and photo storage
    let db = Arc::new(corkboard_db::Database::open(&PathBuf::from(&db_path))?);
    let photos = PhotoStore::new(upload_dir.clone()).await?;

    // Shared state
    let state = Arc::new(AppStateInner {
        db,
        dispatcher: Dispatcher::new(),
        photos,
        dashboard: DashboardCache::default(),
    });

    // A 5MB photo arrives base64-inflated inside a JSON body.
    let app = corkboard_api::router(state)
        .nest_service("/uploads", ServeDir::new(&upload_dir))
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Corkboard server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
