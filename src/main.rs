use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prowashcare_quote::config::Config;
use prowashcare_quote::{routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,prowashcare_quote=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting ProWashCare quote service");
    tracing::info!("   HTTP Addr: {}", config.http_addr);
    tracing::info!("   Export Dir: {}", config.export_dir.display());
    tracing::info!("   Logo: {}", config.logo_path.display());
    tracing::info!("   Auto transport: {}", config.quote.auto_transport);
    tracing::info!("   Pavement minimum: {:?}", config.quote.pavement_minimum);

    let addr = config.http_addr.clone();
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
