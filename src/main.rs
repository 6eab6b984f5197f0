use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatline::config::AppConfig;
use chatline::server::create_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let addr = format!("0.0.0.0:{}", config.port);

    let app = create_app(config).await?;

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
