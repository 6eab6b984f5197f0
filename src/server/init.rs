use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::email::Mailer;
use crate::realtime::Hub;
use crate::routes;
use crate::server::AppState;
use crate::services::FacebookClient;

/// Connect the database, run migrations and assemble the router.
pub async fn create_app(config: AppConfig) -> Result<Router, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    info!("connected to database");

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("migration failed: {e}");
        return Err(e.into());
    }

    let mailer = match &config.smtp {
        Some(smtp) => match Mailer::new(smtp) {
            Ok(mailer) => Some(mailer),
            Err(e) => {
                warn!("SMTP disabled: {e}");
                None
            }
        },
        None => {
            warn!("SMTP not configured, password-reset email disabled");
            None
        }
    };

    let state = AppState {
        db: pool,
        hub: Hub::default(),
        facebook: FacebookClient::new(&config.facebook_graph_url),
        mailer,
        config: Arc::new(config),
    };

    Ok(build_router(state))
}

/// Assemble the full router for a prepared [`AppState`]. Split from
/// [`create_app`] so tests can wire their own pool and mock clients.
pub fn build_router(state: AppState) -> Router {
    routes::router(state)
}
