use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::email::Mailer;
use crate::realtime::Hub;
use crate::services::FacebookClient;

/// Shared state cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub hub: Hub,
    pub config: Arc<AppConfig>,
    /// `None` when SMTP is not configured; password-reset mail then fails
    /// with an explicit error instead of a panic.
    pub mailer: Option<Mailer>,
    pub facebook: FacebookClient,
}
