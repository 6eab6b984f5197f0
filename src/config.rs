//! Process configuration.
//!
//! Every environment variable the server cares about is read exactly once, at
//! startup, into an [`AppConfig`] that travels inside the application state.
//! Components never reach back into the environment at call time.

use thiserror::Error;

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// SMTP settings for outbound transactional mail.
///
/// Present only when `SMTP_USER` and `SMTP_PASS` are both set; the server runs
/// without email features otherwise.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HMAC secret for signing and verifying identity tokens.
    pub secret_key: String,
    /// SMTP credentials, if configured.
    pub smtp: Option<SmtpConfig>,
    /// Base URL of the Facebook Graph API. Overridable so tests can point it
    /// at a local mock server.
    pub facebook_graph_url: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `SECRET_KEY` and `DATABASE_URL` are required; everything else has a
    /// default or is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key =
            std::env::var("SECRET_KEY").map_err(|_| ConfigError::MissingVar("SECRET_KEY"))?;
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 5002,
        };

        let smtp = match (std::env::var("SMTP_USER"), std::env::var("SMTP_PASS")) {
            (Ok(user), Ok(pass)) => {
                let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| user.clone());
                let host =
                    std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
                Some(SmtpConfig {
                    host,
                    user,
                    pass,
                    from,
                })
            }
            _ => None,
        };

        let facebook_graph_url = std::env::var("FACEBOOK_GRAPH_URL")
            .unwrap_or_else(|_| "https://graph.facebook.com".to_string());

        Ok(Self {
            port,
            database_url,
            secret_key,
            smtp,
            facebook_graph_url,
        })
    }
}
