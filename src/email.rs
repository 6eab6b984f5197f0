//! Outbound email over SMTP.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;
use crate::error::ApiError;

/// SMTP mailer built once at startup from [`SmtpConfig`].
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, ApiError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| ApiError::Email(format!("invalid SMTP relay: {e}")))?
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Send a single HTML email.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| ApiError::Email(format!("invalid sender address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| ApiError::Email(format!("invalid recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| ApiError::Email(format!("failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| ApiError::Email(format!("failed to send email: {e}")))?;

        info!(to, subject, "email sent");
        Ok(())
    }
}
