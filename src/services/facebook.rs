//! Facebook Graph API client used for token-based login.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Profile fields fetched from the Graph API for an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// Thin wrapper over the Graph API `/me` endpoint. The base URL is
/// configurable so tests can point it at a local mock server.
#[derive(Clone)]
pub struct FacebookClient {
    http: Client,
    base_url: String,
}

impl FacebookClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve an access token to the profile it belongs to.
    ///
    /// Returns `Ok(None)` when the Graph API rejects the token; transport
    /// failures surface as errors.
    pub async fn fetch_user(&self, access_token: &str) -> Result<Option<FacebookUser>, reqwest::Error> {
        let response = self
            .http
            .get(format!("{}/me", self.base_url))
            .query(&[("fields", "id,name,email"), ("access_token", access_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "facebook rejected access token");
            return Ok(None);
        }

        let user = response.json::<FacebookUser>().await?;
        Ok(Some(user))
    }
}
