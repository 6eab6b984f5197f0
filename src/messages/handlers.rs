//! Message ingress and listing handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::tokens::Claims;
use crate::error::{ApiError, FieldError};
use crate::messages::model::{self, Message, MessageQuery, MessageSender};
use crate::middleware::AuthUser;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Raw listing parameters as they arrive on the query string. Parsing and
/// range checks happen in [`MessageQuery::parse`] so a bad value becomes a
/// field error instead of a 422 from the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

/// Validate, persist and broadcast one message on behalf of `claims`.
///
/// The row is committed before the broadcast, so a subscriber that refetches
/// the listing after the `new_message` event always sees the message.
pub async fn submit(
    state: &AppState,
    claims: &Claims,
    content: Option<&str>,
) -> Result<Message, ApiError> {
    let content = content.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "content",
            "Message is required",
        )]));
    }

    let message = model::insert_message(&state.db, claims.sub, content).await?;

    let sender = MessageSender {
        id: claims.sub,
        name: claims.name.clone(),
        color: claims.color.clone(),
    };
    let mut payload = serde_json::to_value(&message)?;
    payload["sender"] = serde_json::to_value(&sender)?;
    let delivered = state.hub.publish("new_message", payload);
    debug!(message_id = message.id, delivered, "broadcast new message");

    Ok(message)
}

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = submit(&state, &claims, body.content.as_deref()).await?;
    Ok(Json(message))
}

/// GET /messages
///
/// Pages are fetched newest-first and each page is reversed before it is
/// returned, so clients can append the array to the bottom of a chat view.
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(params): Query<ListMessagesParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = MessageQuery::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.order_by.as_deref(),
        params.order_direction.as_deref(),
    )?;

    let mut page = model::list_page(&state.db, &query).await?;
    page.reverse();

    let total = model::count_messages(&state.db).await?;
    let total_pages = if total == 0 {
        0
    } else {
        (total + i64::from(query.limit) - 1) / i64::from(query.limit)
    };

    Ok(Json(json!({
        "data": page,
        "pagination": {
            "page": query.page,
            "limit": query.limit,
            "totalPages": total_pages,
        },
    })))
}
