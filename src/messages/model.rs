//! Message rows and their database operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error::{ApiError, FieldError};

/// A persisted chat message.
///
/// `receiver_id` is always written equal to `sender_id`: the feed is
/// broadcast-only, but the column and wire field stay so existing clients
/// keep parsing the same shape.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public identity of a message's sender, embedded in listings and realtime
/// payloads. Never carries the email or password hash.
#[derive(Debug, Clone, Serialize)]
pub struct MessageSender {
    pub id: i64,
    pub name: Option<String>,
    pub color: String,
}

/// A message joined with its sender's public identity.
#[derive(Debug, Clone, Serialize)]
pub struct MessageWithSender {
    #[serde(flatten)]
    pub message: Message,
    pub sender: MessageSender,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct MessageWithSenderRow {
    id: i64,
    content: String,
    sender_id: i64,
    receiver_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    sender_name: Option<String>,
    sender_color: String,
}

impl From<MessageWithSenderRow> for MessageWithSender {
    fn from(row: MessageWithSenderRow) -> Self {
        MessageWithSender {
            sender: MessageSender {
                id: row.sender_id,
                name: row.sender_name,
                color: row.sender_color,
            },
            message: Message {
                id: row.id,
                content: row.content,
                sender_id: row.sender_id,
                receiver_id: row.receiver_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Sort column for message listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    CreatedAt,
    UpdatedAt,
}

impl OrderBy {
    fn column(self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "created_at",
            OrderBy::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    fn keyword(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Validated pagination parameters for a message listing.
#[derive(Debug, Clone, Copy)]
pub struct MessageQuery {
    pub page: u32,
    pub limit: u32,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            order_by: OrderBy::CreatedAt,
            order_direction: OrderDirection::Desc,
        }
    }
}

impl MessageQuery {
    /// Parse raw query-string values, collecting one error per bad field.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        order_by: Option<&str>,
        order_direction: Option<&str>,
    ) -> Result<Self, ApiError> {
        let mut errors = Vec::new();
        let mut query = MessageQuery::default();

        if let Some(raw) = page {
            match raw.parse::<u32>() {
                Ok(value) if value >= 1 => query.page = value,
                _ => errors.push(FieldError::new("page", "page must be a positive integer")),
            }
        }
        if let Some(raw) = limit {
            match raw.parse::<u32>() {
                Ok(value) if (1..=MAX_PAGE_LIMIT).contains(&value) => query.limit = value,
                _ => errors.push(FieldError::new(
                    "limit",
                    "limit must be between 1 and 100",
                )),
            }
        }
        if let Some(raw) = order_by {
            match raw {
                "createdAt" => query.order_by = OrderBy::CreatedAt,
                "updatedAt" => query.order_by = OrderBy::UpdatedAt,
                _ => errors.push(FieldError::new(
                    "orderBy",
                    "orderBy must be one of createdAt, updatedAt",
                )),
            }
        }
        if let Some(raw) = order_direction {
            match raw {
                "asc" => query.order_direction = OrderDirection::Asc,
                "desc" => query.order_direction = OrderDirection::Desc,
                _ => errors.push(FieldError::new(
                    "orderDirection",
                    "orderDirection must be one of asc, desc",
                )),
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Insert a broadcast message for `sender_id` and return the stored row.
pub async fn insert_message(
    pool: &PgPool,
    sender_id: i64,
    content: &str,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (content, sender_id, receiver_id)
        VALUES ($1, $2, $2)
        RETURNING id, content, sender_id, receiver_id, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(sender_id)
    .fetch_one(pool)
    .await
}

/// Fetch one page of messages joined with each sender's public identity.
pub async fn list_page(
    pool: &PgPool,
    query: &MessageQuery,
) -> Result<Vec<MessageWithSender>, sqlx::Error> {
    // Column and direction come from validated enums, never from raw input.
    let sql = format!(
        r#"
        SELECT m.id, m.content, m.sender_id, m.receiver_id, m.created_at, m.updated_at,
               u.name AS sender_name, u.color AS sender_color
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        ORDER BY m.{} {}
        LIMIT $1 OFFSET $2
        "#,
        query.order_by.column(),
        query.order_direction.keyword(),
    );

    let rows = sqlx::query_as::<_, MessageWithSenderRow>(&sql)
        .bind(i64::from(query.limit))
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(MessageWithSender::from).collect())
}

pub async fn count_messages(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let query = MessageQuery::parse(None, None, None, None).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(query.order_by, OrderBy::CreatedAt);
        assert_eq!(query.order_direction, OrderDirection::Desc);
    }

    #[test]
    fn test_parse_explicit_values() {
        let query =
            MessageQuery::parse(Some("3"), Some("5"), Some("updatedAt"), Some("asc")).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 5);
        assert_eq!(query.order_by, OrderBy::UpdatedAt);
        assert_eq!(query.order_direction, OrderDirection::Asc);
        assert_eq!(query.offset(), 10);
    }

    #[test]
    fn test_parse_collects_every_bad_field() {
        let err = MessageQuery::parse(Some("zero"), Some("0"), Some("id"), Some("down"))
            .unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                let paths: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
                assert_eq!(paths, vec!["page", "limit", "orderBy", "orderDirection"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_page_zero() {
        assert!(MessageQuery::parse(Some("0"), None, None, None).is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_limit() {
        let err = MessageQuery::parse(None, Some("4294967295"), None, None).unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields[0].path, "limit");
                assert_eq!(fields[0].message, "limit must be between 1 and 100");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(MessageQuery::parse(None, Some("101"), None, None).is_err());
        assert!(MessageQuery::parse(None, Some("100"), None, None).is_ok());
    }

    #[test]
    fn test_offset_never_overflows_for_accepted_input() {
        let query = MessageQuery::parse(Some("4294967295"), Some("100"), None, None).unwrap();
        // Largest accepted page and limit stay well inside i64.
        assert_eq!(query.offset(), (u32::MAX as i64 - 1) * 100);
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let message = Message {
            id: 1,
            content: "hi".to_string(),
            sender_id: 2,
            receiver_id: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert!(value.get("senderId").is_some());
        assert!(value.get("receiverId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("sender_id").is_none());
    }
}
