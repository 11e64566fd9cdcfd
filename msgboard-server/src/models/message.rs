//! Message entity and content validation

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::ValidationError;

/// Message record as stored in the `messages` table.
///
/// Serializes to the wire shape `{"id", "content", "createdAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create new message content.
    ///
    /// Empty content is rejected; nothing else is checked.
    ///
    /// # Example
    /// ```
    /// use msgboard_server::models::MessageContent;
    ///
    /// assert!(MessageContent::new("hello").is_ok());
    /// assert!(MessageContent::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn valid_content() {
        assert!(MessageContent::new("hello").is_ok());
        // Whitespace is content; only the empty string is rejected
        assert!(MessageContent::new(" ").is_ok());
    }

    #[test]
    fn empty_content_rejected() {
        let err = MessageContent::new("").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "content" });
    }

    #[test]
    fn serializes_camel_case() {
        let msg = Message {
            id: 1,
            content: "hello".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["content"], "hello");
        assert_eq!(value["createdAt"], "2024-05-01T12:00:00Z");
        assert!(value.get("created_at").is_none());
    }
}
