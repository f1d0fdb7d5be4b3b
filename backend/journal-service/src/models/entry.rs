use super::sentiment::SentimentLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Journal entry as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub sentiment: SentimentLabel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `journal_entries` row
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub sentiment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for JournalEntry {
    type Error = crate::error::JournalError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let sentiment = row.sentiment.parse::<SentimentLabel>().map_err(|e| {
            crate::error::JournalError::Internal(format!("entry {}: {}", row.id, e))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            content: row.content,
            sentiment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Body of entry create and update requests
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntryRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Entry fields written to the store after classification
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub sentiment: SentimentLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sentiment: &str) -> EntryRow {
        EntryRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Monday".into(),
            content: "Went for a walk".into(),
            sentiment: sentiment.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let entry = JournalEntry::try_from(row("positive")).unwrap();
        assert_eq!(entry.sentiment, SentimentLabel::Positive);
        assert_eq!(entry.title, "Monday");
    }

    #[test]
    fn test_row_with_unknown_sentiment_fails() {
        assert!(JournalEntry::try_from(row("ecstatic")).is_err());
    }

    #[test]
    fn test_request_validation() {
        let ok = EntryRequest {
            title: "Today".into(),
            content: "Fine".into(),
        };
        assert!(ok.validate().is_ok());

        let empty_title = EntryRequest {
            title: String::new(),
            content: "Fine".into(),
        };
        assert!(empty_title.validate().is_err());

        let empty_content = EntryRequest {
            title: "Today".into(),
            content: String::new(),
        };
        assert!(empty_content.validate().is_err());

        let long_title = EntryRequest {
            title: "x".repeat(201),
            content: "Fine".into(),
        };
        assert!(long_title.validate().is_err());
    }
}
