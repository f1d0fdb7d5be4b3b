use crate::error::{JournalError, Result};
use crate::models::{EntryRow, JournalEntry, NewEntry, SentimentLabel};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Per-owner journal entry storage.
///
/// Every operation is scoped to `owner_id`; an entry owned by someone else is
/// reported as not found.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create_entry(&self, owner_id: Uuid, entry: NewEntry) -> Result<JournalEntry>;

    /// Entries newest first
    async fn list_entries(&self, owner_id: Uuid) -> Result<Vec<JournalEntry>>;

    async fn get_entry(&self, owner_id: Uuid, entry_id: Uuid) -> Result<JournalEntry>;

    async fn update_entry(
        &self,
        owner_id: Uuid,
        entry_id: Uuid,
        entry: NewEntry,
    ) -> Result<JournalEntry>;

    async fn delete_entry(&self, owner_id: Uuid, entry_id: Uuid) -> Result<()>;

    /// Sentiment labels of all the owner's entries
    async fn list_sentiments(&self, owner_id: Uuid) -> Result<Vec<SentimentLabel>>;
}

/// Connect to PostgreSQL
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout_secs: u64,
) -> Result<PgPool> {
    tracing::debug!(
        max_connections,
        acquire_timeout_secs,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// PostgreSQL-backed entry store
pub struct PgEntryStore {
    pool: Arc<PgPool>,
}

impl PgEntryStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn not_found(entry_id: Uuid) -> JournalError {
    JournalError::EntryNotFound(entry_id.to_string())
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn create_entry(&self, owner_id: Uuid, entry: NewEntry) -> Result<JournalEntry> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO journal_entries (
                id,
                owner_id,
                title,
                content,
                sentiment,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, owner_id, title, content, sentiment, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.sentiment.as_str())
        .bind(now)
        .fetch_one(&*self.pool)
        .await?;

        tracing::info!(
            entry_id = %row.id,
            owner_id = %owner_id,
            sentiment = %entry.sentiment,
            "Journal entry created"
        );

        JournalEntry::try_from(row)
    }

    async fn list_entries(&self, owner_id: Uuid) -> Result<Vec<JournalEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, owner_id, title, content, sentiment, created_at, updated_at
            FROM journal_entries
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(JournalEntry::try_from).collect()
    }

    async fn get_entry(&self, owner_id: Uuid, entry_id: Uuid) -> Result<JournalEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, owner_id, title, content, sentiment, created_at, updated_at
            FROM journal_entries
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(entry_id)
        .bind(owner_id)
        .fetch_optional(&*self.pool)
        .await?
        .ok_or_else(|| not_found(entry_id))?;

        JournalEntry::try_from(row)
    }

    async fn update_entry(
        &self,
        owner_id: Uuid,
        entry_id: Uuid,
        entry: NewEntry,
    ) -> Result<JournalEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE journal_entries
            SET title = $3, content = $4, sentiment = $5, updated_at = $6
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, content, sentiment, created_at, updated_at
            "#,
        )
        .bind(entry_id)
        .bind(owner_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.sentiment.as_str())
        .bind(Utc::now())
        .fetch_optional(&*self.pool)
        .await?
        .ok_or_else(|| not_found(entry_id))?;

        tracing::info!(
            entry_id = %entry_id,
            owner_id = %owner_id,
            sentiment = %entry.sentiment,
            "Journal entry updated"
        );

        JournalEntry::try_from(row)
    }

    async fn delete_entry(&self, owner_id: Uuid, entry_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND owner_id = $2")
            .bind(entry_id)
            .bind(owner_id)
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(entry_id));
        }

        tracing::info!(entry_id = %entry_id, owner_id = %owner_id, "Journal entry deleted");
        Ok(())
    }

    async fn list_sentiments(&self, owner_id: Uuid) -> Result<Vec<SentimentLabel>> {
        let labels = sqlx::query_scalar::<_, String>(
            "SELECT sentiment FROM journal_entries WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&*self.pool)
        .await?;

        labels
            .into_iter()
            .map(|label| {
                label
                    .parse::<SentimentLabel>()
                    .map_err(|e| JournalError::Internal(e.to_string()))
            })
            .collect()
    }
}
