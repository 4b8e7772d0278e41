//! Interaction log storage
//!
//! Every inline search and every selection produces one
//! [`InteractionLogRecord`]. Records are only ever inserted; nothing in the
//! bot reads them back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the user did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Search,
    Selection,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Search => "search",
            ActionKind::Selection => "selection",
        }
    }
}

/// Copy of the Telegram user fields at the time of the action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl From<&teloxide::types::User> for UserSnapshot {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            telegram_id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            language_code: user.language_code.clone(),
        }
    }
}

/// One logged user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLogRecord {
    pub action: ActionKind,
    pub user: UserSnapshot,
    /// Query text for searches, taxon id for selections
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl InteractionLogRecord {
    pub fn new(action: ActionKind, user: UserSnapshot, payload: impl Into<String>) -> Self {
        Self {
            action,
            user,
            payload: payload.into(),
            created_at: Utc::now(),
        }
    }
}

/// Write-only destination for interaction records
#[async_trait]
pub trait InteractionLogSink: Send + Sync {
    async fn record(&self, record: InteractionLogRecord) -> Result<()>;
}

/// Sink used when no database is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInteractionLog;

#[async_trait]
impl InteractionLogSink for NoopInteractionLog {
    async fn record(&self, record: InteractionLogRecord) -> Result<()> {
        debug!(
            action = record.action.as_str(),
            user_id = record.user.telegram_id,
            "Interaction log disabled, dropping record"
        );
        Ok(())
    }
}

/// Postgres-backed interaction log
#[derive(Debug, Clone)]
pub struct PgInteractionLog {
    pool: PgPool,
}

impl PgInteractionLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to interaction log database")?;
        init_database_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl InteractionLogSink for PgInteractionLog {
    async fn record(&self, record: InteractionLogRecord) -> Result<()> {
        record_interaction(&self.pool, &record).await.map(|_| ())
    }
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing interaction log schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS interaction_log (
            id BIGSERIAL PRIMARY KEY,
            action TEXT NOT NULL,
            telegram_id BIGINT NOT NULL,
            user_snapshot JSONB NOT NULL,
            payload TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create interaction_log table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS interaction_log_telegram_id_idx \
         ON interaction_log (telegram_id)",
    )
    .execute(pool)
    .await
    .context("Failed to create interaction_log index")?;

    info!("Interaction log schema initialized successfully");
    Ok(())
}

/// Insert one record, returning its row id
pub async fn record_interaction(pool: &PgPool, record: &InteractionLogRecord) -> Result<i64> {
    let snapshot = serde_json::to_value(&record.user).context("Failed to serialize user snapshot")?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO interaction_log (action, telegram_id, user_snapshot, payload, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(record.action.as_str())
    .bind(record.user.telegram_id)
    .bind(snapshot)
    .bind(&record.payload)
    .bind(record.created_at)
    .fetch_one(pool)
    .await
    .context("Failed to insert interaction log record")?;

    debug!(id, action = record.action.as_str(), "Interaction recorded");
    Ok(id)
}

/// Hand a record to the sink without waiting for the write
pub fn log_interaction(sink: &Arc<dyn InteractionLogSink>, record: InteractionLogRecord) {
    let sink = Arc::clone(sink);
    tokio::spawn(async move {
        let action = record.action.as_str();
        let user_id = record.user.telegram_id;
        if let Err(e) = sink.record(record).await {
            warn!(action, user_id, error = %e, "Failed to write interaction log record");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            telegram_id: 12345,
            username: Some("naturalist".to_string()),
            first_name: "Ada".to_string(),
            last_name: None,
            language_code: Some("fr".to_string()),
        }
    }

    #[test]
    fn test_record_serialization() {
        let record = InteractionLogRecord::new(ActionKind::Search, snapshot(), "panthera");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["action"], "search");
        assert_eq!(json["user"]["telegram_id"], 12345);
        assert_eq!(json["user"]["last_name"], serde_json::Value::Null);
        assert_eq!(json["payload"], "panthera");
    }

    #[test]
    fn test_action_kind_strings() {
        assert_eq!(ActionKind::Search.as_str(), "search");
        assert_eq!(ActionKind::Selection.as_str(), "selection");
    }

    #[tokio::test]
    async fn test_noop_sink_accepts_records() {
        let sink = NoopInteractionLog;
        let record = InteractionLogRecord::new(ActionKind::Selection, snapshot(), "41970");
        assert!(sink.record(record).await.is_ok());
    }
}
