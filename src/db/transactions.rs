//! Transaction ledger operations
//!
//! The ledger is append-only: rows are inserted inside approval and manual
//! adjustment transactions and never updated or deleted individually.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppError;

/// Stock movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Parse a wire value; anything but `in` or `out` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Provenance of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Qr,
    Manual,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Manual => "manual",
        }
    }
}

/// One ledger row. The movement direction serializes as `type` to match
/// the dashboard contract.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: i64,
    pub plate_size: String,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub direction: String,
    pub source: String,
    pub batch_id: Option<String>,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

/// Aggregate dashboard counters, computed on read
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_plates: i64,
    pub low_stock: i64,
    pub pending_deliveries: i64,
}

/// Append one ledger row inside the caller's transaction.
pub async fn append(
    tx: &mut Transaction<'_, Postgres>,
    plate_size: &str,
    quantity: i32,
    direction: Direction,
    source: Source,
    batch_id: Option<&str>,
    notes: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO transactions (plate_size, quantity, direction, source, batch_id, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(plate_size)
    .bind(quantity)
    .bind(direction.as_str())
    .bind(source.as_str())
    .bind(batch_id)
    .bind(notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Most recent ledger entries, newest first.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<TransactionRecord>, AppError> {
    let rows: Vec<TransactionRecord> = sqlx::query_as(
        r#"
        SELECT id, plate_size, quantity, direction, source, batch_id, notes,
               created_at AS date
        FROM transactions
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Clamp a requested ledger page size: default 100, at most 500.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(100).clamp(1, 500)
}

/// Read-only summary view backing the dashboard header.
pub async fn aggregate_counts(pool: &PgPool) -> Result<Stats, AppError> {
    let (total_plates, low_stock): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE quantity <= threshold) FROM plates",
    )
    .fetch_one(pool)
    .await?;

    let pending_deliveries: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inbound_queue WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    Ok(Stats {
        total_plates,
        low_stock,
        pending_deliveries,
    })
}
