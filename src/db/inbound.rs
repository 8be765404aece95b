//! Inbound delivery queue operations
//!
//! Deliveries enter as `pending` and take exactly one transition, to
//! `approved` or `rejected`. Only approval touches the registry and the
//! ledger, and it does so in the same database transaction as the status
//! flip.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Acquire, PgPool, Postgres, Transaction};

use crate::db::plates;
use crate::db::transactions::{self, Direction, Source};
use crate::error::AppError;
use crate::intake::{self, ScanRecord};

/// One inbound delivery, pending or settled
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Delivery {
    pub id: i64,
    pub plate_size: String,
    pub quantity: i32,
    pub batch_id: String,
    pub status: String,
    pub boxes: Option<i32>,
    pub plates_per_box: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a bulk import: how many lines committed, and an ordered list
/// of per-line error strings for the rest.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Insert one scanned record as a pending delivery. The plate size is
/// auto-registered at quantity 0 so it shows on the dashboard immediately;
/// a duplicate pallet id rolls that back along with everything else.
pub async fn insert_pending(pool: &PgPool, record: &ScanRecord) -> Result<Delivery, AppError> {
    let mut tx = pool.begin().await?;
    let delivery = insert_line(&mut tx, record).await?;
    tx.commit().await?;
    Ok(delivery)
}

/// Insert one record inside the caller's transaction. The existence
/// pre-check turns a pallet id already in the store into a clean Conflict;
/// the UNIQUE constraint catches anything racing in from another
/// connection.
async fn insert_line(
    tx: &mut Transaction<'_, Postgres>,
    record: &ScanRecord,
) -> Result<Delivery, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM inbound_queue WHERE batch_id = $1)")
            .bind(&record.pallet_id)
            .fetch_one(&mut **tx)
            .await?;
    if exists {
        return Err(AppError::conflict(format!(
            "Pallet ID {} already exists",
            record.pallet_id
        )));
    }

    plates::ensure_plate(tx, &record.plate_size).await?;

    let delivery: Delivery = sqlx::query_as(
        r#"
        INSERT INTO inbound_queue (plate_size, quantity, batch_id, boxes, plates_per_box)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, plate_size, quantity, batch_id, status, boxes, plates_per_box,
                  created_at AS timestamp
        "#,
    )
    .bind(&record.plate_size)
    .bind(record.total_quantity)
    .bind(&record.pallet_id)
    .bind(record.boxes)
    .bind(record.plates_per_box)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref d) = e
            && d.is_unique_violation()
        {
            return AppError::conflict(format!("Pallet ID {} already exists", record.pallet_id));
        }
        e.into()
    })?;

    Ok(delivery)
}

/// Pending deliveries, oldest first.
pub async fn list_pending(pool: &PgPool) -> Result<Vec<Delivery>, AppError> {
    let rows: Vec<Delivery> = sqlx::query_as(
        r#"
        SELECT id, plate_size, quantity, batch_id, status, boxes, plates_per_box,
               created_at AS timestamp
        FROM inbound_queue
        WHERE status = 'pending'
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Approve a pending delivery: status flip, stock increment and ledger row
/// in one transaction. The conditional UPDATE is the serialization point —
/// a second approval (or rejection) of the same batch id matches zero rows
/// and fails with NotFound.
pub async fn approve(pool: &PgPool, batch_id: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<(String, i32)> = sqlx::query_as(
        r#"
        UPDATE inbound_queue SET status = 'approved'
        WHERE batch_id = $1 AND status = 'pending'
        RETURNING plate_size, quantity
        "#,
    )
    .bind(batch_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((plate_size, quantity)) = row else {
        return Err(AppError::not_found("Pending delivery not found"));
    };

    // Unknown sizes are created at zero, then the increment applies
    plates::ensure_plate(&mut tx, &plate_size).await?;
    sqlx::query("UPDATE plates SET quantity = quantity + $2 WHERE size = $1")
        .bind(&plate_size)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

    transactions::append(
        &mut tx,
        &plate_size,
        quantity,
        Direction::In,
        Source::Qr,
        Some(batch_id),
        None,
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Reject a pending delivery. Status flip only; registry and ledger are
/// untouched.
pub async fn reject(pool: &PgPool, batch_id: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE inbound_queue SET status = 'rejected'
        WHERE batch_id = $1 AND status = 'pending'
        "#,
    )
    .bind(batch_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Pending delivery not found"));
    }
    Ok(())
}

/// Walk raw import text into per-line parse outcomes.
///
/// A first line that is a literal column header is skipped, blank lines are
/// ignored, and original line numbers are kept so error messages point at
/// the operator's file. A pallet id repeated within the batch is flagged on
/// its later lines; duplicates against the store are left to insert time.
fn plan_import(data: &str) -> Vec<(usize, Result<ScanRecord, AppError>)> {
    let mut seen = HashSet::new();
    let mut plan = Vec::new();
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if idx == 0 && intake::is_header_line(line) {
            continue;
        }
        let outcome = intake::parse_scan(line).and_then(|record| {
            if seen.insert(record.pallet_id.clone()) {
                Ok(record)
            } else {
                Err(AppError::conflict(format!(
                    "Pallet ID {} already exists",
                    record.pallet_id
                )))
            }
        });
        plan.push((idx + 1, outcome));
    }
    plan
}

/// Bulk import of newline-delimited scan records.
///
/// Lines are validated independently and failures collected in order, so
/// one bad line never blocks the rest; the lines that do pass commit
/// together as one group. Each insert runs under its own savepoint: a
/// duplicate racing in from another connection fails that line alone
/// instead of poisoning the rest of the transaction. Only validation and
/// duplicate failures are tolerated per line — an infrastructure error
/// aborts and rolls back the whole import.
pub async fn import(pool: &PgPool, data: &str) -> Result<ImportOutcome, AppError> {
    let mut tx = pool.begin().await?;
    let mut imported = 0usize;
    let mut errors = Vec::new();

    for (line_no, parsed) in plan_import(data) {
        let record = match parsed {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Line {line_no}: {e}"));
                continue;
            }
        };

        let mut sp = tx.begin().await?;
        match insert_line(&mut sp, &record).await {
            Ok(_) => {
                sp.commit().await?;
                imported += 1;
            }
            Err(e @ AppError::Conflict(_)) => {
                sp.rollback().await?;
                errors.push(format!("Line {line_no}: {e}"));
            }
            Err(e) => return Err(e),
        }
    }

    tx.commit().await?;
    Ok(ImportOutcome { imported, errors })
}
