//! Plate registry operations

use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::transactions::{self, Direction, Source};
use crate::error::AppError;
use crate::intake;

#[derive(Debug, Clone, sqlx::FromRow)]
struct PlateRow {
    id: i64,
    size: String,
    quantity: i32,
    threshold: i32,
}

/// Wire shape: a registry row plus the derived low-stock status.
#[derive(Debug, Clone, Serialize)]
pub struct Plate {
    pub id: i64,
    pub size: String,
    pub quantity: i32,
    pub threshold: i32,
    pub status: &'static str,
}

impl From<PlateRow> for Plate {
    fn from(r: PlateRow) -> Self {
        let status = if r.quantity <= r.threshold { "low" } else { "ok" };
        Plate {
            id: r.id,
            size: r.size,
            quantity: r.quantity,
            threshold: r.threshold,
            status,
        }
    }
}

pub async fn list_plates(pool: &PgPool) -> Result<Vec<Plate>, AppError> {
    let rows: Vec<PlateRow> =
        sqlx::query_as("SELECT id, size, quantity, threshold FROM plates ORDER BY size")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(Plate::from).collect())
}

/// Register a new plate size. The UNIQUE constraint backs the conflict
/// check, so a racing duplicate still comes back as a clean 400.
pub async fn create_plate(
    pool: &PgPool,
    size: &str,
    quantity: i32,
    threshold: i32,
) -> Result<Plate, AppError> {
    if !intake::is_valid_size(size) {
        return Err(AppError::validation(format!("Invalid plate size: {size}")));
    }

    let row: Option<PlateRow> = sqlx::query_as(
        r#"
        INSERT INTO plates (size, quantity, threshold)
        VALUES ($1, $2, $3)
        ON CONFLICT (size) DO NOTHING
        RETURNING id, size, quantity, threshold
        "#,
    )
    .bind(size)
    .bind(quantity)
    .bind(threshold)
    .fetch_optional(pool)
    .await?;

    row.map(Plate::from)
        .ok_or_else(|| AppError::conflict(format!("Plate {size} already exists")))
}

/// Set quantity and threshold on an existing plate.
pub async fn update_plate(
    pool: &PgPool,
    size: &str,
    quantity: i32,
    threshold: i32,
) -> Result<Plate, AppError> {
    let row: Option<PlateRow> = sqlx::query_as(
        r#"
        UPDATE plates SET quantity = $2, threshold = $3
        WHERE size = $1
        RETURNING id, size, quantity, threshold
        "#,
    )
    .bind(size)
    .bind(quantity)
    .bind(threshold)
    .fetch_optional(pool)
    .await?;

    row.map(Plate::from)
        .ok_or_else(|| AppError::not_found(format!("Plate {size} not found")))
}

/// Create the plate at quantity 0 if the size is not registered yet.
/// Used by intake and approval, inside the caller's transaction.
pub async fn ensure_plate(
    tx: &mut Transaction<'_, Postgres>,
    size: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO plates (size, quantity) VALUES ($1, 0) ON CONFLICT (size) DO NOTHING")
        .bind(size)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Manual stock adjustment: one transaction covering the quantity change
/// and its `manual` ledger row. An `out` larger than current stock fails
/// before anything is written; the row lock from `FOR UPDATE` keeps the
/// stock check and the update atomic under concurrent adjustments.
pub async fn adjust_stock(
    pool: &PgPool,
    size: &str,
    quantity: i32,
    direction: Direction,
    notes: Option<&str>,
) -> Result<Plate, AppError> {
    let mut tx = pool.begin().await?;

    let current: Option<i32> =
        sqlx::query_scalar("SELECT quantity FROM plates WHERE size = $1 FOR UPDATE")
            .bind(size)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| AppError::not_found(format!("Plate {size} not found")))?;

    let delta = match direction {
        Direction::In => quantity,
        Direction::Out => {
            if current < quantity {
                return Err(AppError::insufficient_stock("Not enough stock available"));
            }
            -quantity
        }
    };

    let row: PlateRow = sqlx::query_as(
        r#"
        UPDATE plates SET quantity = quantity + $2
        WHERE size = $1
        RETURNING id, size, quantity, threshold
        "#,
    )
    .bind(size)
    .bind(delta)
    .fetch_one(&mut *tx)
    .await?;

    transactions::append(&mut tx, size, quantity, direction, Source::Manual, None, notes).await?;

    tx.commit().await?;
    Ok(row.into())
}
