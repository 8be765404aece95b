//! Database access layer

pub mod inbound;
pub mod plates;
pub mod transactions;

use sqlx::PgPool;

use crate::error::AppError;

/// Destructive bulk reset: empties all three tables in one statement.
pub async fn reset_all(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("TRUNCATE plates, inbound_queue, transactions RESTART IDENTITY")
        .execute(pool)
        .await?;
    Ok(())
}
