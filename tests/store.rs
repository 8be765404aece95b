//! Store-backed workflow tests: approval effects, terminal states, stock
//! checks, duplicate pallet ids and partial bulk import.
//!
//! These need a live PostgreSQL instance. Point DATABASE_URL at one and run
//! `cargo test -- --ignored`.

use platestock::db::transactions::Direction;
use platestock::db::{inbound, plates};
use platestock::error::AppError;
use platestock::intake;
use sqlx::PgPool;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for store tests");
    let pool = PgPool::connect(&url).await.expect("connect");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");
    pool
}

// Random identifiers so tests stay independent of each other and of
// whatever is already in the database.
fn unique_size() -> String {
    format!("{}x{}", rand::random::<u32>(), rand::random::<u32>())
}

fn unique_batch() -> String {
    format!("PLT{}", rand::random::<u64>())
}

async fn plate_quantity(pool: &PgPool, size: &str) -> Option<i32> {
    sqlx::query_scalar("SELECT quantity FROM plates WHERE size = $1")
        .bind(size)
        .fetch_optional(pool)
        .await
        .expect("query plate quantity")
}

async fn ledger_rows(pool: &PgPool, batch_id: &str) -> Vec<(String, i32, String, String)> {
    sqlx::query_as(
        "SELECT plate_size, quantity, direction, source FROM transactions WHERE batch_id = $1",
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await
    .expect("query ledger")
}

#[tokio::test]
#[ignore]
async fn approve_applies_stock_and_logs_one_qr_entry() {
    let pool = connect().await;
    let size = unique_size();
    let batch = unique_batch();

    let record = intake::parse_scan(&format!("{size}|10|25|{batch}")).unwrap();
    inbound::insert_pending(&pool, &record).await.unwrap();
    // intake auto-registers the size at zero
    assert_eq!(plate_quantity(&pool, &size).await, Some(0));

    inbound::approve(&pool, &batch).await.unwrap();
    assert_eq!(plate_quantity(&pool, &size).await, Some(250));

    let rows = ledger_rows(&pool, &batch).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], (size.clone(), 250, "in".into(), "qr".into()));

    // approved is terminal: neither a second approval nor a rejection lands
    assert!(matches!(
        inbound::approve(&pool, &batch).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        inbound::reject(&pool, &batch).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(plate_quantity(&pool, &size).await, Some(250));
    assert_eq!(ledger_rows(&pool, &batch).await.len(), 1);
}

#[tokio::test]
#[ignore]
async fn reject_changes_only_the_status() {
    let pool = connect().await;
    let size = unique_size();
    let batch = unique_batch();

    let record = intake::parse_scan(&format!("{size}|4|5|{batch}")).unwrap();
    inbound::insert_pending(&pool, &record).await.unwrap();

    inbound::reject(&pool, &batch).await.unwrap();

    let status: String = sqlx::query_scalar("SELECT status FROM inbound_queue WHERE batch_id = $1")
        .bind(&batch)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "rejected");
    assert_eq!(plate_quantity(&pool, &size).await, Some(0));
    assert!(ledger_rows(&pool, &batch).await.is_empty());

    assert!(matches!(
        inbound::reject(&pool, &batch).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        inbound::approve(&pool, &batch).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn manual_out_cannot_exceed_stock() {
    let pool = connect().await;
    let size = unique_size();

    plates::create_plate(&pool, &size, 10, 5).await.unwrap();

    let err = plates::adjust_stock(&pool, &size, 25, Direction::Out, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));
    assert_eq!(plate_quantity(&pool, &size).await, Some(10));

    let plate = plates::adjust_stock(&pool, &size, 4, Direction::Out, Some("damaged"))
        .await
        .unwrap();
    assert_eq!(plate.quantity, 6);

    let manual: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE plate_size = $1 AND source = 'manual'",
    )
    .bind(&size)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(manual, 1);
}

#[tokio::test]
#[ignore]
async fn manual_adjustment_on_unknown_plate_is_not_found() {
    let pool = connect().await;
    let err = plates::adjust_stock(&pool, &unique_size(), 1, Direction::In, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn duplicate_pallet_id_is_rejected_without_mutation() {
    let pool = connect().await;
    let size = unique_size();
    let batch = unique_batch();

    let record = intake::parse_scan(&format!("{size}|2|10|{batch}")).unwrap();
    inbound::insert_pending(&pool, &record).await.unwrap();

    let err = inbound::insert_pending(&pool, &record).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let queued: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inbound_queue WHERE batch_id = $1")
        .bind(&batch)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(queued, 1);
}

#[tokio::test]
#[ignore]
async fn import_commits_valid_lines_and_reports_the_bad_one() {
    let pool = connect().await;
    let (s1, s2, s3) = (unique_size(), unique_size(), unique_size());
    let (b1, b3) = (unique_batch(), unique_batch());

    let data = format!(
        "{s1}|10|25|{b1}\n{s2}|ten|25|{}\n{s3}|2|10|{b3}",
        unique_batch()
    );
    let outcome = inbound::import(&pool, &data).await.unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.errors, vec!["Line 2: Boxes must be a number"]);

    for batch in [&b1, &b3] {
        let status: String =
            sqlx::query_scalar("SELECT status FROM inbound_queue WHERE batch_id = $1")
                .bind(batch)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "pending");
    }

    // the committed pallet ids are now taken, for single intake and re-import alike
    let record = intake::parse_scan(&format!("{s1}|1|1|{b1}")).unwrap();
    assert!(matches!(
        inbound::insert_pending(&pool, &record).await,
        Err(AppError::Conflict(_))
    ));
    let again = inbound::import(&pool, &data).await.unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.errors.len(), 3);
}
