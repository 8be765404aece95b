//! platestock — plate warehouse inventory service
//!
//! Records stock per plate size, ingests scanned pallet deliveries through a
//! pending-approval queue, and logs every stock movement to an append-only
//! transaction ledger. Serves the JSON API behind the warehouse dashboard.
//!
//! ```text
//! src/
//! ├── config.rs      # environment configuration
//! ├── state.rs       # shared state (connection pool)
//! ├── error.rs       # error taxonomy + HTTP mapping
//! ├── intake.rs      # scan-record parsing, pallet-id suggestion
//! ├── db/            # sqlx data access per table
//! └── api/           # axum handlers and router
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod intake;
pub mod state;

pub use config::Config;
pub use error::{ApiResult, AppError};
pub use state::AppState;
