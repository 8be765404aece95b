//! Scan-record parsing and pallet-id suggestion
//!
//! Pure string handling for the intake side: one pipe-delimited record per
//! scanned pallet label, `plate_size|boxes|plates_per_box|pallet_id`.
//! Duplicate pallet-id detection lives in the db layer; everything here is
//! stateless.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::AppError;

/// `WIDTHxHEIGHT`, both sides plain digit runs
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+x\d+$").unwrap());

pub fn is_valid_size(size: &str) -> bool {
    SIZE_RE.is_match(size)
}

/// One validated scan record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord {
    pub plate_size: String,
    pub boxes: i32,
    pub plates_per_box: i32,
    pub pallet_id: String,
    pub total_quantity: i32,
}

/// Parse one scan record.
///
/// Checks run in a fixed order (field count, numeric counts, positive
/// counts, pallet id present, size format) so bulk import reports a
/// deterministic first error per line.
pub fn parse_scan(raw: &str) -> Result<ScanRecord, AppError> {
    let parts: Vec<&str> = raw.trim().split('|').collect();
    if parts.len() != 4 {
        return Err(AppError::validation(
            "Invalid pallet format: expected plate_size|boxes|plates_per_box|pallet_id",
        ));
    }

    let plate_size = parts[0].trim();
    let boxes: i32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Boxes must be a number"))?;
    let plates_per_box: i32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Plates per box must be a number"))?;
    if boxes <= 0 || plates_per_box <= 0 {
        return Err(AppError::validation(
            "Boxes and plates per box must be greater than zero",
        ));
    }

    let pallet_id = parts[3].trim();
    if pallet_id.is_empty() {
        return Err(AppError::validation("Pallet ID must not be empty"));
    }
    if !is_valid_size(plate_size) {
        return Err(AppError::validation(format!(
            "Invalid plate size: {plate_size}"
        )));
    }

    Ok(ScanRecord {
        plate_size: plate_size.to_string(),
        boxes,
        plates_per_box,
        pallet_id: pallet_id.to_string(),
        total_quantity: boxes * plates_per_box,
    })
}

/// A first import line is skipped only when it is a literal column header.
pub fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("plate_size") && lower.contains("boxes")
}

/// Suggest a pallet id: `PLT` + last six digits of the unix timestamp + a
/// three-digit random suffix. Convenience for the operator form; uniqueness
/// is enforced at insert time, not here.
pub fn generate_pallet_id() -> String {
    let ts = chrono::Utc::now().timestamp().to_string();
    let tail = &ts[ts.len().saturating_sub(6)..];
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("PLT{tail}{suffix:03}")
}
