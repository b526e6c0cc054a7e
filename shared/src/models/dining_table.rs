//! Dining Table Model (桌台)

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum TableStatus {
    Empty,
    Occupied,
}

/// Dining table
///
/// Occupancy is owned collectively by the floor: any verified user flips it
/// to occupied on order creation, settlement flips it back to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Unique table number as printed on the floor plan
    pub number: i64,
    pub status: TableStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create table payload (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
}
