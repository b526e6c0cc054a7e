//! Order core — lifecycle engine and payment settlement engine
//!
//! # Mutation Flow
//!
//! ```text
//! request
//!     ├─ 1. Authorization policy gate (caller role / ownership / status)
//!     ├─ 2. Begin SQLite transaction
//!     ├─ 3. Status-guarded writes (orders / dining_table / payment / daily_revenue)
//!     ├─ 4. Audit entry appended inside the same transaction
//!     └─ 5. Commit — all effects land together or none do
//! ```
//!
//! Plain status advances skip steps 4 and run as a single statement; they
//! are the one deliberately unaudited mutation (low stakes, high frequency).

pub mod lifecycle;
pub mod money;
pub mod settlement;

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Order core errors
#[derive(Debug, Error)]
pub enum OrderError {
    // ========== Not found ==========
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    // ========== Authorization ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Only the order's creator may edit it")]
    NotOwner,

    #[error("Delivered orders can only be edited by an admin")]
    TooLateToEdit,

    // ========== State ==========
    #[error("Order is paid and can no longer be modified")]
    OrderFinalized,

    #[error("Order already paid: {0}")]
    AlreadyPaid(String),

    #[error("Order must be delivered before settlement: {0}")]
    NotYetDelivered(String),

    #[error("Table is already occupied: {0}")]
    TableOccupied(i64),

    // ========== Validation ==========
    #[error("Order must contain at least one item")]
    NoItems,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid payment method: {0}")]
    InvalidMethod(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Split payment must be greater than zero")]
    ZeroPayment,

    #[error("Split amounts ({cash:.2} cash + {online:.2} online) do not match order total {total:.2}")]
    AmountMismatch { cash: f64, online: f64, total: f64 },

    // ========== Infrastructure ==========
    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_)
            | OrderError::TableNotFound(_)
            | OrderError::MenuItemNotFound(_) => AppError::NotFound(err.to_string()),

            OrderError::Forbidden(_) | OrderError::NotOwner | OrderError::TooLateToEdit => {
                AppError::Forbidden(err.to_string())
            }

            OrderError::OrderFinalized
            | OrderError::AlreadyPaid(_)
            | OrderError::NotYetDelivered(_)
            | OrderError::TableOccupied(_) => AppError::Conflict(err.to_string()),

            OrderError::NoItems
            | OrderError::InvalidAmount(_)
            | OrderError::InvalidMethod(_)
            | OrderError::ZeroPayment
            | OrderError::AmountMismatch { .. } => AppError::Validation(err.to_string()),

            OrderError::InvalidTransition(_) => AppError::BusinessRule(err.to_string()),

            OrderError::Storage(RepoError::NotFound(msg)) => AppError::NotFound(msg),
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
