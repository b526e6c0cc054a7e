//! Expense Model (支出)

use serde::{Deserialize, Serialize};

/// Expense record — independent of orders; only feeds the daily summary
/// subtraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub recorded_by: i64,
    /// Calendar date the expense counts toward
    pub business_date: String,
    pub created_at: i64,
}

/// Create expense payload (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreate {
    pub title: String,
    pub amount: f64,
}
