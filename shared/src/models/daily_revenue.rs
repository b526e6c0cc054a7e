//! Daily Revenue Model (日营收)

use serde::{Deserialize, Serialize};

/// Per-day running revenue totals, upserted incrementally at each settlement.
///
/// `total_revenue` is derived, never stored — the aggregate cannot drift
/// from its parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyRevenue {
    /// `YYYY-MM-DD`
    pub business_date: String,
    pub cash_total: f64,
    pub online_total: f64,
    pub updated_at: i64,
}

impl DailyRevenue {
    pub fn total_revenue(&self) -> f64 {
        self.cash_total + self.online_total
    }
}

/// Daily summary — read-side recomputation from payment and expense records
/// (ground truth), independent of the incrementally maintained aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub business_date: String,
    pub total_revenue: f64,
    pub cash_revenue: f64,
    pub online_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub order_count: i64,
}
