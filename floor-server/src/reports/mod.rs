//! Revenue reporting
//!
//! The daily summary recomputes from payment records — the ground truth —
//! rather than reading the incrementally maintained `daily_revenue`
//! aggregate. The two sources are deliberately not reconciled; payments are
//! never mutated in normal flow, so they agree unless rows are changed out
//! of band.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use shared::models::DailySummary;

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::db::repository::{expense, payment};
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Validate date format (YYYY-MM-DD)
fn validate_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Compute the daily summary for one calendar date (admin only)
pub async fn get_daily_summary(
    pool: &SqlitePool,
    caller: &CurrentUser,
    date: &str,
) -> AppResult<DailySummary> {
    policy::authorize(caller, Action::ViewRevenue).map_err(AppError::from)?;
    validate_date(date)?;

    let (cash_revenue, online_revenue, order_count) = payment::summarize_date(pool, date)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let total_expenses = expense::sum_by_date(pool, date)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let cash = money::to_decimal(cash_revenue);
    let online = money::to_decimal(online_revenue);
    let expenses = money::to_decimal(total_expenses);
    let revenue = cash + online;

    Ok(DailySummary {
        business_date: date.to_string(),
        total_revenue: money::to_f64(revenue),
        cash_revenue: money::to_f64(cash),
        online_revenue: money::to_f64(online),
        total_expenses: money::to_f64(expenses),
        net_profit: money::to_f64(revenue - expenses),
        order_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_dates() {
        assert!(validate_date("2024-01-01").is_ok());
        assert!(validate_date("01/01/2024").is_err());
        assert!(validate_date("2024-13-40").is_err());
        assert!(validate_date("yesterday").is_err());
    }
}
