//! Reports API Handlers (仅管理员)

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::models::{DailyRevenue, DailySummary};

use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::db::repository::daily_revenue;
use crate::reports;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD`; 缺省为今天
    pub date: Option<String>,
}

/// GET /api/reports/daily-summary?date=YYYY-MM-DD
///
/// 从支付/支出记录重算当日汇总（收入、支出、净利、订单数）。
pub async fn daily_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DailySummary>> {
    let date = query.date.unwrap_or_else(shared::util::business_date);
    let summary = reports::get_daily_summary(&state.db.pool, &user, &date).await?;
    Ok(Json(summary))
}

/// GET /api/reports/daily-revenue?date=YYYY-MM-DD
///
/// 结账时增量维护的营收聚合行（与重算汇总相互独立）。
pub async fn daily_revenue(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DailyRevenue>> {
    policy::authorize(&user, Action::ViewRevenue).map_err(AppError::from)?;

    let date = query.date.unwrap_or_else(shared::util::business_date);
    let revenue = daily_revenue::find_by_date(&state.db.pool, &date)
        .await
        .map_err(AppError::from)?
        .unwrap_or(DailyRevenue {
            business_date: date,
            cash_total: 0.0,
            online_total: 0.0,
            updated_at: 0,
        });
    Ok(Json(revenue))
}
