//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`orders`] - 订单与结账接口
//! - [`tables`] - 桌台管理接口
//! - [`menu`] - 菜单管理接口
//! - [`employees`] - 员工管理接口
//! - [`expenses`] - 支出管理接口
//! - [`reports`] - 营收报表接口
//! - [`audit_log`] - 审计日志接口

pub mod audit_log;
pub mod auth;
pub mod employees;
pub mod expenses;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(tables::router())
        .merge(menu::router())
        .merge(employees::router())
        .merge(expenses::router())
        .merge(reports::router())
        .merge(audit_log::router())
}
