//! Oolong Floor Server - 茶餐厅门店运营服务
//!
//! # 架构概述
//!
//! 单店茶餐厅的后台：点单、厨房进度、桌台占用、结账与日营收核算。
//!
//! - **订单核心** (`orders`): 订单状态机 + 原子结账事务
//! - **授权策略** (`auth::policy`): 纯函数权限判定
//! - **数据库** (`db`): SQLite (WAL) + sqlx 迁移
//! - **审计** (`audit`): SHA256 哈希链追踪
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! floor-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、授权策略
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (repository)
//! ├── orders/        # 订单生命周期 + 结账引擎
//! ├── reports/       # 营收报表
//! ├── audit/         # 审计日志
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderError;
pub use utils::{AppError, AppResponse, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        std::env::var("LOG_DIR").ok().as_deref(),
    );
}

pub fn print_banner() {
    println!(
        r#"
   ____  ____  __
  / __ \/ __ \/ /___  ____  ____ _
 / / / / / / / / __ \/ __ \/ __ `/
/ /_/ / /_/ / / /_/ / / / / /_/ /
\____/\____/_/\____/_/ /_/\__, /
                         /____/
        floor server
    "#
    );
}
