use std::sync::Arc;

use shared::models::{EmployeeCreate, Role};

use crate::audit::AuditService;
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::employee;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | audit | AuditService | 审计日志服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 审计日志服务
    pub audit: AuditService,
}

impl ServerState {
    /// 初始化服务器状态：建库、跑迁移、启动审计 worker、播种管理员
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.db_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let audit = AuditService::spawn(db.pool.clone(), config.audit_buffer_size);

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            audit,
        };
        state.seed_default_admin().await?;

        Ok(state)
    }

    /// 首次启动时播种默认管理员账号，否则无人能审核员工
    async fn seed_default_admin(&self) -> Result<(), AppError> {
        let existing = employee::find_all(&self.db.pool)
            .await
            .map_err(AppError::from)?;
        if !existing.is_empty() {
            return Ok(());
        }

        let username =
            std::env::var("DEFAULT_ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let password =
            std::env::var("DEFAULT_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());

        let admin = employee::create(
            &self.db.pool,
            EmployeeCreate {
                username: username.clone(),
                password,
                display_name: "Administrator".into(),
                role: Role::Admin,
            },
        )
        .await
        .map_err(AppError::from)?;
        employee::set_verified(&self.db.pool, admin.id, true)
            .await
            .map_err(AppError::from)?;

        tracing::warn!(
            username,
            "Seeded default admin account — change the password immediately"
        );
        Ok(())
    }
}
