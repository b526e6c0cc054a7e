//! 审计日志服务
//!
//! 两条写入路径，对应两类调用方：
//! - [`AuditService::log`] — mpsc 异步写入，用于登录、管理类 CRUD 等
//!   不要求与业务写入同事务的场景
//! - [`storage::append`] — 同步写入，订单创建/编辑与结账在各自的
//!   SQLite 事务内直接调用，保证审计记录与业务效果一起提交或回滚

use sqlx::SqlitePool;
use tokio::sync::mpsc;

use super::storage::{self, AuditRecord};

/// 审计日志服务句柄（可廉价 Clone）
#[derive(Clone)]
pub struct AuditService {
    tx: mpsc::Sender<AuditRecord>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务并启动后台写入任务
    pub fn spawn(pool: SqlitePool, buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);
        tokio::spawn(run_worker(pool, rx));
        Self { tx }
    }

    /// 异步写入一条审计记录（fire-and-forget）
    ///
    /// 通道满或已关闭时记录丢弃并打 warning — 审计积压不应反压业务请求。
    pub fn log(&self, record: AuditRecord) {
        if let Err(e) = self.tx.try_send(record) {
            tracing::warn!(error = %e, "Audit log channel unavailable, entry dropped");
        }
    }
}

/// 后台写入任务：逐条落库
async fn run_worker(pool: SqlitePool, mut rx: mpsc::Receiver<AuditRecord>) {
    while let Some(record) = rx.recv().await {
        let mut conn = match pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "Audit worker failed to acquire connection");
                continue;
            }
        };
        if let Err(e) = storage::append(&mut conn, record).await {
            tracing::error!(error = %e, "Failed to persist audit entry");
        }
    }
    tracing::debug!("Audit worker stopped (channel closed)");
}
