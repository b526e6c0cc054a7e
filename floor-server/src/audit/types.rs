//! 审计日志类型定义
//!
//! 所有条目不可变、不可删除，支持 SHA256 哈希链防篡改。

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,

    // ═══ 订单（财务关键）═══
    /// 新订单开台
    OrderCreated,
    /// 订单内容/状态修改
    OrderEdited,
    /// 单一方式结账
    PaymentConfirmed,
    /// 拆分结账（现金 + 线上）
    SplitPaymentConfirmed,

    // ═══ 管理操作 ═══
    /// 员工创建
    EmployeeCreated,
    /// 员工审核通过
    EmployeeVerified,
    /// 员工审核撤销
    EmployeeRevoked,
    /// 菜单变更
    MenuItemCreated,
    MenuItemUpdated,
    MenuItemDeleted,
    /// 桌台变更
    TableCreated,
    TableDeleted,
    /// 支出记录
    ExpenseRecorded,
    ExpenseDeleted,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 审计日志条目（不可变）
///
/// 每条记录包含 SHA256 哈希链，确保防篡改。
/// - `prev_hash`: 前一条记录的哈希
/// - `curr_hash`: 当前记录的哈希（包含 prev_hash + 所有字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: i64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 资源类型（如 "order", "employee"）
    pub resource_type: String,
    /// 资源 ID
    pub resource_id: String,
    /// 操作人 ID（系统事件为 None）
    pub operator_id: Option<i64>,
    /// 操作人名称
    pub operator_name: Option<String>,
    /// 结构化详情（JSON）
    pub details: serde_json::Value,
    /// 前一条审计日志哈希
    pub prev_hash: String,
    /// 当前记录哈希（SHA256）
    pub curr_hash: String,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// 按资源类型过滤
    pub resource_type: Option<String>,
    /// 按资源 ID 过滤
    pub resource_id: Option<String>,
    /// 返回条数上限（默认 100）
    pub limit: Option<i64>,
    /// 偏移量
    pub offset: Option<i64>,
}

/// 链验证结果
#[derive(Debug, Clone, Serialize)]
pub struct AuditChainVerification {
    /// 链是否完整
    pub valid: bool,
    /// 已检查条数
    pub checked: i64,
    /// 第一条被篡改的记录 ID（链完整时为 None）
    pub broken_at: Option<i64>,
}
