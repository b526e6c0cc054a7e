//! Payment Model (支付记录)

use serde::{Deserialize, Serialize};

/// Payment method
///
/// Payment records only ever carry `Cash` or `Online`; `Split` exists on the
/// order as a presentation-level union of the two records it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Online,
    Split,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Online => "ONLINE",
            PaymentMethod::Split => "SPLIT",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s.to_ascii_uppercase().as_str() {
            "CASH" => Some(PaymentMethod::Cash),
            "ONLINE" => Some(PaymentMethod::Online),
            "SPLIT" => Some(PaymentMethod::Split),
            _ => None,
        }
    }
}

/// Payment record — created exactly once per (order, method) at settlement,
/// never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    pub amount: f64,
    pub recorded_by: i64,
    pub recorded_by_name: String,
    /// Calendar date the payment counts toward, stamped at settlement
    pub business_date: String,
    pub created_at: i64,
}

/// Split settlement request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitSettlementRequest {
    pub cash_amount: f64,
    pub online_amount: f64,
}

/// Single-method settlement result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
}

/// Split settlement result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReceipt {
    pub order_id: String,
    pub cash_amount: f64,
    pub online_amount: f64,
    pub total: f64,
}
