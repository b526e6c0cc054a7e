//! Order Model (订单)

use serde::{Deserialize, Serialize};

use super::payment::PaymentMethod;

/// Order status — strict forward progression.
///
/// Variant order is load-bearing: `Ord` on the declaration order is what
/// "strictly forward" means for status transitions. `Paid` is terminal and
/// reachable only through settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Taken,
    Prepared,
    Delivered,
    Paid,
}

impl OrderStatus {
    pub fn is_paid(&self) -> bool {
        *self == OrderStatus::Paid
    }

    /// A plain status move must be strictly forward and must not reach
    /// `Paid` — that transition belongs to the settlement engine.
    pub fn can_advance_to(&self, target: OrderStatus) -> bool {
        target > *self && target != OrderStatus::Paid
    }
}

/// Line item snapshot
///
/// `name` and `price` are copied from the menu at the moment the item is
/// added, so later menu edits leave the order untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Table reference; null once the table has been deleted
    pub table_id: Option<i64>,
    /// Employee who took the order
    pub creator_id: i64,
    pub items: Vec<OrderItem>,
    /// Always equals the 2-dp rounded sum of `quantity × price` over `items`
    pub total_price: f64,
    pub status: OrderStatus,
    /// Set exactly once, at the `Paid` transition
    pub payment_method: Option<PaymentMethod>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Requested line item when creating an order; the server resolves the
/// name/price snapshot from the menu.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderCreate {
    pub table_id: i64,
    pub items: Vec<OrderItemInput>,
}

/// Edit order payload
///
/// Carries full replacement line items plus the caller's idea of the total;
/// the server re-derives the total from the items and rejects a mismatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderEdit {
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub table_id: Option<i64>,
}

/// Advance status payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusAdvance {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_is_forward() {
        assert!(OrderStatus::Taken < OrderStatus::Prepared);
        assert!(OrderStatus::Prepared < OrderStatus::Delivered);
        assert!(OrderStatus::Delivered < OrderStatus::Paid);
    }

    #[test]
    fn advance_skipping_is_allowed_but_paid_is_not() {
        assert!(OrderStatus::Taken.can_advance_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Taken.can_advance_to(OrderStatus::Taken));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Prepared));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Paid));
    }
}
