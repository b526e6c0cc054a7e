//! Authorization policy
//!
//! Pure decision logic: given the caller, an order snapshot and the
//! requested mutation, allow or deny with a reason. Depends on nothing but
//! its inputs, so every rule is testable with synthetic callers — the store
//! is never consulted here.
//!
//! Check order for edits mirrors the caller-facing contract: finalized
//! first, then ownership, then the delivered cutoff. First failure wins.

use shared::models::{Order, Role};

use crate::auth::CurrentUser;
use crate::orders::OrderError;

/// Requested mutation, as seen by the policy
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// Open a new order against an empty table
    CreateOrder,
    /// Replace items/total, optionally override status or table
    EditOrder { order: &'a Order },
    /// Plain forward status move (kitchen progress)
    AdvanceStatus { order: &'a Order },
    /// Settle payment (single or split)
    SettlePayment,
    /// Read revenue aggregates and daily summaries
    ViewRevenue,
    /// Manage menu, tables, expenses, employee verification
    Administrate,
}

/// Evaluate the policy. `Ok(())` means allowed; the error is the
/// caller-facing denial reason.
pub fn authorize(caller: &CurrentUser, action: Action<'_>) -> Result<(), OrderError> {
    // Unverified accounts have no operational access at all
    if !caller.verified {
        return Err(OrderError::Forbidden(
            "account is not verified by an admin".to_string(),
        ));
    }

    match action {
        // Any verified user may open orders and move kitchen status forward;
        // the paid cutoff still applies to everyone.
        Action::CreateOrder => Ok(()),
        Action::AdvanceStatus { order } => {
            if order.status.is_paid() {
                return Err(OrderError::OrderFinalized);
            }
            Ok(())
        }

        Action::EditOrder { order } => {
            if order.status.is_paid() {
                return Err(OrderError::OrderFinalized);
            }
            if caller.role == Role::Employee {
                if order.creator_id != caller.id {
                    return Err(OrderError::NotOwner);
                }
                if order.status == shared::models::OrderStatus::Delivered {
                    return Err(OrderError::TooLateToEdit);
                }
            }
            Ok(())
        }

        Action::SettlePayment => {
            if caller.role != Role::Admin {
                return Err(OrderError::Forbidden(
                    "only admins may settle payments".to_string(),
                ));
            }
            Ok(())
        }

        Action::ViewRevenue | Action::Administrate => {
            if caller.role != Role::Admin {
                return Err(OrderError::Forbidden("admin access required".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, PaymentMethod};

    fn caller(id: i64, role: Role, verified: bool) -> CurrentUser {
        CurrentUser {
            id,
            username: format!("user-{id}"),
            role,
            verified,
        }
    }

    fn order(creator_id: i64, status: OrderStatus) -> Order {
        Order {
            id: "order-1".to_string(),
            table_id: Some(1),
            creator_id,
            items: vec![],
            total_price: 0.0,
            status,
            payment_method: if status == OrderStatus::Paid {
                Some(PaymentMethod::Cash)
            } else {
                None
            },
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn unverified_employee_may_do_nothing() {
        let u = caller(1, Role::Employee, false);
        let o = order(1, OrderStatus::Taken);
        assert!(matches!(
            authorize(&u, Action::CreateOrder),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&u, Action::EditOrder { order: &o }),
            Err(OrderError::Forbidden(_))
        ));
    }

    #[test]
    fn employee_edits_only_own_orders() {
        let u = caller(1, Role::Employee, true);
        let own = order(1, OrderStatus::Taken);
        let other = order(2, OrderStatus::Taken);

        assert!(authorize(&u, Action::EditOrder { order: &own }).is_ok());
        assert!(matches!(
            authorize(&u, Action::EditOrder { order: &other }),
            Err(OrderError::NotOwner)
        ));
    }

    #[test]
    fn employee_loses_edit_rights_at_delivered() {
        let u = caller(1, Role::Employee, true);
        let delivered = order(1, OrderStatus::Delivered);
        assert!(matches!(
            authorize(&u, Action::EditOrder { order: &delivered }),
            Err(OrderError::TooLateToEdit)
        ));
    }

    #[test]
    fn admin_edits_any_order_up_to_paid() {
        let a = caller(9, Role::Admin, true);
        let delivered = order(1, OrderStatus::Delivered);
        let paid = order(1, OrderStatus::Paid);

        assert!(authorize(&a, Action::EditOrder { order: &delivered }).is_ok());
        assert!(matches!(
            authorize(&a, Action::EditOrder { order: &paid }),
            Err(OrderError::OrderFinalized)
        ));
    }

    #[test]
    fn finalized_beats_ownership_in_check_order() {
        // A paid order owned by someone else reports Finalized, not NotOwner
        let u = caller(1, Role::Employee, true);
        let paid_foreign = order(2, OrderStatus::Paid);
        assert!(matches!(
            authorize(&u, Action::EditOrder { order: &paid_foreign }),
            Err(OrderError::OrderFinalized)
        ));
    }

    #[test]
    fn settlement_and_revenue_are_admin_only() {
        let u = caller(1, Role::Employee, true);
        let a = caller(2, Role::Admin, true);

        assert!(matches!(
            authorize(&u, Action::SettlePayment),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&u, Action::ViewRevenue),
            Err(OrderError::Forbidden(_))
        ));
        assert!(authorize(&a, Action::SettlePayment).is_ok());
        assert!(authorize(&a, Action::ViewRevenue).is_ok());
    }

    #[test]
    fn anyone_verified_advances_status_until_paid() {
        let u = caller(1, Role::Employee, true);
        let foreign = order(2, OrderStatus::Prepared);
        let paid = order(2, OrderStatus::Paid);

        assert!(authorize(&u, Action::AdvanceStatus { order: &foreign }).is_ok());
        assert!(matches!(
            authorize(&u, Action::AdvanceStatus { order: &paid }),
            Err(OrderError::OrderFinalized)
        ));
    }
}
