//! Order lifecycle engine
//!
//! Owns the order state machine (`TAKEN → PREPARED → DELIVERED → PAID`) and
//! the edit protocol. The `PAID` transition is not reachable from here —
//! that belongs to the settlement engine.

use sqlx::SqlitePool;
use uuid::Uuid;

use shared::models::{Order, OrderCreate, OrderEdit, OrderItem, OrderStatus};

use crate::audit::{AuditAction, AuditRecord, storage as audit_storage};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::db::repository::{RepoError, dining_table, menu_item, order as order_repo};

use super::money;
use super::OrderError;

/// Create a new order against an empty table.
///
/// Snapshots item name/price from the menu at insertion time, inserts the
/// order in `TAKEN` status and flips the table to occupied — one
/// transaction, so a crash can't leave an order without its occupied table
/// or an occupied table without its order.
pub async fn create_order(
    pool: &SqlitePool,
    caller: &CurrentUser,
    input: OrderCreate,
) -> Result<Order, OrderError> {
    policy::authorize(caller, Action::CreateOrder)?;

    if input.items.is_empty() {
        return Err(OrderError::NoItems);
    }
    for item in &input.items {
        if item.quantity <= 0 {
            return Err(OrderError::InvalidAmount(format!(
                "quantity must be positive, got {}",
                item.quantity
            )));
        }
    }

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    // Guarded occupancy claim decides the TableOccupied race
    if !dining_table::try_occupy(&mut tx, input.table_id).await? {
        return match dining_table::find_by_id_tx(&mut tx, input.table_id).await? {
            Some(_) => Err(OrderError::TableOccupied(input.table_id)),
            None => Err(OrderError::TableNotFound(input.table_id)),
        };
    }

    // Snapshot name/price now; later menu edits must not touch this order
    let mut items = Vec::with_capacity(input.items.len());
    for requested in &input.items {
        let menu = menu_item::find_by_id_tx(&mut tx, requested.menu_item_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or(OrderError::MenuItemNotFound(requested.menu_item_id))?;
        let item = OrderItem {
            menu_item_id: menu.id,
            name: menu.name,
            price: menu.price,
            quantity: requested.quantity,
        };
        money::validate_item(&item)?;
        items.push(item);
    }

    let total_price = money::to_f64(money::compute_total(&items));
    let now = shared::util::now_millis();
    let order = Order {
        id: Uuid::new_v4().to_string(),
        table_id: Some(input.table_id),
        creator_id: caller.id,
        items,
        total_price,
        status: OrderStatus::Taken,
        payment_method: None,
        created_at: now,
        updated_at: now,
    };

    order_repo::insert_tx(&mut tx, &order).await?;

    audit_storage::append(
        &mut tx,
        AuditRecord {
            action: AuditAction::OrderCreated,
            resource_type: "order".to_string(),
            resource_id: order.id.clone(),
            operator_id: Some(caller.id),
            operator_name: Some(caller.username.clone()),
            details: serde_json::json!({
                "table_id": input.table_id,
                "item_count": order.items.len(),
                "total_price": order.total_price,
            }),
        },
    )
    .await
    .map_err(|e| RepoError::Database(e.to_string()))?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(order_id = %order.id, table_id = input.table_id, "Order created");
    Ok(order)
}

/// Edit an order's content, with optional status/table overrides.
///
/// Authorization is evaluated first-failure-wins: not found, finalized,
/// ownership, delivered cutoff, then amount validation. The total is
/// re-derived from the submitted items; the caller's total is only accepted
/// when it agrees with the derivation within the money tolerance.
pub async fn edit_order(
    pool: &SqlitePool,
    caller: &CurrentUser,
    order_id: &str,
    edit: OrderEdit,
) -> Result<Order, OrderError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let order = order_repo::find_by_id_tx(&mut tx, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

    policy::authorize(caller, Action::EditOrder { order: &order })?;

    if !edit.total_price.is_finite() || edit.total_price < 0.0 {
        return Err(OrderError::InvalidAmount(format!(
            "total must be non-negative, got {}",
            edit.total_price
        )));
    }
    for item in &edit.items {
        money::validate_item(item)?;
    }

    let derived = money::compute_total(&edit.items);
    if !money::within_tolerance(money::to_decimal(edit.total_price), derived) {
        return Err(OrderError::InvalidAmount(format!(
            "total {} does not match line items (expected {})",
            edit.total_price,
            money::to_f64(derived)
        )));
    }
    let total_price = money::to_f64(derived);

    // A status override must still walk the state machine forward, and can
    // never reach PAID from here
    let status = match edit.status {
        Some(target) if target != order.status => {
            if !order.status.can_advance_to(target) {
                return Err(OrderError::InvalidTransition(format!(
                    "{:?} -> {:?}",
                    order.status, target
                )));
            }
            target
        }
        _ => order.status,
    };

    // Table reassignment keeps the reference valid but does not re-run the
    // occupancy protocol; the floor owns table state collectively
    let table_id = match edit.table_id {
        Some(new_table) if Some(new_table) != order.table_id => {
            dining_table::find_by_id_tx(&mut tx, new_table)
                .await?
                .ok_or(OrderError::TableNotFound(new_table))?;
            Some(new_table)
        }
        Some(same) => Some(same),
        None => order.table_id,
    };

    order_repo::update_content_tx(&mut tx, order_id, &edit.items, total_price, status, table_id)
        .await?;

    audit_storage::append(
        &mut tx,
        AuditRecord {
            action: AuditAction::OrderEdited,
            resource_type: "order".to_string(),
            resource_id: order_id.to_string(),
            operator_id: Some(caller.id),
            operator_name: Some(caller.username.clone()),
            details: serde_json::json!({
                "items": &edit.items,
                "total_price": total_price,
                "status": status,
                "table_id": table_id,
            }),
        },
    )
    .await
    .map_err(|e| RepoError::Database(e.to_string()))?;

    tx.commit().await.map_err(RepoError::from)?;

    let now = shared::util::now_millis();
    Ok(Order {
        items: edit.items,
        total_price,
        status,
        table_id,
        updated_at: now,
        ..order
    })
}

/// Plain forward status move (e.g. kitchen marks food prepared).
///
/// Deliberately permissive: any verified user may advance any order — the
/// whole floor marks food ready. Also deliberately unaudited (low stakes,
/// high frequency).
pub async fn advance_status(
    pool: &SqlitePool,
    caller: &CurrentUser,
    order_id: &str,
    target: OrderStatus,
) -> Result<(), OrderError> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

    policy::authorize(caller, Action::AdvanceStatus { order: &order })?;

    if !order.status.can_advance_to(target) {
        return Err(OrderError::InvalidTransition(format!(
            "{:?} -> {:?}",
            order.status, target
        )));
    }

    order_repo::update_status(pool, order_id, target).await?;
    Ok(())
}
