//! Shared test fixtures: in-memory ledger, synthetic callers, seeded floor

// Each integration test binary compiles its own copy; not all use every helper
#![allow(dead_code)]

use sqlx::SqlitePool;

use floor_server::auth::CurrentUser;
use floor_server::db::DbService;
use floor_server::db::repository::{dining_table, menu_item};
use floor_server::orders::lifecycle;
use shared::models::{
    DiningTableCreate, MenuItemCreate, Order, OrderCreate, OrderItemInput, OrderStatus, Role,
};

pub async fn test_pool() -> SqlitePool {
    DbService::in_memory()
        .await
        .expect("in-memory database")
        .pool
}

pub fn admin(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        username: format!("admin-{id}"),
        role: Role::Admin,
        verified: true,
    }
}

pub fn employee(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        username: format!("employee-{id}"),
        role: Role::Employee,
        verified: true,
    }
}

pub fn unverified_employee(id: i64) -> CurrentUser {
    CurrentUser {
        verified: false,
        ..employee(id)
    }
}

/// Seed one menu item, returning its id
pub async fn seed_menu_item(pool: &SqlitePool, name: &str, price: f64) -> i64 {
    menu_item::create(
        pool,
        MenuItemCreate {
            name: name.to_string(),
            price,
        },
    )
    .await
    .expect("seed menu item")
    .id
}

/// Seed one empty table, returning its id
pub async fn seed_table(pool: &SqlitePool, number: i64) -> i64 {
    dining_table::create(pool, DiningTableCreate { number })
        .await
        .expect("seed table")
        .id
}

/// Create an order for `quantity` units of a single menu item
pub async fn create_order(
    pool: &SqlitePool,
    caller: &CurrentUser,
    table_id: i64,
    menu_item_id: i64,
    quantity: i64,
) -> Order {
    lifecycle::create_order(
        pool,
        caller,
        OrderCreate {
            table_id,
            items: vec![OrderItemInput {
                menu_item_id,
                quantity,
            }],
        },
    )
    .await
    .expect("create order")
}

/// Create an order and advance it to DELIVERED, ready for settlement
pub async fn create_delivered_order(
    pool: &SqlitePool,
    caller: &CurrentUser,
    table_id: i64,
    menu_item_id: i64,
    quantity: i64,
) -> Order {
    let order = create_order(pool, caller, table_id, menu_item_id, quantity).await;
    lifecycle::advance_status(pool, caller, &order.id, OrderStatus::Delivered)
        .await
        .expect("advance to delivered");
    Order {
        status: OrderStatus::Delivered,
        ..order
    }
}
