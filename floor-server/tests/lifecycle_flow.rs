//! Order lifecycle integration tests: creation atomicity, snapshot
//! semantics, the edit permission protocol and the forward-only state
//! machine.

mod common;

use common::*;
use floor_server::db::repository::{dining_table, menu_item, order as order_repo};
use floor_server::orders::{OrderError, lifecycle};
use shared::models::{
    MenuItemUpdate, OrderCreate, OrderEdit, OrderItem, OrderItemInput, OrderStatus, TableStatus,
};

#[tokio::test]
async fn create_order_occupies_table_and_derives_total() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Jasmine Pearl", 4.50).await;
    let cake = seed_menu_item(&pool, "Pineapple Bun", 3.20).await;
    let table = seed_table(&pool, 1).await;
    let waiter = employee(1);

    let order = lifecycle::create_order(
        &pool,
        &waiter,
        OrderCreate {
            table_id: table,
            items: vec![
                OrderItemInput { menu_item_id: tea, quantity: 2 },
                OrderItemInput { menu_item_id: cake, quantity: 3 },
            ],
        },
    )
    .await
    .unwrap();

    assert_eq!(order.status, OrderStatus::Taken);
    assert_eq!(order.total_price, 18.60);
    assert_eq!(order.creator_id, waiter.id);

    let table_row = dining_table::find_by_id(&pool, table).await.unwrap().unwrap();
    assert_eq!(table_row.status, TableStatus::Occupied);
}

#[tokio::test]
async fn menu_price_change_does_not_touch_existing_orders() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let order = create_order(&pool, &employee(1), table, tea, 2).await;

    menu_item::update(
        &pool,
        tea,
        MenuItemUpdate { price: Some(9.99), ..Default::default() },
    )
    .await
    .unwrap();

    let reloaded = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.items[0].price, 5.00);
    assert_eq!(reloaded.total_price, 10.00);
}

#[tokio::test]
async fn create_against_occupied_table_fails_and_creates_nothing() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    create_order(&pool, &employee(1), table, tea, 1).await;

    let err = lifecycle::create_order(
        &pool,
        &employee(2),
        OrderCreate {
            table_id: table,
            items: vec![OrderItemInput { menu_item_id: tea, quantity: 1 }],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::TableOccupied(_)));

    let orders = order_repo::find_all(&pool, None, Some(table)).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn failed_creation_rolls_back_table_occupancy() {
    let pool = test_pool().await;
    seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;

    // Unknown menu item aborts the transaction after the occupancy claim
    let err = lifecycle::create_order(
        &pool,
        &employee(1),
        OrderCreate {
            table_id: table,
            items: vec![OrderItemInput { menu_item_id: 424242, quantity: 1 }],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::MenuItemNotFound(424242)));

    let table_row = dining_table::find_by_id(&pool, table).await.unwrap().unwrap();
    assert_eq!(table_row.status, TableStatus::Empty);
}

#[tokio::test]
async fn create_requires_items_and_a_known_table() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;

    let err = lifecycle::create_order(
        &pool,
        &employee(1),
        OrderCreate { table_id: table, items: vec![] },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::NoItems));

    let err = lifecycle::create_order(
        &pool,
        &employee(1),
        OrderCreate {
            table_id: 999,
            items: vec![OrderItemInput { menu_item_id: tea, quantity: 1 }],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::TableNotFound(999)));
}

#[tokio::test]
async fn unverified_employee_cannot_create_orders() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;

    let err = lifecycle::create_order(
        &pool,
        &unverified_employee(7),
        OrderCreate {
            table_id: table,
            items: vec![OrderItemInput { menu_item_id: tea, quantity: 1 }],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::Forbidden(_)));
}

fn edit_with(items: Vec<OrderItem>, total: f64) -> OrderEdit {
    OrderEdit {
        items,
        total_price: total,
        status: None,
        table_id: None,
    }
}

fn snapshot(menu_item_id: i64, name: &str, price: f64, quantity: i64) -> OrderItem {
    OrderItem {
        menu_item_id,
        name: name.to_string(),
        price,
        quantity,
    }
}

#[tokio::test]
async fn employee_edits_own_order_and_total_is_rederived() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let waiter = employee(1);
    let order = create_order(&pool, &waiter, table, tea, 1).await;

    let edited = lifecycle::edit_order(
        &pool,
        &waiter,
        &order.id,
        edit_with(vec![snapshot(tea, "Oolong", 5.00, 3)], 15.00),
    )
    .await
    .unwrap();
    assert_eq!(edited.total_price, 15.00);
    assert_eq!(edited.items[0].quantity, 3);
}

#[tokio::test]
async fn edit_rejects_total_that_disagrees_with_items() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let waiter = employee(1);
    let order = create_order(&pool, &waiter, table, tea, 1).await;

    let err = lifecycle::edit_order(
        &pool,
        &waiter,
        &order.id,
        edit_with(vec![snapshot(tea, "Oolong", 5.00, 3)], 12.00),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::InvalidAmount(_)));

    let err = lifecycle::edit_order(
        &pool,
        &waiter,
        &order.id,
        edit_with(vec![snapshot(tea, "Oolong", 5.00, 1)], -5.00),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::InvalidAmount(_)));
}

#[tokio::test]
async fn edit_permission_protocol() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let owner = employee(1);
    let other = employee(2);
    let boss = admin(9);
    let order = create_order(&pool, &owner, table, tea, 1).await;
    let edit = || edit_with(vec![snapshot(tea, "Oolong", 5.00, 2)], 10.00);

    // Another employee is not the owner
    let err = lifecycle::edit_order(&pool, &other, &order.id, edit()).await.unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));

    // Once delivered, the owner has lost edit rights but the admin has not
    lifecycle::advance_status(&pool, &owner, &order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    let err = lifecycle::edit_order(&pool, &owner, &order.id, edit()).await.unwrap_err();
    assert!(matches!(err, OrderError::TooLateToEdit));
    lifecycle::edit_order(&pool, &boss, &order.id, edit()).await.unwrap();

    // Unknown order reports NotFound before any permission check
    let err = lifecycle::edit_order(&pool, &boss, "missing", edit()).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn edit_status_override_walks_forward_only_and_never_pays() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let waiter = employee(1);
    let order = create_order(&pool, &waiter, table, tea, 1).await;
    let items = vec![snapshot(tea, "Oolong", 5.00, 1)];

    // Forward override (skip allowed)
    let edited = lifecycle::edit_order(
        &pool,
        &waiter,
        &order.id,
        OrderEdit {
            items: items.clone(),
            total_price: 5.00,
            status: Some(OrderStatus::Delivered),
            table_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.status, OrderStatus::Delivered);

    // Backward override is rejected
    let err = lifecycle::edit_order(
        &pool,
        &admin(9),
        &order.id,
        OrderEdit {
            items: items.clone(),
            total_price: 5.00,
            status: Some(OrderStatus::Prepared),
            table_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));

    // PAID is never reachable through an edit
    let err = lifecycle::edit_order(
        &pool,
        &admin(9),
        &order.id,
        OrderEdit {
            items,
            total_price: 5.00,
            status: Some(OrderStatus::Paid),
            table_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));
}

#[tokio::test]
async fn deleting_a_table_orphans_its_orders_but_keeps_them() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let order = create_order(&pool, &employee(1), table, tea, 1).await;

    assert!(dining_table::delete(&pool, table).await.unwrap());

    let orphan = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(orphan.table_id, None);
    assert_eq!(orphan.total_price, 5.00);
}

#[tokio::test]
async fn any_verified_user_advances_status_forward_only() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 5.00).await;
    let table = seed_table(&pool, 1).await;
    let order = create_order(&pool, &employee(1), table, tea, 1).await;

    // A different employee moves the order along — no ownership restriction
    lifecycle::advance_status(&pool, &employee(2), &order.id, OrderStatus::Prepared)
        .await
        .unwrap();
    lifecycle::advance_status(&pool, &admin(9), &order.id, OrderStatus::Delivered)
        .await
        .unwrap();

    // Backward and PAID targets are invalid transitions
    let err = lifecycle::advance_status(&pool, &employee(2), &order.id, OrderStatus::Taken)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));
    let err = lifecycle::advance_status(&pool, &admin(9), &order.id, OrderStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));
}
