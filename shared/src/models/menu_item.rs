//! Menu Item Model (菜单)

use serde::{Deserialize, Serialize};

/// Menu item
///
/// Orders snapshot `name` and `price` at creation time; editing a menu item
/// never retroactively changes existing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
}

/// Update menu item payload (admin only)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}
