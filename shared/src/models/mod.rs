//! Data models
//!
//! Plain data carriers shared between the server and its clients.
//! Row types derive `sqlx::FromRow` behind the `db` feature so clients
//! without a database don't pull sqlx in.

pub mod daily_revenue;
pub mod dining_table;
pub mod employee;
pub mod expense;
pub mod menu_item;
pub mod order;
pub mod payment;

pub use daily_revenue::{DailyRevenue, DailySummary};
pub use dining_table::{DiningTable, DiningTableCreate, TableStatus};
pub use employee::{Employee, EmployeeCreate, Role};
pub use expense::{Expense, ExpenseCreate};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderCreate, OrderEdit, OrderItem, OrderItemInput, OrderStatus, StatusAdvance};
pub use payment::{Payment, PaymentMethod, SettlementReceipt, SplitReceipt, SplitSettlementRequest};
