//! 工具模块

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse};

/// Result alias for API handlers
pub type AppResult<T> = Result<T, AppError>;
