//! Data pipeline backing an AI model pricing and efficiency dashboard.
//!
//! Raw provider records are fetched once (or read back from a local cache),
//! scored and batch-normalized, reconciled with locally stored user edits,
//! and served to the presentation layer through a small sort/filter/paginate
//! query layer plus scatter-chart helpers.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::AppError;
