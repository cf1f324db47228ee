pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod expenses;
pub mod profile;
pub mod records;
pub mod session;
pub mod status;
pub mod ui;
pub mod utils;

pub use error::{AppError, Result};
