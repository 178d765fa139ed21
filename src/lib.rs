//! confpass Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod registry;
pub mod stats;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use error::{AppError, AppResult};
