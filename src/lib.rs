pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifier;
pub mod repository;
pub mod service;

pub use error::{AppError, Result};
