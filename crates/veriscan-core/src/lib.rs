//! Core types for the veriscan service: configuration, errors, domain
//! models, and upload validation. This crate performs no I/O.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use config::Config;
pub use error::{AppError, LogLevel};
