//! Core domain + application logic for the Docker Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Docker Engine
//! live behind ports (traits) implemented in adapter crates.

pub mod bot;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod runtime;

pub use errors::{Error, Result};
