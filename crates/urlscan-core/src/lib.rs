//! Core domain + application logic for the URL scanner bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the threat
//! assessment API live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod mode;
pub mod ports;
pub mod report;
pub mod safety;
pub mod scanner;
pub mod utils;

pub use errors::{Error, Result};
