//! # Leafy Common Library
//!
//! Shared code for the Leafy library services:
//! - Error type
//! - Configuration loading (TOML + environment)
//! - Logging initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
