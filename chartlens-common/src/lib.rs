//! # Chartlens Common Library
//!
//! Shared code for the chartlens binaries:
//! - Error types
//! - Database initialization and schema
//! - Configuration (database path) resolution

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
