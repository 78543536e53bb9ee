//! Swap Core Library
//!
//! Shared types, configuration, and database access for wallet behavior analysis.

pub mod config;
pub mod db;
pub mod error;
pub mod types;

pub use error::{Error, Result};
