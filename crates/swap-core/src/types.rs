//! Core domain types for wallet behavior analysis.

pub mod behavior;
pub mod profile;
pub mod swap;

pub use behavior::*;
pub use profile::*;
pub use swap::*;
