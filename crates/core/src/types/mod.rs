//! Core types for Pasar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{Rupiah, format_rupiah, json_number};
pub use status::*;
