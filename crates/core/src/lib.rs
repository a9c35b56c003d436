//! Pasar Core - Shared types library.
//!
//! This crate provides common types used across all Pasar components:
//! - `storefront` - Customer-facing client (product page, checkout)
//! - `admin` - Store-admin client (dashboard, inventory history, store detail)
//! - `cli` - Command-line driver for both
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, rupiah amounts, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
