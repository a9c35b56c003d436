//! Pasar store-admin client library.
//!
//! Views for store administrators: the dashboard product count, the
//! inventory history of the admin's store, and store details.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod inventory;
pub mod store;
pub mod types;
