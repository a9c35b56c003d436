//! Pasar storefront client library.
//!
//! Customer-facing flows of the Pasar web client: the product page and the
//! checkout flow. All business logic lives behind the platform REST API;
//! this crate calls it through [`api::ApiClient`] and keeps the per-session
//! state the pages need.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod navigation;
pub mod product;
