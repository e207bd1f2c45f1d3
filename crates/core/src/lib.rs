//! Vitrine Core - Shared types library.
//!
//! This crate provides common types used across all Vitrine components:
//! - `client` - Headless storefront/merchant SDK
//! - `cli` - Command-line tools for exercising the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails,
//!   tax IDs, phone numbers, subdomains, and birth dates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
