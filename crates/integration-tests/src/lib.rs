//! Integration tests for Vitrine.
//!
//! This crate exists to host cross-crate behavioural tests in `tests/`.
//! Tests run against in-memory or temp-file storage and a loopback base
//! URL - no live backend required.
