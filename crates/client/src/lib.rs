//! Vitrine client SDK.
//!
//! Headless building blocks for the Vitrine storefront builder: a uniform
//! gateway to the remote REST API, thin typed domain services, a durable
//! per-storefront shopping cart, an auth session store, and the multi-step
//! merchant registration wizard.
//!
//! # Architecture
//!
//! Everything is explicitly constructed and dependency-injected - no
//! ambient singletons. [`app::VitrineApp`] wires the pieces together:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrine_client::app::VitrineApp;
//! use vitrine_client::config::ClientConfig;
//! use vitrine_client::storage::MemoryStore;
//!
//! let config = ClientConfig::from_env()?;
//! let app = VitrineApp::new(config, Arc::new(MemoryStore::new()));
//!
//! let cart = app.cart("minha-loja");
//! cart.restore().await;
//! cart.add((&product).into()).await;
//! ```
//!
//! # Modules
//!
//! - [`storage`] - namespaced key-value persistence (memory / redb file)
//! - [`api`] - the single HTTP choke point: bearer auth, timeout, error
//!   normalization
//! - [`services`] - typed wrappers per API resource
//! - [`cart`] - the per-storefront cart engine
//! - [`session`] - durable auth session state
//! - [`signup`] - the three-step merchant registration wizard
//! - [`search`] - debounce timer primitive for live inputs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod config;
pub mod models;
pub mod search;
pub mod services;
pub mod session;
pub mod signup;
pub mod storage;
