//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod birth_date;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod subdomain;
pub mod tax_id;

pub use birth_date::{BirthDate, BirthDateError};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use subdomain::{Subdomain, SubdomainError};
pub use tax_id::{TaxId, TaxIdError, TaxIdKind};
