//! Corporate-number registry lookup.
//!
//! Given a registration code (typically an invoice number), derives the
//! numeric registry key and fetches the official registry page for it,
//! extracting the registered entity name from its fixed position. A page
//! that loads but lacks the name field yields a partial [`RegistryRecord`]
//! (number known, name `None`) — callers must treat that as distinct from
//! total failure.

mod client;
mod error;

pub use client::{registry_key, RegistryClient, RegistryRecord};
pub use error::RegistryError;
