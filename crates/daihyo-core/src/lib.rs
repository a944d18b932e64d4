//! Shared domain types and configuration for daihyo.
//!
//! daihyo resolves the operator identity behind a shop listing — the
//! representative person, the operating company, and the qualified-invoice
//! registration number — from web evidence. This crate holds the run input
//! ([`ShopQuery`]), the terminal record ([`ResolutionResult`]) with its closed
//! [`Route`] set, the [`InvoiceNumber`] lexical newtype, and the env-driven
//! [`AppConfig`].

mod app_config;
mod config;
mod error;
mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use types::{InvoiceNumber, ResolutionResult, Route, ShopQuery};
