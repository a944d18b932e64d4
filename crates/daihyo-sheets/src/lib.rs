//! Tabular record-store writer.
//!
//! Persists the six derived fields of a [`daihyo_core::ResolutionResult`]
//! into a caller-specified spreadsheet row over the Sheets REST API, coercing
//! every null/unknown value to the single sentinel `不明` first. Also drives
//! the row-highlight protocol: light red while a resolution is in flight,
//! white once the row is written.

mod client;
mod error;

pub use client::{record_values, RowHighlight, SheetTarget, SheetsClient, NOT_FOUND_SENTINEL};
pub use error::SheetsError;
