//! Text-understanding oracle: chat-completions client and extraction contracts.
//!
//! The oracle turns unstructured page text into structured facts under four
//! task-specific contracts (direct representative, operating company,
//! corporate representative, invoice number). Each contract module separates
//! the CONTRACT — serde response schema plus a sentinel-aware parser that
//! converts the oracle's ad hoc absence markers into typed `Option`s — from
//! the WORDING, the instruction text sent as the system message.
//!
//! The oracle is best-effort by nature: malformed or non-JSON output always
//! parses to "no evidence", never to an error.

pub mod client;
pub mod contracts;
pub mod error;

pub use client::OracleClient;
pub use error::OracleError;
