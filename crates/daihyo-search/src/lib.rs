//! Evidence gathering for daihyo: ranked-link search and page fetching.
//!
//! [`SearchClient`] queries the search provider for a small ordered set of
//! URLs; [`PageFetcher`] turns those URLs into bounded plain-text
//! [`PageDocument`]s, dropping any page that fails to fetch. A dropped page
//! is a smaller evidence set, never an error.

pub mod client;
pub mod error;
pub mod fetch;
pub mod text;

mod retry;

pub use client::SearchClient;
pub use error::SearchError;
pub use fetch::{format_pages_block, PageDocument, PageFetcher, PAGE_TEXT_MAX_CHARS};
