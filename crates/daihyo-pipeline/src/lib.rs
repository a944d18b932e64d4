//! The resolution pipeline: an ordered fallback across independent evidence
//! sources.
//!
//! A run walks five stages — direct representative, invoice number,
//! operating company, corporate-name check, corporate representative — until
//! one resolves. Each stage either produces the terminal
//! [`daihyo_core::ResolutionResult`] or falls through with no usable
//! evidence; no stage failure ever aborts a run.

pub mod resolver;
pub mod validator;

pub use resolver::{PipelineError, Resolver};
pub use validator::{
    is_corporate_name, RepresentativeCandidate, CORPORATE_MARKERS,
    REPRESENTATIVE_CONFIDENCE_THRESHOLD,
};
