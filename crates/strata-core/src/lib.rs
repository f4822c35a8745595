//! # Strata Core
//!
//! Transport-free building blocks for the Strata request facade.
//!
//! This crate provides:
//! - The layered request configuration model and its merge rules
//! - Bracket-notation query and form encoding
//! - Method- and content-type-driven body synthesis
//! - Failure classification and the timed response envelope
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{merge_fragments, synthesize_body, RequestConfig};
//!
//! // Stack override fragments over a base configuration
//! let mut config = merge_fragments(base, fragments);
//!
//! // Turn `data` into its wire form
//! synthesize_body(&mut config)?;
//! ```

pub mod body;
pub mod classify;
pub mod config;
pub mod envelope;
pub mod error;
pub mod merge;
pub mod payload;
pub mod query;
pub mod timing;

// Re-exports for convenience
pub use body::*;
pub use classify::*;
pub use config::*;
pub use envelope::*;
pub use error::*;
pub use merge::*;
pub use payload::*;
pub use query::*;
pub use timing::*;
