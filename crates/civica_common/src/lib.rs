//! Civica Common - Shared types for the complaint portal.
//!
//! Submissions are transient: they live for one request and are never
//! persisted. The only durable-looking artifact is the reference id
//! handed back to the submitter.

pub mod complaint;
pub mod error;
pub mod token;

pub use complaint::*;
pub use error::*;
pub use token::*;
