//! `batchline-core`: identifiers and error taxonomy shared by every crate.
//!
//! Pure types only (no async, no IO).

pub mod error;
pub mod id;

pub use error::{BatchError, BatchResult, ProcessingError};
pub use id::{InvocationId, ItemId};
