//! Queue wire model and admitted work items.

pub mod batch;
pub mod message;
pub mod response;

pub use batch::{Batch, IdentifierSource, Item};
pub use message::{MessageAttribute, QueueEvent, QueueMessage};
pub use response::{BatchItemFailure, QueueEventResponse};
