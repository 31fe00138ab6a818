//! Strongly-typed identifiers used across the batch pipeline.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BatchError;

/// Identifier of one work item within a batch.
///
/// Opaque to the pipeline: for queue messages this is either the receipt
/// handle or the message id, whichever the delivery platform expects back
/// in a partial-failure response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Result<Self, BatchError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(BatchError::invalid_item_id("identifier must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = BatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

/// Identifier of one handler invocation (log correlation only).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_rejects_blank_values() {
        assert!(matches!(ItemId::new(""), Err(BatchError::InvalidItemId(_))));
        assert!(matches!("   ".parse::<ItemId>(), Err(BatchError::InvalidItemId(_))));
    }

    #[test]
    fn item_id_serializes_as_plain_string() {
        let id = ItemId::new("5a3e8884-4ff1-46f1-8617-b3f483a79956").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5a3e8884-4ff1-46f1-8617-b3f483a79956\"");

        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
    }

    #[test]
    fn invocation_ids_are_unique() {
        assert_ne!(InvocationId::new(), InvocationId::new());
    }
}
