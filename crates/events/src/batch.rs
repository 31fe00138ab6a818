//! Admitted work items.
//!
//! A [`Batch`] is what the processing core sees: an ordered list of
//! immutable [`Item`]s. Identifiers may repeat; outcomes are keyed by
//! position. Wire details stay in [`crate::message`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use batchline_core::{BatchResult, ItemId};

use crate::message::{QueueEvent, QueueMessage};

/// Which message field identifies an item in the failure response.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSource {
    #[default]
    ReceiptHandle,
    MessageId,
}

impl IdentifierSource {
    pub fn pick<'a>(&self, message: &'a QueueMessage) -> &'a str {
        match self {
            IdentifierSource::ReceiptHandle => &message.receipt_handle,
            IdentifierSource::MessageId => &message.message_id,
        }
    }
}

impl FromStr for IdentifierSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receipt_handle" => Ok(Self::ReceiptHandle),
            "message_id" => Ok(Self::MessageId),
            other => Err(format!("unknown identifier source: {other}")),
        }
    }
}

/// One unit of work: identifier plus opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    body: Vec<u8>,
}

impl Item {
    pub fn new(id: ItemId, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn from_message(message: QueueMessage, source: IdentifierSource) -> BatchResult<Self> {
        let id = ItemId::new(source.pick(&message))?;
        Ok(Self::new(id, message.body.into_bytes()))
    }
}

/// Ordered items sharing one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    items: Vec<Item>,
}

impl Batch {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Admit every record that carries an identifier.
    ///
    /// A record without one cannot be named in the failure response, so it
    /// is logged and skipped; the rest of the batch still runs.
    pub fn from_queue_event(event: QueueEvent, source: IdentifierSource) -> Self {
        let mut items = Vec::with_capacity(event.records.len());
        for (index, message) in event.records.into_iter().enumerate() {
            let message_id = message.message_id.clone();
            match Item::from_message(message, source) {
                Ok(item) => items.push(item),
                Err(err) => warn!(
                    index,
                    message_id = %message_id,
                    error = %err,
                    "skipping record without identifier"
                ),
            }
        }
        Self::new(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(Item::id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use batchline_core::BatchError;

    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    #[test]
    fn duplicate_identifiers_are_admitted_as_separate_items() {
        let batch = Batch::new(vec![
            Item::new(id("A"), "one"),
            Item::new(id("B"), "two"),
            Item::new(id("A"), "three"),
        ]);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.items()[2].body_str(), Some("three"));
    }

    #[test]
    fn queue_event_uses_receipt_handle_by_default() {
        let event = QueueEvent::new(vec![
            QueueMessage::new("m-1", "r-1", "first"),
            QueueMessage::new("m-2", "r-2", "second"),
        ]);

        let batch = Batch::from_queue_event(event, IdentifierSource::default());
        let ids: Vec<&str> = batch.ids().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["r-1", "r-2"]);
        assert_eq!(batch.items()[1].body_str(), Some("second"));
    }

    #[test]
    fn queue_event_can_use_message_ids() {
        let event = QueueEvent::new(vec![QueueMessage::new("m-1", "r-1", "")]);
        let batch = Batch::from_queue_event(event, IdentifierSource::MessageId);
        assert_eq!(batch.items()[0].id().as_str(), "m-1");
    }

    #[test]
    fn message_without_identifier_is_rejected() {
        let err = Item::from_message(
            QueueMessage::new("m-1", "", ""),
            IdentifierSource::ReceiptHandle,
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::InvalidItemId(_)));
    }

    #[test]
    fn record_without_identifier_is_skipped_not_fatal() {
        let event = QueueEvent::new(vec![
            QueueMessage::new("m-a", "r-a", "healthy"),
            QueueMessage::new("m-b", "", "orphan"),
            QueueMessage::new("m-c", "r-c", "also healthy"),
        ]);

        let batch = Batch::from_queue_event(event, IdentifierSource::ReceiptHandle);
        let ids: Vec<&str> = batch.ids().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["r-a", "r-c"]);
    }

    #[test]
    fn identifier_source_parses_config_values() {
        assert_eq!("message_id".parse::<IdentifierSource>(), Ok(IdentifierSource::MessageId));
        assert_eq!(" Receipt_Handle ".parse::<IdentifierSource>(), Ok(IdentifierSource::ReceiptHandle));
        assert!("queue_url".parse::<IdentifierSource>().is_err());
    }
}
