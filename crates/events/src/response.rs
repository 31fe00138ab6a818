//! Outbound partial-batch-failure response.

use serde::{Deserialize, Serialize};

/// One item the platform must redeliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

/// Response returned to the queue trigger.
///
/// An empty `batch_item_failures` list means the whole batch was consumed;
/// otherwise only the listed items are redelivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEventResponse {
    #[serde(default)]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl QueueEventResponse {
    pub fn from_identifiers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            batch_item_failures: ids
                .into_iter()
                .map(|id| BatchItemFailure {
                    item_identifier: id.into(),
                })
                .collect(),
        }
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.batch_item_failures
            .iter()
            .map(|f| f.item_identifier.as_str())
    }
}
