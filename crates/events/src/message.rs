//! Inbound queue event shape, as delivered by the queue trigger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Typed attribute attached to a queue message by its producer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttribute {
    #[serde(default)]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<String>,
}

/// One message (record) of a queue event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub receipt_handle: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub md5_of_body: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_attributes: HashMap<String, MessageAttribute>,
    #[serde(default)]
    pub event_source: String,
    #[serde(default, rename = "eventSourceARN")]
    pub event_source_arn: String,
    #[serde(default)]
    pub aws_region: String,
}

impl QueueMessage {
    /// Minimal message, mostly useful for tests and local replay.
    pub fn new(message_id: impl Into<String>, receipt_handle: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            receipt_handle: receipt_handle.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}

/// A batch of messages delivered together in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueMessage>,
}

impl QueueEvent {
    pub fn new(records: Vec<QueueMessage>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_platform_payload() {
        let raw = r#"{
            "Records": [{
                "messageId": "059f36b4-87a3-44ab-83d2-661975830a7d",
                "receiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a",
                "body": "{\"id\": 42}",
                "attributes": {"ApproximateReceiveCount": "1"},
                "messageAttributes": {
                    "source": {"dataType": "String", "stringValue": "poller"}
                },
                "md5OfBody": "e4e68fb7bd0e697a0ae8f1bb342846b3",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:eu-west-2:123456789012:activities",
                "awsRegion": "eu-west-2",
                "someFutureField": true
            }]
        }"#;

        let event: QueueEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.len(), 1);

        let msg = &event.records[0];
        assert_eq!(msg.message_id, "059f36b4-87a3-44ab-83d2-661975830a7d");
        assert_eq!(msg.receipt_handle, "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a");
        assert_eq!(msg.body, "{\"id\": 42}");
        assert_eq!(msg.attributes["ApproximateReceiveCount"], "1");
        assert_eq!(
            msg.message_attributes["source"].string_value.as_deref(),
            Some("poller")
        );
        assert_eq!(msg.event_source_arn, "arn:aws:sqs:eu-west-2:123456789012:activities");
    }

    #[test]
    fn missing_records_is_an_empty_event() {
        let event: QueueEvent = serde_json::from_str("{}").unwrap();
        assert!(event.is_empty());
    }
}
