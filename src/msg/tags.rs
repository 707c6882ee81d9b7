// Result tags - searchable key/value pairs describing a committed message

use crate::account::Address;
use crate::msg::MsgSend;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tag key for the message action
pub const TAG_ACTION: &str = "action";
/// Tag key for the message category
pub const TAG_CATEGORY: &str = "category";
/// Tag key for a debited address
pub const TAG_SENDER: &str = "sender";
/// Tag key for a credited address
pub const TAG_RECIPIENT: &str = "recipient";

/// One key/value tag attached to a committed message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    /// Create a tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Tags for a committed transfer: the action (`send` for one input and
/// one output, `multisend` otherwise), the category, one `sender` tag
/// per distinct input address, and one `recipient` tag per distinct
/// output address, in first-appearance order.
pub fn send_tags(msg: &MsgSend) -> Vec<Tag> {
    let action = if msg.is_plain_send() { "send" } else { "multisend" };

    let mut tags = vec![Tag::new(TAG_ACTION, action), Tag::new(TAG_CATEGORY, "bank")];

    let mut seen: HashSet<Address> = HashSet::new();
    for input in msg.inputs() {
        if seen.insert(*input.address()) {
            tags.push(Tag::new(TAG_SENDER, input.address().to_string()));
        }
    }

    seen.clear();
    for output in msg.outputs() {
        if seen.insert(*output.address()) {
            tags.push(Tag::new(TAG_RECIPIENT, output.address().to_string()));
        }
    }

    tags
}

/// Tags for a committed (passing) invariant verification
pub fn verify_invariant_tags(sender: &Address, route: &str) -> Vec<Tag> {
    vec![
        Tag::new(TAG_ACTION, "verify_invariant"),
        Tag::new(TAG_CATEGORY, "crisis"),
        Tag::new(TAG_SENDER, sender.to_string()),
        Tag::new("invariant", route),
    ]
}
