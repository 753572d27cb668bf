use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single chat message returned to the calling assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }
}

/// Kind of attachment carried by a [`Reference`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    #[default]
    Text,
    Image,
    File,
    Code,
}

/// Structured attachment accompanying a message.
///
/// `metadata` carries the full structured result of a tool call so callers can
/// consume the data without parsing the markdown summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Reference {
    #[must_use]
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Text,
            title: title.into(),
            content: content.into(),
            url: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Uniform result of every tool invocation.
///
/// Always carries at least one message. References are empty on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    pub messages: Vec<Message>,
    pub references: Vec<Reference>,
}

impl ResponseEnvelope {
    /// Builds a successful envelope with one assistant message and one reference.
    #[must_use]
    pub fn success(summary: impl Into<String>, reference: Reference) -> Self {
        Self {
            messages: vec![Message::assistant(summary)],
            references: vec![reference],
        }
    }

    /// Builds a failure envelope: one assistant message, no references.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(message)],
            references: Vec::new(),
        }
    }

    /// Returns the content of the first message, or an empty string.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.messages
            .first()
            .map_or("", |message| message.content.as_str())
    }

    /// Returns the metadata of the first reference, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&Value> {
        self.references
            .first()
            .and_then(|reference| reference.metadata.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_envelope_serializes_without_references() {
        let envelope = ResponseEnvelope::failure("Error fetching order status: boom");
        let value = serde_json::to_value(&envelope).expect("serialize envelope");

        assert_eq!(
            value,
            json!({
                "messages": [{"role": "assistant", "content": "Error fetching order status: boom"}],
                "references": []
            })
        );
    }

    #[test]
    fn reference_uses_type_key_and_skips_empty_fields() {
        let reference = Reference::text("Groww LTP Data", "Last traded prices")
            .with_metadata(json!({"status": "SUCCESS"}));
        let value = serde_json::to_value(&reference).expect("serialize reference");

        assert_eq!(value["type"], "text");
        assert_eq!(value["metadata"]["status"], "SUCCESS");
        assert!(value.get("url").is_none());
    }

    #[test]
    fn summary_reads_first_message() {
        let envelope = ResponseEnvelope::success("hello", Reference::text("t", "c"));
        assert_eq!(envelope.summary(), "hello");
        assert!(envelope.metadata().is_none());
    }
}
