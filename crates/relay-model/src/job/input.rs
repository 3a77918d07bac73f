use serde::{Deserialize, Serialize};

/// Input payload of a job, forwarded verbatim to the text-generation provider.
///
/// All fields are required. `history` also accepts the older `chat_history` name on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInput {
    /// Main text the provider should work on.
    pub content: String,
    /// Comma-separated (or free-form) keywords steering the generation.
    pub keywords: String,
    /// Prior conversation, serialized by the caller.
    #[serde(alias = "chat_history")]
    pub history: String,
}

impl JobInput {
    /// Convenience constructor.
    pub fn new(
        content: impl Into<String>,
        keywords: impl Into<String>,
        history: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            keywords: keywords.into(),
            history: history.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JobInput;

    #[test]
    fn deserializes_all_fields() {
        let json = r#"{"content":"hello","keywords":"greeting","history":"[]"}"#;
        let input: JobInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, JobInput::new("hello", "greeting", "[]"));
    }

    #[test]
    fn accepts_chat_history_alias() {
        let json = r#"{"content":"hello","keywords":"","chat_history":"prev"}"#;
        let input: JobInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.history, "prev");
    }

    #[test]
    fn missing_field_is_rejected() {
        let json = r#"{"content":"hello","keywords":"greeting"}"#;
        let err = serde_json::from_str::<JobInput>(json).unwrap_err();
        assert!(err.to_string().contains("history"), "{err}");
    }
}
