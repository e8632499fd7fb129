//! Remote fault payloads and user-facing error messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a field-error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub message: String,
}

/// Structured body returned with a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaultBody {
    Fields(Vec<FieldError>),
    Message { message: String },
}

/// A failed backend call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFault {
    #[serde(default)]
    pub body: Option<FaultBody>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status_text: String,
}

impl RemoteFault {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn from_field_errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            body: Some(FaultBody::Fields(
                messages
                    .into_iter()
                    .map(|m| FieldError { message: m.into() })
                    .collect(),
            )),
            ..Default::default()
        }
    }

    /// The most specific messages this fault carries
    fn extract(&self) -> Vec<String> {
        match &self.body {
            Some(FaultBody::Fields(errors)) => {
                errors.iter().map(|e| e.message.clone()).collect()
            }
            Some(FaultBody::Message { message }) => vec![message.clone()],
            None if !self.message.is_empty() => vec![self.message.clone()],
            None => vec![self.status_text.clone()],
        }
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_error_message(std::slice::from_ref(self)))
    }
}

impl std::error::Error for RemoteFault {}

impl From<anyhow::Error> for RemoteFault {
    fn from(err: anyhow::Error) -> Self {
        RemoteFault::from_message(format!("{:#}", err))
    }
}

/// Flatten faults into one line: most specific message per fault, empties
/// dropped, joined with a single space
pub fn build_error_message(faults: &[RemoteFault]) -> String {
    faults
        .iter()
        .flat_map(RemoteFault::extract)
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_array_messages() {
        let fault = RemoteFault::from_field_errors(["A", "B"]);
        assert_eq!(build_error_message(&[fault]), "A B");
    }

    #[test]
    fn test_body_message_wins_over_plain_message() {
        let fault = RemoteFault {
            body: Some(FaultBody::Message {
                message: "from body".to_string(),
            }),
            message: "plain".to_string(),
            status_text: "Bad Request".to_string(),
        };
        assert_eq!(build_error_message(&[fault]), "from body");
    }

    #[test]
    fn test_falls_back_to_message_then_status_text() {
        let faults = vec![
            RemoteFault::from_message("X"),
            RemoteFault {
                status_text: "Server Error".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(build_error_message(&faults), "X Server Error");
    }

    #[test]
    fn test_empty_extractions_are_dropped() {
        let faults = vec![
            RemoteFault::default(),
            RemoteFault::from_message("only"),
            RemoteFault::default(),
        ];
        assert_eq!(build_error_message(&faults), "only");
        assert_eq!(build_error_message(&[]), "");
    }

    #[test]
    fn test_deserialize_wire_faults() {
        let faults: Vec<RemoteFault> = serde_json::from_str(
            r#"[
                {"body": [{"message": "A"}, {"message": "B"}]},
                {"body": {"message": "C"}, "statusText": "Bad"},
                {"message": "D"}
            ]"#,
        )
        .unwrap();
        assert_eq!(build_error_message(&faults), "A B C D");
    }

    #[test]
    fn test_display_uses_extracted_message() {
        let fault = RemoteFault::from_field_errors(["bad id"]);
        assert_eq!(fault.to_string(), "bad id");
    }
}
