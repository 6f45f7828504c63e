use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bella_core::AppError;

/// Message shown when a failed call carries no readable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Result of a call to the salon API.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failed call to the salon API, reduced to user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    messages: Vec<String>,
}

impl RemoteError {
    /// Creates an error from messages. An empty list falls back to a generic
    /// message so there is always something to show.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        let messages = messages
            .into_iter()
            .filter(|message| !message.trim().is_empty())
            .collect::<Vec<_>>();

        if messages.is_empty() {
            return Self::fallback();
        }

        Self { messages }
    }

    /// Creates an error with a single message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(vec![message.into()])
    }

    /// Creates the generic error.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            messages: vec![FALLBACK_ERROR_MESSAGE.to_owned()],
        }
    }

    /// Returns the messages, one notification each.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Normalizes an API error body.
    ///
    /// Accepts an `errors` array of `{msg}` objects or strings, an `errors`
    /// map of field to message or messages, or a single `message`.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let messages = match body.get("errors") {
            Some(Value::Array(items)) => items.iter().filter_map(validation_message).collect(),
            Some(Value::Object(fields)) => fields.values().flat_map(field_messages).collect(),
            _ => Vec::new(),
        };
        if !messages.is_empty() {
            return Self::new(messages);
        }

        match body.get("message").and_then(Value::as_str) {
            Some(message) => Self::message(message),
            None => Self::fallback(),
        }
    }
}

fn validation_message(item: &Value) -> Option<String> {
    match item {
        Value::String(message) => Some(message.clone()),
        Value::Object(entry) => entry
            .get("msg")
            .or_else(|| entry.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

impl Display for RemoteError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.messages.join("; ").as_str())
    }
}

impl std::error::Error for RemoteError {}

impl From<RemoteError> for AppError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value.to_string())
    }
}

/// Uniform `{success, data, message}` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the API reports success.
    pub success: bool,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Validation errors in any of the supported shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl ApiEnvelope {
    /// Reads a successful response body.
    ///
    /// Bodies that already carry `success` are taken as envelopes; anything
    /// else is wrapped as successful data.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        if body.get("success").is_some_and(Value::is_boolean)
            && let Ok(envelope) = serde_json::from_value::<Self>(body.clone())
        {
            return envelope;
        }

        Self {
            success: true,
            data: (!body.is_null()).then_some(body),
            message: None,
            errors: None,
        }
    }

    /// Converts the envelope into the payload or a normalized error.
    pub fn into_result(self) -> RemoteResult<Option<Value>> {
        if self.success {
            return Ok(self.data);
        }

        let mut body = serde_json::Map::new();
        if let Some(message) = self.message {
            body.insert("message".to_owned(), Value::String(message));
        }
        if let Some(errors) = self.errors {
            body.insert("errors".to_owned(), errors);
        }
        Err(RemoteError::from_body(&Value::Object(body)))
    }

    /// Converts the envelope into a list of records.
    pub fn into_records(self) -> RemoteResult<Vec<Value>> {
        match self.into_result()? {
            Some(Value::Array(records)) => Ok(records),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(_) => Err(RemoteError::message("Unexpected list response from server")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiEnvelope, FALLBACK_ERROR_MESSAGE, RemoteError};

    #[test]
    fn validator_arrays_become_one_message_each() {
        let error = RemoteError::from_body(&json!({
            "errors": [
                {"msg": "Email is invalid", "param": "email"},
                {"msg": "Phone is required", "param": "phone"}
            ]
        }));

        assert_eq!(
            error.messages(),
            ["Email is invalid".to_owned(), "Phone is required".to_owned()]
        );
    }

    #[test]
    fn field_maps_keep_every_message() {
        let error = RemoteError::from_body(&json!({
            "errors": {"name": ["Name is taken"], "price": "Price must be positive"}
        }));

        assert_eq!(error.messages().len(), 2);
        assert!(error.messages().contains(&"Name is taken".to_owned()));
        assert!(error.messages().contains(&"Price must be positive".to_owned()));
    }

    #[test]
    fn single_messages_and_fallback() {
        let error = RemoteError::from_body(&json!({"message": "Slot already booked"}));
        assert_eq!(error.messages(), ["Slot already booked".to_owned()]);

        let error = RemoteError::from_body(&json!({"status": 500}));
        assert_eq!(error.messages(), [FALLBACK_ERROR_MESSAGE.to_owned()]);
    }

    #[test]
    fn bare_bodies_are_wrapped_as_success() {
        let envelope = ApiEnvelope::from_body(json!([{"_id": "1"}]));
        assert!(envelope.success);
        assert_eq!(envelope.into_records().map(|records| records.len()), Ok(1));
    }

    #[test]
    fn unsuccessful_envelopes_carry_their_message() {
        let envelope =
            ApiEnvelope::from_body(json!({"success": false, "message": "Shift overlaps"}));
        assert_eq!(
            envelope.into_result(),
            Err(RemoteError::message("Shift overlaps"))
        );
    }
}
