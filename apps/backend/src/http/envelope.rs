//! Response envelope shared by every API route.
//!
//! Clients receive `{ error, data, message }` with the HTTP status carrying
//! the outcome class; `data` is null on failure.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub error: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            error: false,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            data: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;

    #[test]
    fn success_serializes_with_data() {
        let body = serde_json::to_value(Envelope::success(vec![1, 2], "ok")).unwrap();
        assert_eq!(body["error"], false);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert_eq!(body["message"], "ok");
    }

    #[test]
    fn failure_serializes_with_null_data() {
        let body = serde_json::to_value(Envelope::<()>::failure("nope")).unwrap();
        assert_eq!(body["error"], true);
        assert!(body["data"].is_null());
    }
}
