//! Server response envelope normalization
//!
//! Endpoints answer in one of two success shapes: the bare JSON value, or a
//! wrapper `{status, message, result}` with the payload under `result`. The
//! tagged union below is the single normalization point; services never
//! duck-type the shape per call site.

use serde::Deserialize;

use crate::error::ApiError;

/// The two success shapes a server reply can take
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub enum Envelope<T> {
    /// `{status, message, result}` wrapper; `result` may be absent
    Wrapped {
        status: i64,
        message: String,
        #[serde(default)]
        result: Option<T>,
    },
    /// The payload itself, unwrapped
    Bare(T),
}

impl<T> Envelope<T> {
    /// Normalize to the payload. A wrapper without a `result` is a contract
    /// violation for single-object endpoints.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Envelope::Bare(value) => Ok(value),
            Envelope::Wrapped {
                result: Some(value),
                ..
            } => Ok(value),
            Envelope::Wrapped {
                message, result: None, ..
            } => Err(ApiError::Unknown {
                detail: format!("Response contained no result ({})", message),
            }),
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Normalize a list reply. A wrapper without a `result` means an empty
    /// list, not an error.
    pub fn into_list(self) -> Vec<T> {
        match self {
            Envelope::Bare(items) => items,
            Envelope::Wrapped { result, .. } => result.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Widget {
        id: String,
        count: u32,
    }

    #[test]
    fn bare_object_normalizes_to_itself() {
        let env: Envelope<Widget> =
            serde_json::from_value(json!({"id": "w1", "count": 3})).unwrap();
        let widget = env.into_result().unwrap();
        assert_eq!(
            widget,
            Widget {
                id: "w1".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn wrapped_object_unwraps_result() {
        let env: Envelope<Widget> = serde_json::from_value(json!({
            "status": 200,
            "message": "Success",
            "result": {"id": "w1", "count": 3}
        }))
        .unwrap();
        let widget = env.into_result().unwrap();
        assert_eq!(widget.id, "w1");
        assert_eq!(widget.count, 3);
    }

    #[test]
    fn wrapped_without_result_is_an_error_for_objects() {
        let env: Envelope<Widget> = serde_json::from_value(json!({
            "status": 200,
            "message": "Created"
        }))
        .unwrap();
        assert!(env.into_result().is_err());
    }

    #[test]
    fn bare_and_wrapped_lists_normalize_equal() {
        let payload = json!([{"id": "w1", "count": 1}, {"id": "w2", "count": 2}]);

        let bare: Envelope<Vec<Widget>> = serde_json::from_value(payload.clone()).unwrap();
        let wrapped: Envelope<Vec<Widget>> = serde_json::from_value(json!({
            "status": 200,
            "message": "Success",
            "result": payload
        }))
        .unwrap();

        assert_eq!(bare.into_list(), wrapped.into_list());
    }

    #[test]
    fn wrapped_list_without_result_is_empty() {
        let env: Envelope<Vec<Widget>> = serde_json::from_value(json!({
            "status": 200,
            "message": "Success"
        }))
        .unwrap();
        assert!(env.into_list().is_empty());
    }
}
