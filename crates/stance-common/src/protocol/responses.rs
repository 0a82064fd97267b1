//! Posture service response types.

use serde::{Deserialize, Serialize};

use super::error::{Result, StanceError};
use super::RequestId;

/// A response returned from the posture service to a client.
///
/// Exactly one of `result` and `error` is expected to be present. A reply
/// with neither is treated as a null result so that acknowledgements (for
/// example to a stop request) need no payload.
///
/// # Example
///
/// ```
/// use stance_common::protocol::Response;
/// use serde_json::json;
///
/// let ok = Response::ok(7, json!(["Stand", "Sit"]));
/// assert_eq!(ok.into_result().unwrap(), json!(["Stand", "Sit"]));
///
/// let fault = Response::fault(7, "unknown posture \"Moonwalk\"");
/// assert!(fault.into_result().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Request identifier this response corresponds to.
    pub id: RequestId,
    /// Result value (present on success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Fault message (present on failure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Creates a successful response carrying `result`.
    pub fn ok(id: RequestId, result: serde_json::Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a fault response carrying an error message.
    pub fn fault(id: RequestId, error: impl Into<String>) -> Self {
        Response {
            id,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Collapses the envelope into the service's answer.
    ///
    /// A fault message becomes [`StanceError::Fault`]; otherwise the result
    /// value is returned, with an absent result standing in for JSON null.
    pub fn into_result(self) -> Result<serde_json::Value> {
        match self.error {
            Some(message) => Err(StanceError::Fault(message)),
            None => Ok(self.result.unwrap_or(serde_json::Value::Null)),
        }
    }
}
