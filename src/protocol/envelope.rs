//! Envelopes and framing
//!
//! **Client → Server:** one envelope, or a non-empty array of them.
//! ```json
//! { "action": "getAlbumByID", "data": 3 }
//! [ { "action": "getAlbums" }, { "action": "getUsers" } ]
//! ```
//!
//! **Server → Client:** one response envelope, or an array in request order.
//! ```json
//! { "success": true, "data": { "id": 3, "title": "Jeru" } }
//! { "success": false, "error": "album ID must be greater than 0" }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Action name; missing or null means unknown
    #[serde(default, deserialize_with = "null_as_empty")]
    pub action: String,

    /// Action payload; missing means null
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
        }
    }
}

/// A decoded request frame
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Single(Envelope),
    Batch(Vec<Envelope>),
}

impl Frame {
    /// Decode a frame: a non-empty array of envelope objects, or a single
    /// envelope object. Any other JSON shape is rejected, including arrays
    /// that serde would otherwise read as positional struct fields.
    pub fn decode(text: &str) -> AppResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|_| AppError::InvalidMessageFormat)?;

        match value {
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<Envelope>, _>>()
                .map(Frame::Batch)
                .map_err(|_| AppError::InvalidMessageFormat),
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(Frame::Single)
                .map_err(|_| AppError::InvalidMessageFormat),
            _ => Err(AppError::InvalidMessageFormat),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope.
///
/// `data` is present iff `success`; `error` is present iff not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Successful response carrying `data`
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Reply to one frame, mirroring its shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Batch(Vec<Response>),
    Single(Response),
}

impl Reply {
    /// Number of response envelopes in this reply
    pub fn len(&self) -> usize {
        match self {
            Reply::Single(_) => 1,
            Reply::Batch(responses) => responses.len(),
        }
    }

    /// Always false: a reply carries at least one envelope
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
