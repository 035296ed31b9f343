//! Error types for decoding Messenger payloads.
//!
//! Two failure kinds exist: the bytes were not the JSON shape we expected
//! ([`DecodeError`]), or Facebook answered a send with an error object
//! ([`ApiError`]). [`SendError`] joins them for the Send API decoder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The payload was not valid JSON, or its shape did not match the model.
#[derive(Debug, Error)]
#[error("malformed Messenger payload")]
pub struct DecodeError(#[from] serde_json::Error);

impl DecodeError {
    /// Line of the input where decoding stopped, 1-based.
    pub fn line(&self) -> usize {
        self.0.line()
    }

    pub fn column(&self) -> usize {
        self.0.column()
    }

    /// True when the input was valid JSON of the wrong shape.
    pub fn is_shape_mismatch(&self) -> bool {
        self.0.is_data()
    }
}

/// Error object Facebook returns when a Send API call fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Error)]
#[serde(default)]
#[error("FB Error: Type {error_type}: {message}; FB trace ID: {fbtrace_id}")]
pub struct ApiError {
    pub code: i64,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    /// Facebook's correlation id, quote it when contacting support.
    pub fbtrace_id: String,
}

/// Why a Send API response did not yield a [`SendResponse`](crate::SendResponse).
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<serde_json::Error> for SendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(DecodeError::from(err))
    }
}
