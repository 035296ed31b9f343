//! # Send API Schemas
//!
//! Request and response bodies for `POST /me/messages`.

use serde::{Deserialize, Serialize};

use crate::de::optional_object;
use crate::error::ApiError;
use crate::types::Recipient;

/// Minimal text message request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub recipient: Recipient,
    pub messaging_type: MessagingType,
    pub message: OutgoingText,
}

impl SendRequest {
    /// A reply to a message the user sent, inside the 24 hour window.
    pub fn text(recipient_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: recipient_id.into(),
            },
            messaging_type: MessagingType::Response,
            message: OutgoingText { text: text.into() },
        }
    }

    pub fn with_messaging_type(mut self, messaging_type: MessagingType) -> Self {
        self.messaging_type = messaging_type;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessagingType {
    Response,
    Update,
    MessageTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingText {
    pub text: String,
}

/// Body of a Send API response, before checking for an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawSendResponse {
    pub message_id: String,
    pub recipient_id: String,
    #[serde(deserialize_with = "optional_object")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SendResponse {
    pub message_id: String,
    pub recipient_id: String,
}

impl TryFrom<RawSendResponse> for SendResponse {
    type Error = ApiError;

    fn try_from(raw: RawSendResponse) -> Result<Self, Self::Error> {
        match raw.error {
            Some(err) => Err(err),
            None => Ok(Self {
                message_id: raw.message_id,
                recipient_id: raw.recipient_id,
            }),
        }
    }
}
