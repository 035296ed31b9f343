//! Wire model for the Facebook Messenger Platform.
//!
//! Decodes webhook bodies into [`WebhookPayload`] and Send API responses into
//! [`SendResponse`] or an [`ApiError`]. No transport lives here: callers hand
//! in the bytes they received.
//!
//! ```
//! let body = br#"{"object":"page","entry":[{"id":"PAGE_ID","time":1,"messaging":[
//!     {"sender":{"id":"PSID"},"recipient":{"id":"PAGE_ID"},"timestamp":1,
//!      "message":{"mid":"m1","text":"ping"}}]}]}"#;
//!
//! let payload = messenger_wire::decode_webhook(body)?;
//! let event = payload.events().next().unwrap();
//! assert_eq!(event.message.as_ref().unwrap().text, "ping");
//! # Ok::<(), messenger_wire::DecodeError>(())
//! ```

use std::str::FromStr;

mod de;
pub mod error;
pub mod send;
pub mod types;

use crate::de::Object;

pub use error::{ApiError, DecodeError, SendError};
pub use send::{MessagingType, OutgoingText, RawSendResponse, SendRequest, SendResponse};
pub use types::*;

/// Decodes a webhook POST body.
pub fn decode_webhook(body: &[u8]) -> Result<WebhookPayload, DecodeError> {
    let Object(payload) = serde_json::from_slice::<Object<WebhookPayload>>(body)?;
    log_webhook(&payload);
    Ok(payload)
}

pub fn decode_webhook_str(body: &str) -> Result<WebhookPayload, DecodeError> {
    decode_webhook(body.as_bytes())
}

impl FromStr for WebhookPayload {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_webhook_str(s)
    }
}

/// Decodes a Send API response body, surfacing a platform error as
/// [`SendError::Api`].
pub fn decode_send_response(body: &[u8]) -> Result<SendResponse, SendError> {
    let Object(raw) = serde_json::from_slice::<Object<RawSendResponse>>(body)?;
    let response = SendResponse::try_from(raw)?;
    log::debug!(
        "message {} sent to {}",
        response.message_id,
        response.recipient_id
    );
    Ok(response)
}

fn log_webhook(payload: &WebhookPayload) {
    log::debug!(
        "decoded {} webhook: {} entries, {} messaging events, {} changes",
        payload.object,
        payload.entry.len(),
        payload.events().count(),
        payload.changes().count()
    );

    for event in payload.events().filter(|event| event.payload_count() > 1) {
        log::warn!(
            "event from {} at {} carries {} payloads, treating it as {:?}",
            event.sender.id,
            event.timestamp,
            event.payload_count(),
            event.kind()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_webhook_missing_optionals() {
        let body = json!({
            "object": "page",
            "entry": [{
                "id": "PAGE_ID",
                "time": 1458692752478_i64,
                "messaging": [{
                    "sender": {"id": "PSID"},
                    "recipient": {"id": "PAGE_ID"},
                    "timestamp": 1458692752478_i64,
                    "message": {"mid": "m1", "text": "hello"}
                }]
            }]
        })
        .to_string();

        let payload = decode_webhook_str(&body).unwrap();
        let entry = &payload.entry[0];
        assert!(entry.changes.is_empty());
        assert_eq!(entry.messaging[0].optin, None);
        assert_eq!(entry.messaging[0].referral, None);
        assert_eq!(entry.messaging[0].sender.user_ref, "");
    }

    #[test]
    fn test_decode_webhook_entry_as_string_fails() {
        let err = decode_webhook(br#"{"object":"page","entry":"nope"}"#).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_decode_webhook_top_level_array_fails() {
        let err = decode_webhook(br#"["page",[]]"#).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_decode_send_response_top_level_array_fails() {
        assert!(matches!(
            decode_send_response(br#"["m_AG5Hz2U","1254477777772919",null]"#),
            Err(SendError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_webhook_not_json_fails() {
        assert!(decode_webhook(b"hub.mode=subscribe").is_err());
    }

    #[test]
    fn test_decode_webhook_empty_entry() {
        let payload: WebhookPayload = r#"{"object":"page","entry":[]}"#.parse().unwrap();
        assert!(payload.entry.is_empty());
        assert_eq!(payload.events().count(), 0);
    }

    #[test]
    fn test_decode_webhook_ignores_unknown_fields() {
        let payload = decode_webhook(
            br#"{"object":"page","entry":[{"id":"1","time":2,"messaging":[],"hop_context":[{"app_id":1}]}],"extra":true}"#,
        )
        .unwrap();
        assert_eq!(payload.entry[0].id, "1");
    }

    #[test]
    fn test_decode_send_response_success() {
        let response = decode_send_response(
            br#"{"recipient_id":"1254477777772919","message_id":"m_AG5Hz2U"}"#,
        )
        .unwrap();

        assert_eq!(response.recipient_id, "1254477777772919");
        assert_eq!(response.message_id, "m_AG5Hz2U");
    }

    #[test]
    fn test_decode_send_response_null_error() {
        let response =
            decode_send_response(br#"{"recipient_id":"r","message_id":"m","error":null}"#)
                .unwrap();
        assert_eq!(response.message_id, "m");
    }

    #[test]
    fn test_decode_send_response_api_error() {
        let body = json!({
            "error": {
                "message": "Invalid OAuth access token.",
                "type": "OAuthException",
                "code": 190,
                "error_subcode": 1234567,
                "fbtrace_id": "BLBz/WZt8dN"
            }
        })
        .to_string();

        match decode_send_response(body.as_bytes()) {
            Err(SendError::Api(err)) => {
                assert_eq!(err.code, 190);
                assert_eq!(err.error_type, "OAuthException");
                assert_eq!(err.message, "Invalid OAuth access token.");
                assert_eq!(err.fbtrace_id, "BLBz/WZt8dN");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_send_response_malformed() {
        assert!(matches!(
            decode_send_response(b"<html>502 Bad Gateway</html>"),
            Err(SendError::Decode(_))
        ));
    }
}
