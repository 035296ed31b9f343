//! # Messenger Webhook Schemas
//!
//! Data structures for the JSON bodies Facebook POSTs to a Messenger webhook.
//!
//! Decoding is lenient about content: every struct takes `#[serde(default)]`,
//! so a field the platform leaves out decodes to its empty value and unknown
//! fields are ignored. It is strict about shape: nested structs only accept
//! JSON objects. On encode, empty optional fields are skipped, matching what
//! the platform itself sends.

use serde::{Deserialize, Serialize};

use crate::de::{object, objects, optional_object};

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookPayload {
    /// `"page"` for Messenger.
    pub object: String,
    #[serde(deserialize_with = "objects")]
    pub entry: Vec<Entry>,
}

impl WebhookPayload {
    /// Every messaging event across all entries, in wire order.
    pub fn events(&self) -> impl Iterator<Item = &MessagingEvent> {
        self.entry.iter().flat_map(|entry| entry.messaging.iter())
    }

    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.entry.iter().flat_map(|entry| entry.changes.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Entry {
    pub id: String,
    pub time: i64,
    #[serde(deserialize_with = "objects")]
    pub messaging: Vec<MessagingEvent>,
    /// Page feed changes, when subscribed to `feed`.
    #[serde(
        deserialize_with = "objects",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub changes: Vec<Change>,
}

/// A single messaging event.
///
/// The sub-payloads are independent optionals. Real events carry one of them,
/// but nothing here rejects an event carrying several or none; see
/// [`MessagingEvent::kind`] for a classified view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessagingEvent {
    #[serde(deserialize_with = "object")]
    pub sender: Sender,
    #[serde(deserialize_with = "object")]
    pub recipient: Recipient,
    pub timestamp: i64,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<Message>,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery: Option<Delivery>,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub postback: Option<Postback>,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub referral: Option<Referral>,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub optin: Option<Optin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A message the page itself sent, echoed back.
    Echo,
    Message,
    Delivery,
    Postback,
    Referral,
    Optin,
    Unknown,
}

impl MessagingEvent {
    /// Classifies the event by its first populated sub-payload, checked in the
    /// order message, delivery, postback, referral, optin.
    pub fn kind(&self) -> EventKind {
        if let Some(message) = &self.message {
            return if message.is_echo {
                EventKind::Echo
            } else {
                EventKind::Message
            };
        }
        if self.delivery.is_some() {
            EventKind::Delivery
        } else if self.postback.is_some() {
            EventKind::Postback
        } else if self.referral.is_some() {
            EventKind::Referral
        } else if self.optin.is_some() {
            EventKind::Optin
        } else {
            EventKind::Unknown
        }
    }

    pub fn payload_count(&self) -> usize {
        [
            self.message.is_some(),
            self.delivery.is_some(),
            self.postback.is_some(),
            self.referral.is_some(),
            self.optin.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Sender {
    pub id: String,
    /// Set instead of `id` for users who came in through the checkbox plugin.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_ref: String,
}

impl Sender {
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty() && !self.user_ref.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Recipient {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Message {
    pub mid: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_echo: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub app_id: i64,
    /// Only present on echoes. `Some("")` is kept apart from absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Delivery {
    pub mids: Vec<String>,
    /// Every message sent at or before this timestamp has been delivered.
    pub watermark: i64,
}

impl Delivery {
    pub fn includes(&self, mid: &str) -> bool {
        self.mids.iter().any(|delivered| delivered == mid)
    }

    pub fn covers(&self, timestamp: i64) -> bool {
        timestamp <= self.watermark
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Postback {
    pub title: String,
    pub payload: String,
    #[serde(
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub referral: Option<Referral>,
}

impl Postback {
    pub fn referral(&self) -> Option<&Referral> {
        self.referral.as_ref()
    }
}

/// Where a user came from: m.me links, ads, the customer chat plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Referral {
    #[serde(rename = "ref")]
    pub reference: String,
    pub source: String,
    #[serde(rename = "type")]
    pub referral_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ad_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub referer_uri: String,
    /// Customer chat plugin user who is not logged in to Facebook.
    #[serde(skip_serializing_if = "is_false")]
    pub is_guest_user: bool,
}

/// One-time notification opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Optin {
    #[serde(rename = "type")]
    pub optin_type: String,
    pub payload: String,
    #[serde(rename = "one_time_notif_token")]
    pub one_time_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Change {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field: String,
    #[serde(deserialize_with = "object")]
    pub value: ChangeValue,
}

/// Which of these are set depends on [`Change::field`] and `item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChangeValue {
    #[serde(
        deserialize_with = "object",
        skip_serializing_if = "ChangeAuthor::is_empty"
    )]
    pub from: ChangeAuthor,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_id: String,
    /// Epoch seconds.
    #[serde(skip_serializing_if = "is_zero")]
    pub created_time: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reaction_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub verb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChangeAuthor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl ChangeAuthor {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty()
    }
}
