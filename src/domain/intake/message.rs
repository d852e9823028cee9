//! Transport-neutral inbound events and outbound replies.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationKey, ImageRef, ValidationError};

/// Longest reply the transport accepts.
pub const MAX_REPLY_CHARS: usize = 5000;

const TRUNCATION_MARKER: &str = "...";

/// Kind of inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Text,
    Image,
}

/// One message from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub identity: ConversationKey,
    pub kind: EventKind,
    /// Message text, or the image reference for image events.
    pub payload: String,
}

impl InboundEvent {
    pub fn text(identity: ConversationKey, text: impl Into<String>) -> Self {
        Self {
            identity,
            kind: EventKind::Text,
            payload: text.into(),
        }
    }

    pub fn image(identity: ConversationKey, image: impl Into<String>) -> Self {
        Self {
            identity,
            kind: EventKind::Image,
            payload: image.into(),
        }
    }

    /// Splits the event into the input the state machine consumes.
    pub fn input(&self) -> Result<TurnInput, ValidationError> {
        match self.kind {
            EventKind::Text => Ok(TurnInput::Text(self.payload.clone())),
            EventKind::Image => Ok(TurnInput::Image(ImageRef::new(self.payload.clone())?)),
        }
    }
}

/// Payload of an event once its kind is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnInput {
    Text(String),
    Image(ImageRef),
}

/// Reply text for the conversation that sent the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundReply {
    pub identity: ConversationKey,
    pub text: String,
}

impl OutboundReply {
    /// Builds a reply, truncating text that exceeds [`MAX_REPLY_CHARS`].
    pub fn new(identity: ConversationKey, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = if text.chars().count() > MAX_REPLY_CHARS {
            let keep = MAX_REPLY_CHARS - TRUNCATION_MARKER.len();
            let mut cut: String = text.chars().take(keep).collect();
            cut.push_str(TRUNCATION_MARKER);
            cut
        } else {
            text
        };
        Self { identity, text }
    }
}
