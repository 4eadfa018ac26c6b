//! Envelope codec for the surface channel.
//!
//! Both directions exchange the same JSON shape:
//! `{ "tag": string, "name"?: string, "data"?: any }`.
//! Outbound commands use an action category as `tag` and a verb as `name`;
//! inbound messages use an upper-case tag and carry their payload in `data`.

use richedit_common::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound tags sent by the surface.
pub mod tags {
    pub const CONTENT_HTML_RESPONSE: &str = "CONTENT_HTML_RESPONSE";
    pub const LOG: &str = "LOG";
    pub const SELECTION_CHANGE: &str = "SELECTION_CHANGE";
    pub const CONTENT_FOCUSED: &str = "CONTENT_FOCUSED";
    pub const OFFSET_HEIGHT: &str = "OFFSET_HEIGHT";
}

/// Outbound action categories.
pub mod actions {
    pub const CONTENT: &str = "content";
    pub const INSERT_IMAGE: &str = "insertImage";
    pub const UPDATE_HEIGHT: &str = "updateHeight";
}

/// The wire unit. The surface's own script tags envelopes with `type`, so
/// that key is accepted on decode; encode always writes `tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(alias = "type")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            data: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Commands the host sends to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `content/setHtml`: replace the surface content.
    SetHtml(String),
    /// `content/postHtml`: ask for the current content back.
    PostHtml,
    /// `content/blur`
    Blur,
    /// `content/focus`
    Focus,
    /// `insertImage/result`: insert an image with the given attributes.
    InsertImage(Value),
    /// `updateHeight`: ask for the rendered height.
    UpdateHeight,
}

impl Command {
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::SetHtml(html) => Envelope::new(actions::CONTENT)
                .with_name("setHtml")
                .with_data(Value::String(html.clone())),
            Self::PostHtml => Envelope::new(actions::CONTENT).with_name("postHtml"),
            Self::Blur => Envelope::new(actions::CONTENT).with_name("blur"),
            Self::Focus => Envelope::new(actions::CONTENT).with_name("focus"),
            Self::InsertImage(attrs) => Envelope::new(actions::INSERT_IMAGE)
                .with_name("result")
                .with_data(attrs.clone()),
            Self::UpdateHeight => Envelope::new(actions::UPDATE_HEIGHT),
        }
    }

    /// Recognize an outbound envelope. Used by surface implementations.
    pub fn from_envelope(envelope: &Envelope) -> Option<Self> {
        let name = envelope.name.as_deref();
        match (envelope.tag.as_str(), name) {
            (actions::CONTENT, Some("setHtml")) => {
                let html = match &envelope.data {
                    Some(Value::String(s)) => s.clone(),
                    _ => String::new(),
                };
                Some(Self::SetHtml(html))
            }
            (actions::CONTENT, Some("postHtml")) => Some(Self::PostHtml),
            (actions::CONTENT, Some("blur")) => Some(Self::Blur),
            (actions::CONTENT, Some("focus")) => Some(Self::Focus),
            (actions::INSERT_IMAGE, Some("result")) => Some(Self::InsertImage(
                envelope.data.clone().unwrap_or(Value::Null),
            )),
            (actions::UPDATE_HEIGHT, _) => Some(Self::UpdateHeight),
            _ => None,
        }
    }
}

/// Serialize an envelope to its wire string.
pub fn encode_envelope(envelope: &Envelope) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|_| "null".to_string())
}

/// Serialize an outbound command. Deterministic for a given command.
pub fn encode(command: &Command) -> String {
    encode_envelope(&command.to_envelope())
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Messages the surface sends to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    ContentHtmlResponse(String),
    Log(Vec<Value>),
    /// Selection state; its shape belongs to the surface.
    SelectionChange(Value),
    ContentFocused,
    OffsetHeight(f64),
}

impl Inbound {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ContentHtmlResponse(_) => tags::CONTENT_HTML_RESPONSE,
            Self::Log(_) => tags::LOG,
            Self::SelectionChange(_) => tags::SELECTION_CHANGE,
            Self::ContentFocused => tags::CONTENT_FOCUSED,
            Self::OffsetHeight(_) => tags::OFFSET_HEIGHT,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let envelope = Envelope::new(self.tag());
        match self {
            Self::ContentHtmlResponse(html) => envelope.with_data(Value::String(html.clone())),
            Self::Log(values) => envelope.with_data(Value::Array(values.clone())),
            Self::SelectionChange(state) => envelope.with_data(state.clone()),
            Self::ContentFocused => envelope,
            Self::OffsetHeight(height) => envelope.with_data(serde_json::json!(height)),
        }
    }

    pub fn encode(&self) -> String {
        encode_envelope(&self.to_envelope())
    }

    fn from_envelope(envelope: Envelope) -> Decoded {
        let data = envelope.data.clone();
        let message = match envelope.tag.as_str() {
            tags::CONTENT_HTML_RESPONSE => Self::ContentHtmlResponse(match data {
                Some(Value::String(html)) => html,
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            }),
            tags::LOG => Self::Log(match data {
                Some(Value::Array(values)) => values,
                None | Some(Value::Null) => Vec::new(),
                Some(single) => vec![single],
            }),
            tags::SELECTION_CHANGE => Self::SelectionChange(data.unwrap_or(Value::Null)),
            tags::CONTENT_FOCUSED => Self::ContentFocused,
            tags::OFFSET_HEIGHT => match data.as_ref().and_then(Value::as_f64) {
                Some(height) => Self::OffsetHeight(height),
                None => {
                    return Decoded::Malformed(format!(
                        "{} data is not a number",
                        tags::OFFSET_HEIGHT
                    ))
                }
            },
            _ => return Decoded::UnknownTag(envelope),
        };
        Decoded::Message(message)
    }
}

/// Result of decoding one inbound string.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(Inbound),
    /// Structurally valid envelope with a tag the host does not handle.
    UnknownTag(Envelope),
    /// Not an envelope, or a known tag with an unusable payload.
    Malformed(String),
}

/// Parse the raw envelope without interpreting its tag.
pub fn decode_envelope(raw: &str) -> Result<Envelope, BridgeError> {
    serde_json::from_str(raw).map_err(|e| BridgeError::MalformedMessage(e.to_string()))
}

/// Decode an inbound string. Never fails: bad input becomes `Malformed`.
pub fn decode(raw: &str) -> Decoded {
    match decode_envelope(raw) {
        Ok(envelope) => Inbound::from_envelope(envelope),
        Err(e) => Decoded::Malformed(e.to_string()),
    }
}
