//! Routes one inbound string to exactly one handler.

use richedit_common::BridgeError;
use serde_json::Value;
use tracing::debug;

use crate::codec::{self, Decoded, Inbound};

/// Receiver side of the dispatcher. Each method is one inbound tag.
pub trait InboundHandler {
    fn content_html(&self, html: String);
    fn log(&self, values: Vec<Value>);
    fn selection_change(&self, state: Value);
    fn content_focused(&self);
    fn offset_height(&self, height: f64);
}

/// What happened to a dispatched message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Routed to the handler for this tag.
    Handled(&'static str),
    /// Dropped without side effects.
    Ignored(BridgeError),
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Decode `raw` and run the matching handler to completion.
///
/// Malformed input and unknown tags are dropped; the reason is returned
/// for callers that want it, never raised.
pub fn dispatch<H: InboundHandler + ?Sized>(raw: &str, handler: &H) -> DispatchOutcome {
    let message = match codec::decode(raw) {
        Decoded::Message(message) => message,
        Decoded::UnknownTag(envelope) => {
            debug!(tag = %envelope.tag, "inbound message dropped: unknown tag");
            return DispatchOutcome::Ignored(BridgeError::UnknownTag(envelope.tag));
        }
        Decoded::Malformed(reason) => {
            debug!(
                body_len = raw.len(),
                reason = %reason,
                "inbound message dropped: malformed"
            );
            return DispatchOutcome::Ignored(BridgeError::MalformedMessage(reason));
        }
    };

    let tag = message.tag();
    match message {
        Inbound::ContentHtmlResponse(html) => handler.content_html(html),
        Inbound::Log(values) => handler.log(values),
        Inbound::SelectionChange(state) => handler.selection_change(state),
        Inbound::ContentFocused => handler.content_focused(),
        Inbound::OffsetHeight(height) => handler.offset_height(height),
    }
    DispatchOutcome::Handled(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tags;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InboundHandler for Recorder {
        fn content_html(&self, html: String) {
            self.push(format!("html:{html}"));
        }
        fn log(&self, values: Vec<Value>) {
            self.push(format!("log:{}", values.len()));
        }
        fn selection_change(&self, state: Value) {
            self.push(format!("selection:{state}"));
        }
        fn content_focused(&self) {
            self.push("focused".into());
        }
        fn offset_height(&self, height: f64) {
            self.push(format!("height:{height}"));
        }
    }

    #[test]
    fn each_tag_reaches_one_handler() {
        let recorder = Recorder::default();
        let inputs = [
            json!({"tag": "CONTENT_HTML_RESPONSE", "data": "<p>x</p>"}),
            json!({"tag": "LOG", "data": ["a", "b"]}),
            json!({"tag": "SELECTION_CHANGE", "data": {"bold": true}}),
            json!({"tag": "CONTENT_FOCUSED"}),
            json!({"tag": "OFFSET_HEIGHT", "data": 340}),
        ];
        for input in &inputs {
            assert!(dispatch(&input.to_string(), &recorder).is_handled());
        }
        assert_eq!(
            recorder.calls(),
            vec![
                "html:<p>x</p>",
                "log:2",
                r#"selection:{"bold":true}"#,
                "focused",
                "height:340",
            ]
        );
    }

    #[test]
    fn handled_outcome_names_the_tag() {
        let recorder = Recorder::default();
        let outcome = dispatch(r#"{"tag":"CONTENT_FOCUSED"}"#, &recorder);
        assert_eq!(outcome, DispatchOutcome::Handled(tags::CONTENT_FOCUSED));
    }

    #[test]
    fn malformed_input_has_no_side_effect() {
        let recorder = Recorder::default();
        let outcome = dispatch("not json", &recorder);
        assert!(matches!(
            outcome,
            DispatchOutcome::Ignored(BridgeError::MalformedMessage(_))
        ));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let recorder = Recorder::default();
        let outcome = dispatch(r#"{"tag":"KEYBOARD_SHOWN","data":1}"#, &recorder);
        assert_eq!(
            outcome,
            DispatchOutcome::Ignored(BridgeError::UnknownTag("KEYBOARD_SHOWN".into()))
        );
        assert!(recorder.calls().is_empty());
    }
}
