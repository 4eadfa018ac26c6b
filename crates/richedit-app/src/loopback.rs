//! In-process stand-in for the embedded editing surface.
//!
//! Reads outbound commands from the session's transport, keeps a copy of
//! the content, and answers the way the real surface script does.

use richedit_bridge::codec::{decode_envelope, Command, Inbound};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const LINE_HEIGHT: f64 = 20.0;
const CHARS_PER_LINE: usize = 40;
const PADDING: f64 = 16.0;

/// What the surface hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The surface finished loading.
    Loaded,
    /// One inbound envelope, already encoded.
    Message(String),
}

#[derive(Debug, Default)]
pub struct LoopbackSurface {
    html: String,
}

impl LoopbackSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Rendered height for the current content: one line per
    /// `CHARS_PER_LINE` characters, plus padding.
    pub fn rendered_height(&self) -> f64 {
        let lines = self.html.len().div_ceil(CHARS_PER_LINE).max(1);
        lines as f64 * LINE_HEIGHT + PADDING
    }

    /// Apply one outbound wire message and return the replies.
    pub fn respond(&mut self, raw: &str) -> Vec<Inbound> {
        let command = match decode_envelope(raw) {
            Ok(envelope) => Command::from_envelope(&envelope),
            Err(e) => {
                warn!(error = %e, "surface received an unreadable command");
                return Vec::new();
            }
        };
        let Some(command) = command else {
            debug!(body_len = raw.len(), "surface ignored unknown command");
            return Vec::new();
        };

        match command {
            Command::SetHtml(html) => {
                self.html = html;
                vec![Inbound::Log(vec![
                    json!("setHtml"),
                    json!(self.html.len()),
                ])]
            }
            Command::PostHtml => vec![Inbound::ContentHtmlResponse(self.html.clone())],
            Command::UpdateHeight => vec![Inbound::OffsetHeight(self.rendered_height())],
            Command::Focus => vec![Inbound::ContentFocused],
            Command::Blur => Vec::new(),
            Command::InsertImage(attributes) => {
                self.html.push_str(&image_tag(&attributes));
                vec![Inbound::SelectionChange(json!({ "image": true }))]
            }
        }
    }

    /// Serve commands until either side of the channel closes.
    /// Announces `Loaded` before reading anything.
    pub async fn run(
        mut self,
        mut outbound: mpsc::UnboundedReceiver<String>,
        inbound: mpsc::UnboundedSender<SurfaceEvent>,
    ) {
        if inbound.send(SurfaceEvent::Loaded).is_err() {
            return;
        }
        while let Some(raw) = outbound.recv().await {
            for reply in self.respond(&raw) {
                if inbound.send(SurfaceEvent::Message(reply.encode())).is_err() {
                    debug!("host side closed; surface stopping");
                    return;
                }
            }
        }
    }
}

fn image_tag(attributes: &Value) -> String {
    let mut tag = String::from("<img");
    if let Value::Object(map) = attributes {
        for (key, value) in map {
            match value {
                Value::String(s) => tag.push_str(&format!(" {key}=\"{s}\"")),
                other => tag.push_str(&format!(" {key}=\"{other}\"")),
            }
        }
    }
    tag.push('>');
    tag
}
