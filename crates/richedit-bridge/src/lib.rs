//! Host-side bridge to an embedded rich-text surface.
//!
//! The surface is an opaque peer reachable only through an ordered,
//! string-message channel. This crate layers a small protocol on top:
//! - Envelope codec (`{ tag, name?, data? }` JSON)
//! - Dispatch of inbound envelopes to exactly one handler
//! - Selection and focus subscriptions with ordered fan-out
//! - A single-slot request correlator for `getContentHtml` with a timeout
//! - Deduplicated height synchronization
//! - Load/init lifecycle with a periodic `updateHeight` poll

pub mod codec;
pub mod correlator;
pub mod diagnostics;
pub mod dispatch;
pub mod height;
pub mod lifecycle;
pub mod session;
pub mod subscriptions;
pub mod transport;

mod sync;

pub use codec::{Command, Decoded, Envelope, Inbound};
pub use correlator::{ContentHtmlRequest, RequestCorrelator, Settlement};
pub use diagnostics::{DiagnosticsSink, TracingDiagnostics};
pub use dispatch::{dispatch, DispatchOutcome, InboundHandler};
pub use height::HeightSynchronizer;
pub use lifecycle::{LifecycleController, LifecycleState};
pub use session::{BridgeSession, SessionOptions};
pub use subscriptions::SubscriptionRegistry;
pub use transport::{ChannelTransport, Transport};
