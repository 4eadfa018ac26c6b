mod cli;
mod loopback;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use richedit_bridge::{BridgeSession, ChannelTransport, SessionOptions};
use richedit_common::ConfigError;
use richedit_config::BridgeConfig;
use serde_json::json;
use tokio::sync::{mpsc, Notify};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use loopback::{LoopbackSurface, SurfaceEvent};

const DEFAULT_LOG_DIRECTIVE: &str = "richedit=info";

fn load_config(path: Option<&str>) -> Result<BridgeConfig, ConfigError> {
    match path {
        Some(path) => richedit_config::load_from_path(Path::new(path)),
        None => richedit_config::load_default(),
    }
}

fn init_logging(directive: &str) {
    let filter =
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Config comes first so its log level can seed the filter.
    let loaded = load_config(args.config.as_deref());
    let mut config = loaded.clone().unwrap_or_default();

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&directive);

    if let Err(e) = loaded {
        warn!(error = %e, "config unavailable, using defaults");
    }
    if let Some(content) = args.content {
        config.session.initial_content = content;
    }

    info!(
        content_len = config.session.initial_content.len(),
        run_ms = args.run_ms,
        "richedit starting"
    );

    let height_changes = Arc::new(AtomicUsize::new(0));
    let ready = Arc::new(Notify::new());
    let options = SessionOptions::from_config(&config)
        .on_height_change({
            let height_changes = Arc::clone(&height_changes);
            move || {
                height_changes.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_initialized({
            let ready = Arc::clone(&ready);
            move || ready.notify_one()
        });

    let (transport, outbound) = ChannelTransport::new();
    let session = BridgeSession::new(transport, options);
    session.register_selection_listener(|state| info!(%state, "selection changed"));
    session.register_focus_listener(|| info!("surface focused"));

    // Surface -> session pump.
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let surface = tokio::spawn(LoopbackSurface::new().run(outbound, events_tx));
    let pump = {
        let session = session.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                match event {
                    SurfaceEvent::Loaded => session.surface_loaded(),
                    SurfaceEvent::Message(raw) => {
                        session.handle_message(&raw);
                    }
                }
            }
        })
    };

    ready.notified().await;
    session.focus();
    session.insert_image(json!({ "src": "richedit.png", "alt": "richedit" }));

    tokio::time::sleep(Duration::from_millis(args.run_ms)).await;

    match session.get_content_html().await {
        Ok(html) => println!("content: {html}"),
        Err(e) => warn!(error = %e, "could not fetch content"),
    }
    println!("height: {}", session.height());
    println!("display height: {}", session.display_height());
    println!("height changes: {}", height_changes.load(Ordering::SeqCst));

    session.dispose();
    pump.abort();
    surface.abort();
    info!("richedit stopped");
}
