use clap::Parser;

/// Richedit: drive a bridge session against a simulated editing surface.
#[derive(Parser, Debug)]
#[command(name = "richedit", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (an EnvFilter directive, e.g. `richedit=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// HTML pushed into the surface on load; overrides the config.
    #[arg(long)]
    pub content: Option<String>,

    /// How long the session runs before its content is fetched.
    #[arg(long, default_value_t = 1000)]
    pub run_ms: u64,
}

pub fn parse() -> Args {
    Args::parse()
}
