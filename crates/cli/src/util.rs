use nu_ansi_term::{AnsiString, Style};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so the final summary on stdout stays clean. Falls back to
/// `info` when `RUST_LOG` is unset or invalid.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn bold(msg: impl Into<String>) -> AnsiString<'static> {
    Style::new().bold().paint(msg.into())
}
