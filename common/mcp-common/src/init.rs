//! Logging setup shared by every server binary

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log directive for a crate at the given verbosity
///
/// `0` is `info`, `1` is `debug`, anything above is `trace`.
pub fn default_directive(crate_name: &str, verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("{}={}", crate_name, level)
}

/// Whether `LOG_FORMAT` asks for JSON output
fn json_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("json"))
}

/// Install the global tracing subscriber
///
/// Logs go to stderr since stdout carries the stdio transport. `RUST_LOG`
/// filters as usual, on top of a default directive for each of
/// `crate_names` derived from `verbosity`. Text output has ANSI colors off;
/// `LOG_FORMAT=json` selects one JSON object per event instead.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing(&["my_mcp", "mcp_common"], cli.verbose)?;
/// ```
pub fn init_tracing(crate_names: &[&str], verbosity: u8) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for crate_name in crate_names {
        filter = filter.add_directive(default_directive(crate_name, verbosity).parse()?);
    }

    let format = std::env::var("LOG_FORMAT").ok();
    let registry = tracing_subscriber::registry().with(filter);

    if json_requested(format.as_deref()) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
