//! Logging and tracing initialization.
//!
//! Logs always go to stderr: the CLI prints plans and manifests as JSON on
//! stdout, and the two streams must not interleave.

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// Returns `false` if a global subscriber was already installed (for
/// example by a test harness); the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        let subscriber = builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    }
}

/// Logging config for a CLI invocation: `--verbose` forces debug output for
/// the reelcap crates, otherwise the configured level is used.
pub fn logging_for_verbosity(base: &LoggingConfig, verbose: bool) -> LoggingConfig {
    if verbose {
        LoggingConfig {
            level: "reelcap=debug,info".to_string(),
            json: base.json,
        }
    } else {
        base.clone()
    }
}
