//! Process-level initialization.

use crate::config::Config;
use crate::error::Fault;

/// Installs the global tracing subscriber configured by `config`.
///
/// Trace lines written by [`TracingLogger`] are printed by this subscriber.
/// Returns an error if a global subscriber has already been set.
///
/// [`TracingLogger`]: crate::logger::TracingLogger
#[cfg(feature = "tracing")]
pub fn tracing_subscriber(config: &Config) -> Result<(), Fault> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(config.tracing_ansi)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(Fault::new)
}

#[cfg(not(feature = "tracing"))]
pub fn tracing_subscriber(_config: &Config) -> Result<(), Fault> {
  Ok(())
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
