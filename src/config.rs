use crate::consts;

// -----------------------------------------------------------------------------
// Config
// -----------------------------------------------------------------------------

/// Options used to configure stack capture and trace output.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Config {
  // ---------------------------------------------------------------------------
  // Stack Capture Configuration
  // ---------------------------------------------------------------------------
  /// Maximum size (in bytes) of a raw stack dump.
  pub dump_capacity: usize,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  pub tracing_ansi: bool,
  pub tracing_source_file: bool,
  pub tracing_source_line: bool,
  pub tracing_source_name: bool,
  pub tracing_thread_info: bool,
  pub tracing_verbose: bool,
  pub tracing_very_verbose: bool,
}

impl Config {
  #[inline]
  pub const fn new() -> Self {
    Self {
      dump_capacity: consts::DEFAULT_DUMP_CAPACITY,
      tracing_ansi: true,
      tracing_source_file: false,
      tracing_source_line: false,
      tracing_source_name: true,
      tracing_thread_info: true,
      tracing_verbose: false,
      tracing_very_verbose: false,
    }
  }

  /// Returns the maximum level emitted by the tracing subscriber.
  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }
}

impl Default for Config {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
