use tracing::info;

use crate::logger::Logger;

/// Logger that emits every line as a `tracing` event.
///
/// Lines are recorded at the `INFO` level under the `faultline` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
  /// Creates a new `TracingLogger`.
  #[inline]
  pub const fn new() -> Self {
    Self
  }
}

impl Logger for TracingLogger {
  #[inline]
  fn print(&self, line: &str) {
    info!(target: "faultline", "{line}");
  }
}
