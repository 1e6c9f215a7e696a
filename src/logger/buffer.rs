use parking_lot::Mutex;

use crate::logger::Logger;

/// Logger that keeps every line in memory.
#[derive(Debug, Default)]
pub struct BufferLogger {
  lines: Mutex<Vec<String>>,
}

impl BufferLogger {
  /// Creates a new, empty `BufferLogger`.
  #[inline]
  pub const fn new() -> Self {
    Self {
      lines: Mutex::new(Vec::new()),
    }
  }

  /// Returns a copy of every line written so far.
  #[inline]
  pub fn lines(&self) -> Vec<String> {
    self.lines.lock().clone()
  }

  /// Removes every line written so far.
  #[inline]
  pub fn clear(&self) {
    self.lines.lock().clear();
  }
}

impl Logger for BufferLogger {
  #[inline]
  fn print(&self, line: &str) {
    self.lines.lock().push(line.to_owned());
  }
}
