//! Logging sinks for trace output.
//!
//! The recovery controller writes every trace line through a [`Logger`].
//! [`TracingLogger`] forwards lines to [`tracing`], [`BufferLogger`] keeps
//! them in memory.

mod buffer;
mod sink;

pub use self::buffer::BufferLogger;
pub use self::sink::TracingLogger;

use std::fmt::Arguments;
use std::panic;

use crate::consts::PANIC_TAG;

/// Sink for informational lines.
pub trait Logger: Send + Sync {
  /// Writes a single line.
  fn print(&self, line: &str);

  /// Writes a single formatted line.
  #[inline]
  fn printf(&self, args: Arguments<'_>) {
    match args.as_str() {
      Some(line) => self.print(line),
      None => self.print(&args.to_string()),
    }
  }

  /// Writes a `PANIC:` line and raises a fault with the same text.
  fn panic(&self, message: &str) -> ! {
    let message: String = format!("{PANIC_TAG} {message}");
    self.print(&message);
    panic::panic_any(message)
  }

  /// Writes a formatted `PANIC:` line and raises a fault with the same text.
  #[inline]
  fn panicf(&self, args: Arguments<'_>) -> ! {
    self.panic(&args.to_string())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
