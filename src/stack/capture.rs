use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::stack::Stack;
use crate::stack::StackParser;
use crate::stack::StackSource;
use crate::stack::TextParser;
use crate::stack::ThreadDump;

/// Captures the calling thread's stack as a structured [`Stack`].
///
/// Combines a [`StackSource`] providing the raw dump with the
/// [`StackParser`] that understands its format. Either half can be swapped
/// without affecting the other.
#[derive(Clone)]
pub struct StackCapture {
  source: Arc<dyn StackSource>,
  parser: Arc<dyn StackParser>,
}

impl StackCapture {
  /// Creates a new `StackCapture` from the given source and parser.
  #[inline]
  pub fn new<S, P>(source: S, parser: P) -> Self
  where
    S: StackSource + 'static,
    P: StackParser + 'static,
  {
    Self {
      source: Arc::new(source),
      parser: Arc::new(parser),
    }
  }

  /// Creates a new `StackCapture` for the host platform.
  #[inline]
  pub fn from_config(config: &Config) -> Self {
    Self::new(ThreadDump::with_capacity(config.dump_capacity), TextParser::new())
  }

  /// Returns the source of raw dumps.
  #[inline]
  pub fn source(&self) -> &Arc<dyn StackSource> {
    &self.source
  }

  /// Returns a raw dump of the calling thread's stack.
  #[inline]
  pub fn raw_dump(&self) -> String {
    self.source.raw_dump()
  }

  /// Captures the calling thread's stack, skipping the first `offset` frames.
  ///
  /// Returns an empty stack if `offset` exceeds the number of frames.
  #[inline]
  pub fn capture(&self, offset: usize) -> Stack {
    self.structure(&self.source.raw_dump(), offset)
  }

  /// Parses a previously taken raw dump, skipping the first `offset` frames.
  #[inline]
  pub fn structure(&self, raw: &str, offset: usize) -> Stack {
    self.parser.parse(raw).offset(offset)
  }
}

impl Default for StackCapture {
  #[inline]
  fn default() -> Self {
    Self::from_config(&Config::new())
  }
}

impl Debug for StackCapture {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("StackCapture").finish_non_exhaustive()
  }
}

/// Captures the calling thread's stack with the host platform defaults.
///
/// # Examples
///
/// ```
/// let stack = faultline::stack::capture_stack(0);
///
/// assert!(!stack.is_empty());
/// ```
#[inline]
pub fn capture_stack(offset: usize) -> Stack {
  StackCapture::default().capture(offset)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::stack::Stack;
  use crate::stack::StackCapture;
  use crate::stack::StackSource;
  use crate::stack::TextParser;
  use crate::stack::capture_stack;

  struct Fixed;

  impl StackSource for Fixed {
    fn raw_dump(&self) -> String {
      let mut dump: String = String::from("thread 'fixed' [running]:\n");

      for index in 0..6 {
        dump.push_str(&format!("app/mod{index}.f{index}\n\t/src/mod{index}.rs:{index} +0x0\n"));
      }

      dump
    }
  }

  #[test]
  fn test_capture_offsets() {
    let capture: StackCapture = StackCapture::new(Fixed, TextParser::new());
    let full: Stack = capture.capture(0);

    assert_eq!(full.len(), 6);

    for offset in 0..=full.len() {
      let tail: Stack = capture.capture(offset);

      assert_eq!(tail.len(), full.len() - offset);
      assert_eq!(tail.frames(), &full.frames()[offset..]);
    }

    assert!(capture.capture(7).is_empty());
    assert!(capture.capture(1 << 20).is_empty());
  }

  #[test]
  fn test_structure_matches_capture() {
    let capture: StackCapture = StackCapture::new(Fixed, TextParser::new());

    assert_eq!(capture.structure(&capture.raw_dump(), 2), capture.capture(2));
  }

  #[test]
  fn test_capture_current() {
    assert!(!capture_stack(0).is_empty());
  }
}
