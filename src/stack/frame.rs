use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::slice::Iter;
use std::vec::IntoIter;

use crate::consts::CAP_STACK_FRAMES;

// -----------------------------------------------------------------------------
// Frame
// -----------------------------------------------------------------------------

/// A single entry of a captured call stack.
///
/// # Display Format
///
/// Frames format as: `{package}/{file} - {method} [{line}]`
///
/// Example: `faultline/recover/controller - Controller.recover [212]`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Frame {
  line_number: u32,
  #[cfg_attr(feature = "serde", serde(rename = "className"))]
  package_name: String,
  file_name: String,
  method_name: String,
}

impl Frame {
  /// Creates a new `Frame`.
  #[inline]
  pub fn new<P, F, M>(package_name: P, file_name: F, method_name: M, line_number: u32) -> Self
  where
    P: Into<String>,
    F: Into<String>,
    M: Into<String>,
  {
    Self {
      line_number,
      package_name: package_name.into(),
      file_name: file_name.into(),
      method_name: method_name.into(),
    }
  }

  /// Returns the source line of the call site, or `0` if unknown.
  #[inline]
  pub const fn line_number(&self) -> u32 {
    self.line_number
  }

  /// Returns the fully-qualified package path of the function.
  #[inline]
  pub fn package_name(&self) -> &str {
    self.package_name.as_str()
  }

  /// Returns the base name of the source file.
  #[inline]
  pub fn file_name(&self) -> &str {
    self.file_name.as_str()
  }

  /// Returns the function name, including any receiver-type qualifier.
  #[inline]
  pub fn method_name(&self) -> &str {
    self.method_name.as_str()
  }
}

impl Display for Frame {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(
      f,
      "{}/{} - {} [{}]",
      self.package_name, self.file_name, self.method_name, self.line_number,
    )
  }
}

// -----------------------------------------------------------------------------
// Stack
// -----------------------------------------------------------------------------

/// An ordered sequence of [`Frame`]s, most-recent call first.
///
/// Frames are only ever appended; the order produced by the capture is
/// preserved by every operation on the stack.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Stack {
  frames: Vec<Frame>,
}

impl Stack {
  /// Creates a new, empty stack.
  #[inline]
  pub const fn new() -> Self {
    Self { frames: Vec::new() }
  }

  #[inline]
  pub(crate) fn with_default_capacity() -> Self {
    Self {
      frames: Vec::with_capacity(CAP_STACK_FRAMES),
    }
  }

  #[inline]
  pub(crate) fn push(&mut self, frame: Frame) {
    self.frames.push(frame);
  }

  /// Returns the number of frames in the stack.
  #[inline]
  pub fn len(&self) -> usize {
    self.frames.len()
  }

  /// Returns `true` if the stack contains no frames.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.frames.is_empty()
  }

  /// Returns the frames as a slice.
  #[inline]
  pub fn frames(&self) -> &[Frame] {
    self.frames.as_slice()
  }

  /// Returns an iterator over the frames.
  #[inline]
  pub fn iter(&self) -> Iter<'_, Frame> {
    self.frames.iter()
  }

  /// Drops the first `offset` frames and returns the remainder.
  ///
  /// Returns an empty stack if `offset` exceeds the number of frames.
  pub fn offset(mut self, offset: usize) -> Self {
    let count: usize = offset.min(self.frames.len());
    self.frames.drain(..count);
    self
  }
}

impl FromIterator<Frame> for Stack {
  fn from_iter<T>(iter: T) -> Self
  where
    T: IntoIterator<Item = Frame>,
  {
    Self {
      frames: iter.into_iter().collect(),
    }
  }
}

impl IntoIterator for Stack {
  type Item = Frame;
  type IntoIter = IntoIter<Frame>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.frames.into_iter()
  }
}

impl<'a> IntoIterator for &'a Stack {
  type Item = &'a Frame;
  type IntoIter = Iter<'a, Frame>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.frames.iter()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
