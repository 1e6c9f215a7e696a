use std::any::Any;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::consts::PANIC_TAG;
use crate::consts::UNKNOWN_PAYLOAD;

/// Boxed error type accepted as a fault payload.
pub type DynError = Box<dyn Error + Send + Sync + 'static>;

/// Error value describing the condition that triggered a recovery.
pub struct Fault {
  message: String,
  source: Option<DynError>,
}

impl Fault {
  /// Creates a new fault with the given message.
  #[inline]
  pub fn new<T>(message: T) -> Self
  where
    T: Display,
  {
    Self {
      message: message.to_string(),
      source: None,
    }
  }

  /// Creates a new fault wrapping an existing error.
  ///
  /// The message of the fault is the text of `error`.
  #[inline]
  pub fn from_error(error: DynError) -> Self {
    Self {
      message: error.to_string(),
      source: Some(error),
    }
  }

  /// Coerces a panic payload into a fault.
  ///
  /// Payloads are checked in this order:
  ///
  /// 1. [`Fault`] - returned as-is
  /// 2. [`DynError`] - wrapped, see [`from_error`]
  /// 3. [`String`] or `&'static str` - used as the message
  ///
  /// Anything else yields a fault with a generic message.
  ///
  /// [`from_error`]: Self::from_error
  pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
    let payload: Box<dyn Any + Send> = match payload.downcast::<Self>() {
      Ok(fault) => return *fault,
      Err(payload) => payload,
    };

    let payload: Box<dyn Any + Send> = match payload.downcast::<DynError>() {
      Ok(error) => return Self::from_error(*error),
      Err(payload) => payload,
    };

    if let Some(message) = payload.downcast_ref::<String>() {
      Self::new(message)
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
      Self::new(message)
    } else {
      Self::new(UNKNOWN_PAYLOAD)
    }
  }

  /// Returns the human-readable fault message.
  #[inline]
  pub fn message(&self) -> &str {
    self.message.as_str()
  }

  /// Returns `true` if the message already carries the `PANIC:` tag.
  #[inline]
  pub fn is_tagged(&self) -> bool {
    self.message.starts_with(PANIC_TAG)
  }
}

impl Debug for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(&self.message)
  }
}

impl Error for Fault {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self.source {
      Some(ref error) => Some(&**error),
      None => None,
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::any::Any;
  use std::error::Error;
  use std::fmt;
  use std::panic;

  use crate::error::DynError;
  use crate::error::Fault;

  fn payload<F>(f: F) -> Box<dyn Any + Send>
  where
    F: FnOnce() + panic::UnwindSafe,
  {
    panic::catch_unwind(f).unwrap_err()
  }

  #[derive(Debug)]
  struct Disk;

  impl fmt::Display for Disk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("disk on fire")
    }
  }

  impl Error for Disk {}

  #[test]
  fn test_static_str_payload() {
    let fault: Fault = Fault::from_payload(payload(|| panic!("boom")));

    assert_eq!(fault.message(), "boom");
    assert!(fault.source().is_none());
  }

  #[test]
  fn test_string_payload() {
    let fault: Fault = Fault::from_payload(payload(|| panic!("code {}", 7)));

    assert_eq!(fault.message(), "code 7");
  }

  #[test]
  fn test_fault_payload() {
    let fault: Fault = Fault::from_payload(payload(|| panic::panic_any(Fault::new("inner"))));

    assert_eq!(fault.to_string(), "inner");
  }

  #[test]
  fn test_error_payload() {
    let error: DynError = Box::new(Disk);
    let fault: Fault = Fault::from_payload(Box::new(error));

    assert_eq!(fault.message(), "disk on fire");
    assert_eq!(fault.source().unwrap().to_string(), "disk on fire");
  }

  #[test]
  fn test_opaque_payload() {
    let fault: Fault = Fault::from_payload(payload(|| panic::panic_any(42_u64)));

    assert_eq!(fault.message(), "unknown fault payload");
  }

  #[test]
  fn test_is_tagged() {
    assert!(Fault::new("PANIC: already").is_tagged());
    assert!(!Fault::new("boom").is_tagged());
  }
}
