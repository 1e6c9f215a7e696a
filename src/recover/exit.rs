use std::process;

use crate::consts::E_CODE_FAULT;

/// This type represents the status code the current process returns to its
/// parent when fault handling terminates it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct ExitCode(u8);

impl ExitCode {
  /// The `ExitCode` used after a non-resumable fault.
  pub const FAULT: ExitCode = ExitCode(E_CODE_FAULT);

  /// Exit the current process with the given `ExitCode`.
  ///
  /// No destructors of the calling thread run after this point.
  #[inline]
  pub fn exit_process(self) -> ! {
    process::exit(self.to_i32())
  }

  #[inline]
  pub const fn to_i32(self) -> i32 {
    self.0 as i32
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::recover::ExitCode;

  #[test]
  fn test_fault_code() {
    assert_eq!(ExitCode::FAULT.to_i32(), 254);
  }
}
