// -----------------------------------------------------------------------------
// Exit Codes
// -----------------------------------------------------------------------------

/// Status returned to the parent when a non-resumable fault is handled.
pub const E_CODE_FAULT: u8 = 254;

// -----------------------------------------------------------------------------
// Stack Capture
// -----------------------------------------------------------------------------

/// Maximum number of bytes in a raw stack dump.
pub const DEFAULT_DUMP_CAPACITY: usize = 1 << 16;

/// Function name used when a frame has no resolvable symbol.
pub const UNKNOWN_FUNCTION: &str = "?";

/// File name used when a frame has no resolvable source location.
pub const UNKNOWN_FILE: &str = "??";

// -----------------------------------------------------------------------------
// Trace Output
// -----------------------------------------------------------------------------

/// Tag prefixed to the fault description in the trace header.
pub const PANIC_TAG: &str = "PANIC:";

/// First line of every logged stack trace.
pub const TRACE_BEGIN: &str = "----------------------[ Stack trace begin ]-----------------------";

/// Last line of every logged stack trace.
pub const TRACE_END: &str = "-----------------------[ Stack trace end ]------------------------";

/// Message used for fault payloads that carry no text.
pub const UNKNOWN_PAYLOAD: &str = "unknown fault payload";

// -----------------------------------------------------------------------------
// Registry Keys
// -----------------------------------------------------------------------------

/// Key under which the shared controller registers itself.
pub const KEY_TRACER: &str = "tracer";

/// Key of the [`Logger`] dependency.
///
/// [`Logger`]: crate::logger::Logger
pub const KEY_LOGGER: &str = "logger";

/// Key of the verbose output flag.
pub const KEY_VERBOSE: &str = "verbose_output";

// -----------------------------------------------------------------------------
// Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated entries in an injector.
pub const CAP_INJECTOR_ENTRIES: usize = 8;

/// Number of pre-allocated frames in a parsed stack.
pub const CAP_STACK_FRAMES: usize = 32;
