//! Structured call stacks.
//!
//! A stack is captured in two steps: a [`StackSource`] takes a raw text dump
//! of the calling thread and a [`StackParser`] turns that text into an
//! ordered [`Stack`] of [`Frame`]s. [`StackCapture`] ties both together and
//! applies the frame offset.
//!
//! Parsing never fails. A malformed line yields empty or zero fields for
//! the affected frame, since capturing a trace while handling a fault must
//! not raise a second fault.

mod capture;
mod dump;
mod frame;
mod parser;

pub use self::capture::StackCapture;
pub use self::capture::capture_stack;
pub use self::dump::StackSource;
pub use self::dump::ThreadDump;
pub use self::frame::Frame;
pub use self::frame::Stack;
pub use self::parser::StackParser;
pub use self::parser::TextParser;
