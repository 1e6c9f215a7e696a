//! Controlled recovery from panics.
//!
//! The [`Controller`] catches a panic on the thread that raised it, logs the
//! fault together with the structured stack of the faulting thread, invokes
//! an optional callback, and then either resumes the caller or terminates
//! the process with [`ExitCode::FAULT`].
//!
//! # Examples
//!
//! ```
//! use faultline::inject::Injector;
//! use faultline::recover::Controller;
//! use faultline::stack::Stack;
//!
//! let injector = Injector::new();
//! let controller = Controller::shared(&injector);
//!
//! controller.set_optional_callback(|stack: &Stack| {
//!   for frame in stack {
//!     eprintln!("OPTIONAL => {frame}");
//!   }
//! });
//!
//! let output: Option<u32> = controller.protect(true, || panic!("boom"));
//!
//! assert!(output.is_none());
//! ```
//!
//! # Protected Calls
//!
//! The stack of a panic is only available while the panic is raised. The
//! [`protect`] family of methods enters a recovery scope on the calling
//! thread before running the body, so the process-wide panic hook can
//! record the stack at the point of the fault. Panics raised outside of any
//! scope are passed on to the previously installed panic hook.
//!
//! Installing another panic hook with [`std::panic::set_hook`] after the
//! first controller is created disables this recording; the stack is then
//! captured where the fault is handled.
//!
//! [`protect`]: Controller::protect

mod controller;
mod exit;
mod hook;
mod protect;

pub use self::controller::Callback;
pub use self::controller::Controller;
pub use self::exit::ExitCode;
pub use self::protect::Protect;
