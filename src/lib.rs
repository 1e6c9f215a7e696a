//! Faultline - structured stack traces and controlled recovery for panics.
//!
//! Faultline captures the call stack of a thread at the moment it panics,
//! turns it into an ordered list of typed frames, and hands the fault to a
//! recovery controller that logs the trace, optionally invokes a callback,
//! and then resumes the caller or terminates the process with a fixed exit
//! status.
//!
//! # Quick Start
//!
//! ```no_run
//! use faultline::inject::Injector;
//! use faultline::recover::Controller;
//!
//! let injector = Injector::new();
//! injector.register("verbose_output", true);
//!
//! let controller = Controller::shared(&injector);
//!
//! // Log the trace and keep running.
//! controller.protect(true, || panic!("recoverable"));
//!
//! // Log the trace and exit with status 254.
//! controller.protect(false, || panic!("fatal"));
//! ```
//!
//! # Core Modules
//!
//! - [`stack`]: Frames, stack dumps, and the dump parser
//! - [`recover`]: The recovery controller and protected calls
//! - [`error`]: Fault payload coercion
//! - [`inject`]: Dependency registry
//! - [`logger`]: Logging sinks
//! - [`init`]: Tracing subscriber set-up
//! - [`consts`]: Defaults, markers, and registry keys

mod utils;

pub mod config;
pub mod consts;
pub mod error;
pub mod init;
pub mod inject;
pub mod logger;
pub mod recover;
pub mod stack;
