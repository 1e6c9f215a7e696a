//! Fault payloads and their coercion into error values.
//!
//! A panic may carry any payload. Before a fault is logged the payload is
//! turned into a [`Fault`], which always has a printable message and, when
//! the payload was already an error, keeps it as the [`source`].
//!
//! Coercion never panics: payloads without any text become a fault with a
//! generic message.
//!
//! # Examples
//!
//! ```
//! use faultline::error::Fault;
//! use std::panic;
//!
//! let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
//! let fault = Fault::from_payload(payload);
//!
//! assert_eq!(fault.message(), "boom");
//! ```
//!
//! [`source`]: std::error::Error::source

mod fault;

pub use self::fault::DynError;
pub use self::fault::Fault;
