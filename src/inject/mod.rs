//! Dependency registry.
//!
//! An [`Injector`] maps well-known keys to type-erased values. Components
//! implementing [`Inject`] pull the dependencies they need out of it.
//!
//! # Examples
//!
//! ```
//! use faultline::inject::Injector;
//!
//! let injector = Injector::new();
//!
//! injector.register("verbose_output", true);
//!
//! assert_eq!(injector.resolve::<bool>("verbose_output"), Some(true));
//! assert_eq!(injector.resolve::<u32>("verbose_output"), None);
//! ```

mod injector;

pub use self::injector::Inject;
pub use self::injector::Injector;
