//! Utility functions used throughout the crate.

mod measure;

pub(crate) use self::measure::measure_fn;
