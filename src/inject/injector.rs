use hashbrown::HashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::sync::Arc;

use crate::consts::CAP_INJECTOR_ENTRIES;

type Entry = Arc<dyn Any + Send + Sync>;

/// A component whose dependencies are bound from an [`Injector`].
pub trait Inject {
  /// Binds every dependency available in `injector`.
  ///
  /// Dependencies missing from `injector` keep their current binding.
  fn inject(&self, injector: &Injector);
}

/// Type-erased registry of shared values.
pub struct Injector {
  entries: RwLock<HashMap<String, Entry>>,
}

impl Injector {
  /// Creates a new, empty injector.
  #[inline]
  pub fn new() -> Self {
    Self {
      entries: RwLock::new(HashMap::with_capacity(CAP_INJECTOR_ENTRIES)),
    }
  }

  /// Registers `value` under `key`, replacing any previous value.
  pub fn register<T>(&self, key: &str, value: T)
  where
    T: Any + Send + Sync,
  {
    self.entries.write().insert(key.to_owned(), Arc::new(value));
  }

  /// Returns a clone of the value registered under `key`.
  ///
  /// Returns `None` if the key is missing or holds a value of another type.
  pub fn resolve<T>(&self, key: &str) -> Option<T>
  where
    T: Any + Clone,
  {
    let entry: Entry = self.entries.read().get(key).cloned()?;
    entry.downcast_ref::<T>().cloned()
  }

  /// Returns `true` if a value is registered under `key`.
  #[inline]
  pub fn contains(&self, key: &str) -> bool {
    self.entries.read().contains_key(key)
  }

  /// Binds the dependencies of `target` from this injector.
  #[inline]
  pub fn inject<T>(&self, target: &T)
  where
    T: Inject + ?Sized,
  {
    target.inject(self);
  }
}

impl Default for Injector {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for Injector {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_set().entries(self.entries.read().keys()).finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
