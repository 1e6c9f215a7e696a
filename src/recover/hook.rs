//! Process-wide panic hook recording the faulting thread's stack.
//!
//! The stack of a panic only exists while the hook runs; by the time
//! `catch_unwind` returns it has been unwound. Protected calls therefore
//! enter a [`RecoveryScope`] on their thread, and the hook stores a raw dump
//! in the innermost scope when a panic is raised inside it.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::panic;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use std::sync::Once;

use crate::stack::StackSource;

type Hook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

struct Scope {
  source: Arc<dyn StackSource>,
  pending: Option<String>,
}

thread_local! {
  static SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

static INSTALL: Once = Once::new();

/// Installs the recording hook, chaining to the previously installed hook.
///
/// Only the first call has any effect.
pub(crate) fn install() {
  INSTALL.call_once(|| {
    let next: Hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
      if !record() {
        next(info);
      }
    }));
  });
}

/// Stores a raw dump in the innermost scope of the calling thread.
///
/// Returns `false` if the thread is not inside a scope.
fn record() -> bool {
  let source: Option<Arc<dyn StackSource>> = SCOPES
    .try_with(|scopes| {
      let scopes: _ = scopes.try_borrow().ok()?;
      scopes.last().map(|scope| Arc::clone(&scope.source))
    })
    .ok()
    .flatten();

  let Some(source) = source else {
    return false;
  };

  let dump: String = source.raw_dump();

  let _ignore: _ = SCOPES.try_with(|scopes| {
    if let Ok(mut scopes) = scopes.try_borrow_mut()
      && let Some(scope) = scopes.last_mut()
    {
      scope.pending = Some(dump);
    }
  });

  true
}

// -----------------------------------------------------------------------------
// Recovery Scope
// -----------------------------------------------------------------------------

/// Marks the calling thread as running a protected call.
///
/// Scopes nest; the scope is left when the guard is dropped.
pub(crate) struct RecoveryScope {
  // Scopes are bound to the thread that entered them.
  _marker: PhantomData<*const ()>,
}

impl RecoveryScope {
  pub(crate) fn enter(source: Arc<dyn StackSource>) -> Self {
    SCOPES.with_borrow_mut(|scopes| {
      scopes.push(Scope {
        source,
        pending: None,
      });
    });

    Self {
      _marker: PhantomData,
    }
  }

  /// Takes the dump recorded by the last panic inside this scope.
  pub(crate) fn take_pending(&self) -> Option<String> {
    SCOPES.with_borrow_mut(|scopes| scopes.last_mut().and_then(|scope| scope.pending.take()))
  }
}

impl Drop for RecoveryScope {
  fn drop(&mut self) {
    let _ignore: _ = SCOPES.try_with(|scopes| {
      if let Ok(mut scopes) = scopes.try_borrow_mut() {
        scopes.pop();
      }
    });
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
