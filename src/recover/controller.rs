use parking_lot::ReentrantMutex;
use parking_lot::ReentrantMutexGuard;
use parking_lot::RwLock;
use std::any::Any;
use std::cell::RefCell;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use tracing::Level;
use tracing::Span;
use tracing::debug;
use tracing::span;

use crate::config::Config;
use crate::consts::KEY_LOGGER;
use crate::consts::KEY_TRACER;
use crate::consts::KEY_VERBOSE;
use crate::consts::PANIC_TAG;
use crate::consts::TRACE_BEGIN;
use crate::consts::TRACE_END;
use crate::error::Fault;
use crate::inject::Inject;
use crate::inject::Injector;
use crate::logger::Logger;
use crate::logger::TracingLogger;
use crate::recover::ExitCode;
use crate::recover::Protect;
use crate::recover::hook;
use crate::recover::hook::RecoveryScope;
use crate::stack::Stack;
use crate::stack::StackCapture;
use crate::utils::measure_fn;

static CONTROLLER: OnceLock<Arc<Controller>> = OnceLock::new();

/// Action invoked with the captured stack after a fault has been logged.
pub type Callback = Arc<dyn Fn(&Stack) + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// Action
// -----------------------------------------------------------------------------

pub(crate) enum Action<A> {
  /// Invoke the callback stored in the controller, if any.
  Stored,
  /// Invoke the given action; the stored callback is not consulted.
  Given(A),
}

/// Placeholder action type for [`Action::Stored`].
pub(crate) type NoAction = fn(&Stack);

// -----------------------------------------------------------------------------
// Controller State
// -----------------------------------------------------------------------------

struct State {
  offset: usize,
  callback: Option<Callback>,
}

// -----------------------------------------------------------------------------
// Controller
// -----------------------------------------------------------------------------

/// Serializes fault handling and decides whether to resume or terminate.
///
/// A single lock guards the frame offset, the optional callback, and the
/// whole fault handling sequence, so at most one fault is processed at a
/// time. The lock is reentrant: a callback may reconfigure the controller
/// from inside the handler.
///
/// # Fault Handling
///
/// When a protected call faults, the controller:
///
/// 1. coerces the payload into a [`Fault`]
/// 2. logs `PANIC: <fault>` unless the message already carries the tag
/// 3. captures the stack of the faulting thread, skipping `offset` frames
/// 4. logs the begin marker, one line per frame, and the end marker
/// 5. invokes the callback (or the given action) with the stack
/// 6. returns to the caller, or exits the process with [`ExitCode::FAULT`]
pub struct Controller {
  state: ReentrantMutex<RefCell<State>>,
  logger: RwLock<Arc<dyn Logger>>,
  verbose: AtomicBool,
  capture: StackCapture,
}

impl Controller {
  pub(crate) fn new(capture: StackCapture, logger: Arc<dyn Logger>) -> Self {
    hook::install();

    Self {
      state: ReentrantMutex::new(RefCell::new(State {
        offset: 0,
        callback: None,
      })),
      logger: RwLock::new(logger),
      verbose: AtomicBool::new(false),
      capture,
    }
  }

  /// Returns the process-wide controller, creating it on first use.
  ///
  /// This is the same as calling `shared_opts(injector, &Default::default())`.
  #[inline]
  pub fn shared(injector: &Injector) -> Arc<Self> {
    Self::shared_opts(injector, &Config::new())
  }

  /// Returns the process-wide controller, creating it on first use.
  ///
  /// Every call binds the `logger` and `verbose_output` dependencies found
  /// in `injector` and registers the controller under the `tracer` key.
  /// The offset and callback are never reset, and `config` is only used by
  /// the call that creates the controller.
  pub fn shared_opts(injector: &Injector, config: &Config) -> Arc<Self> {
    let this: &Arc<Self> = CONTROLLER.get_or_init(|| {
      let capture: StackCapture = StackCapture::from_config(config);
      let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

      Arc::new(Self::new(capture, logger))
    });

    injector.inject(&**this);
    injector.register(KEY_TRACER, Arc::clone(this));

    Arc::clone(this)
  }

  // ---------------------------------------------------------------------------
  // Configuration
  // ---------------------------------------------------------------------------

  /// Sets the number of leading frames dropped from every captured stack.
  #[inline]
  pub fn set_offset(&self, offset: usize) {
    self.state.lock().borrow_mut().offset = offset;
  }

  /// Returns the number of leading frames dropped from every captured stack.
  #[inline]
  pub fn offset(&self) -> usize {
    self.state.lock().borrow().offset
  }

  /// Replaces the callback invoked after a fault has been logged.
  pub fn set_optional_callback<F>(&self, callback: F)
  where
    F: Fn(&Stack) + Send + Sync + 'static,
  {
    self.state.lock().borrow_mut().callback = Some(Arc::new(callback));
  }

  /// Clears the callback invoked after a fault has been logged.
  #[inline]
  pub fn reset_optional_callback(&self) {
    self.state.lock().borrow_mut().callback = None;
  }

  /// Returns the currently bound logger.
  #[inline]
  pub fn logger(&self) -> Arc<dyn Logger> {
    Arc::clone(&self.logger.read())
  }

  /// Returns `true` if verbose output is enabled.
  #[inline]
  pub fn verbose(&self) -> bool {
    self.verbose.load(Ordering::Relaxed)
  }

  /// Returns the stack capture used for fault traces.
  #[inline]
  pub fn capture(&self) -> &StackCapture {
    &self.capture
  }

  // ---------------------------------------------------------------------------
  // Fault Handling
  // ---------------------------------------------------------------------------

  /// Handles the outcome of a call that may have faulted.
  ///
  /// `Ok` outcomes are returned as-is. A fault is logged, passed to the
  /// stored callback, and then either resumed (`None` is returned) or the
  /// process exits with [`ExitCode::FAULT`].
  ///
  /// The stack is captured where this method is called. Use [`protect`] to
  /// capture the stack at the point of the fault instead.
  ///
  /// [`protect`]: Self::protect
  #[inline]
  pub fn handle_fault<T>(&self, outcome: thread::Result<T>, resume: bool) -> Option<T> {
    match outcome {
      Ok(value) => Some(value),
      Err(payload) => {
        self.recover::<NoAction>(payload, None, resume, Action::Stored);
        None
      }
    }
  }

  /// Handles the outcome of a call that may have faulted.
  ///
  /// The same as [`handle_fault`] except that `action` is invoked instead
  /// of the stored callback.
  ///
  /// [`handle_fault`]: Self::handle_fault
  #[inline]
  pub fn handle_fault_with_action<T, A>(&self, outcome: thread::Result<T>, resume: bool, action: A) -> Option<T>
  where
    A: FnOnce(&Stack),
  {
    match outcome {
      Ok(value) => Some(value),
      Err(payload) => {
        self.recover(payload, None, resume, Action::Given(action));
        None
      }
    }
  }

  /// Runs `body` and handles any fault it raises on the calling thread.
  ///
  /// Returns `Some` with the output of `body` if it completed. Otherwise
  /// the fault is handled as described by [`handle_fault`], with the stack
  /// captured at the point of the fault.
  ///
  /// `body` is treated as unwind safe; state it shares with the caller may
  /// be observed half-updated after a resumed fault.
  ///
  /// # Examples
  ///
  /// ```
  /// use faultline::inject::Injector;
  /// use faultline::recover::Controller;
  ///
  /// let controller = Controller::shared(&Injector::new());
  ///
  /// assert_eq!(controller.protect(true, || 1 + 1), Some(2));
  /// assert_eq!(controller.protect(true, || -> i32 { panic!("boom") }), None);
  /// ```
  ///
  /// [`handle_fault`]: Self::handle_fault
  pub fn protect<F, T>(&self, resume: bool, body: F) -> Option<T>
  where
    F: FnOnce() -> T,
  {
    self.protect_inner::<F, T, NoAction>(resume, body, Action::Stored)
  }

  /// Runs `body` and handles any fault it raises on the calling thread.
  ///
  /// The same as [`protect`] except that `action` is invoked instead of the
  /// stored callback.
  ///
  /// [`protect`]: Self::protect
  pub fn protect_with_action<F, T, A>(&self, resume: bool, action: A, body: F) -> Option<T>
  where
    F: FnOnce() -> T,
    A: FnOnce(&Stack),
  {
    self.protect_inner(resume, body, Action::Given(action))
  }

  /// Wraps `future` so that a fault raised while polling it is handled.
  ///
  /// The fault is handled inside the poll that raised it, on the thread
  /// that polled the future. The wrapper resolves to `None` after a resumed
  /// fault.
  #[inline]
  pub fn protect_async<F>(self: &Arc<Self>, resume: bool, future: F) -> Protect<F>
  where
    F: Future,
  {
    Protect::new(Arc::clone(self), resume, future)
  }

  fn protect_inner<F, T, A>(&self, resume: bool, body: F, action: Action<A>) -> Option<T>
  where
    F: FnOnce() -> T,
    A: FnOnce(&Stack),
  {
    let scope: RecoveryScope = RecoveryScope::enter(Arc::clone(self.capture.source()));
    let outcome: thread::Result<T> = panic::catch_unwind(AssertUnwindSafe(body));
    let raw: Option<String> = scope.take_pending();

    drop(scope);

    match outcome {
      Ok(value) => Some(value),
      Err(payload) => {
        self.recover(payload, raw, resume, action);
        None
      }
    }
  }

  /// Logs the fault and its stack, runs the action, and applies the policy.
  ///
  /// `raw` is the dump recorded at the point of the fault; without it the
  /// stack is captured here.
  pub(crate) fn recover<A>(&self, payload: Box<dyn Any + Send>, raw: Option<String>, resume: bool, action: Action<A>)
  where
    A: FnOnce(&Stack),
  {
    let guard: ReentrantMutexGuard<'_, RefCell<State>> = self.state.lock();
    let fault: Fault = Fault::from_payload(payload);

    let (offset, callback): (usize, Option<Callback>) = {
      let state: _ = guard.borrow();
      (state.offset, state.callback.clone())
    };

    let stack: Stack = self.trace(&fault, raw, offset);

    match action {
      Action::Stored => {
        if let Some(callback) = callback {
          callback(&stack);
        }
      }
      Action::Given(action) => {
        action(&stack);
      }
    }

    if !resume {
      ExitCode::FAULT.exit_process();
    }

    drop(guard);
  }

  fn trace(&self, fault: &Fault, raw: Option<String>, offset: usize) -> Stack {
    let logger: Arc<dyn Logger> = self.logger();
    let recorded: bool = raw.is_some();

    if !fault.is_tagged() {
      logger.printf(format_args!("{PANIC_TAG} {fault}"));
    }

    logger.print(TRACE_BEGIN);

    let (stack, elapsed): (Stack, Duration) = measure_fn(|| match raw {
      Some(raw) => self.capture.structure(&raw, offset),
      None => self.capture.capture(offset),
    });

    for frame in stack.iter() {
      logger.printf(format_args!("{frame}"));
    }

    logger.print(TRACE_END);

    if self.verbose() {
      let span: Span = span!(target: "faultline", Level::DEBUG, "recover");

      debug!(
        target: "faultline",
        parent: &span,
        thread = thread::current().name().unwrap_or("<unnamed>"),
        frames = stack.len(),
        offset = offset,
        recorded = recorded,
        elapsed = ?elapsed,
        "stack captured",
      );
    }

    stack
  }
}

impl Inject for Controller {
  fn inject(&self, injector: &Injector) {
    if let Some(logger) = injector.resolve::<Arc<dyn Logger>>(KEY_LOGGER) {
      *self.logger.write() = logger;
    }

    if let Some(verbose) = injector.resolve::<bool>(KEY_VERBOSE) {
      self.verbose.store(verbose, Ordering::Relaxed);
    }
  }
}

impl Debug for Controller {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Controller")
      .field("offset", &self.offset())
      .field("verbose", &self.verbose())
      .field("capture", &self.capture)
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
