// Adapted from:
//
// https://docs.rs/futures/0.3.31/futures/future/struct.CatchUnwind.html

use pin_project_lite::pin_project;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use crate::recover::Controller;
use crate::recover::controller::Action;
use crate::recover::controller::NoAction;
use crate::recover::hook::RecoveryScope;

pin_project! {
  /// Future returned by [`Controller::protect_async`].
  #[must_use = "futures do nothing unless you `.await` or poll them"]
  pub struct Protect<F> {
    controller: Arc<Controller>,
    resume: bool,
    #[pin]
    future: F,
  }
}

impl<F> Protect<F>
where
  F: Future,
{
  #[inline]
  pub(crate) const fn new(controller: Arc<Controller>, resume: bool, future: F) -> Self {
    Self {
      controller,
      resume,
      future,
    }
  }
}

impl<F> Future for Protect<F>
where
  F: Future,
{
  type Output = Option<F::Output>;

  fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
    let this: _ = self.project();
    let future: Pin<&mut F> = this.future;

    let scope: RecoveryScope = RecoveryScope::enter(Arc::clone(this.controller.capture().source()));
    let assert: AssertUnwindSafe<_> = AssertUnwindSafe(|| future.poll(context));
    let outcome: _ = panic::catch_unwind(assert);
    let raw: Option<String> = scope.take_pending();

    drop(scope);

    match outcome {
      Ok(Poll::Ready(output)) => Poll::Ready(Some(output)),
      Ok(Poll::Pending) => Poll::Pending,
      Err(payload) => {
        this
          .controller
          .recover::<NoAction>(payload, raw, *this.resume, Action::Stored);

        Poll::Ready(None)
      }
    }
  }
}
