use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::sync::{Arc, Mutex};

use futures_core::future::FusedFuture;
use smallvec::SmallVec;

use crate::cause::Cause;

/// The terminal resolution of a [`SharedFuture`].
///
/// A success carries an `Option` so that an *empty success*, a future that
/// resolved without a meaningful value, stays distinct from failure.
#[derive(Clone, Debug)]
pub enum Outcome<T> {
    /// Resolved successfully; `None` is an empty success.
    Success(Option<T>),
    /// Resolved with a failure cause.
    Failure(Cause),
}

impl<T> Outcome<T> {
    /// A non-empty success.
    pub fn success(value: T) -> Self {
        Outcome::Success(Some(value))
    }

    /// An empty success.
    pub fn empty() -> Self {
        Outcome::Success(None)
    }

    /// A failure.
    pub fn failure(cause: impl Into<Cause>) -> Self {
        Outcome::Failure(cause.into())
    }

    /// Returns `true` for either success form.
    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` for a failure.
    pub fn failed(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Borrows the success value, if any.
    pub fn result(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => value.as_ref(),
            Outcome::Failure(_) => None,
        }
    }

    /// Borrows the failure cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(cause) => Some(cause),
        }
    }

    /// Converts into the `Result` form used when `await`ing.
    pub fn into_result(self) -> Result<Option<T>, Cause> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(cause) => Err(cause),
        }
    }
}

type Callback<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

struct Inner<T> {
    outcome: Option<Outcome<T>>,
    callbacks: SmallVec<[Callback<T>; 1]>,
    wakers: SmallVec<[Waker; 1]>,
}

impl<T> Inner<T> {
    fn unresolved() -> Self {
        Self {
            outcome: None,
            callbacks: SmallVec::new(),
            wakers: SmallVec::new(),
        }
    }

    fn resolved(outcome: Outcome<T>) -> Self {
        Self {
            outcome: Some(outcome),
            callbacks: SmallVec::new(),
            wakers: SmallVec::new(),
        }
    }
}

/// A shared, write-once asynchronous result cell.
///
/// Cloning yields another handle onto the same cell: every holder observes
/// the same single resolution, and any number of observers may register
/// completion callbacks without coordination. The writable counterpart is
/// [`Promise`].
///
/// `SharedFuture` also implements [`Future`], resolving to
/// `Result<Option<T>, Cause>`, so it can be `.await`ed under any executor.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SharedFuture<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for SharedFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SharedFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedFuture").field(&self.state_name()).finish()
    }
}

impl<T> SharedFuture<T> {
    /// A future already resolved with a non-empty success.
    pub fn ok(value: T) -> Self {
        Self::from_outcome(Outcome::success(value))
    }

    /// A future already resolved with an empty success.
    pub fn empty() -> Self {
        Self::from_outcome(Outcome::empty())
    }

    /// A future already resolved with a failure.
    pub fn err(cause: impl Into<Cause>) -> Self {
        Self::from_outcome(Outcome::failure(cause))
    }

    /// A future already resolved with the given outcome.
    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::resolved(outcome))),
        }
    }

    /// Returns `true` if `self` and `other` are handles onto the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` once the future has resolved, either way.
    pub fn is_complete(&self) -> bool {
        self.inner.lock().unwrap().outcome.is_some()
    }

    /// Returns `true` once the future has resolved successfully.
    pub fn succeeded(&self) -> bool {
        matches!(self.inner.lock().unwrap().outcome, Some(Outcome::Success(_)))
    }

    /// Returns `true` once the future has resolved with a failure.
    pub fn failed(&self) -> bool {
        matches!(self.inner.lock().unwrap().outcome, Some(Outcome::Failure(_)))
    }

    /// Returns the failure cause, once failed.
    pub fn cause(&self) -> Option<Cause> {
        match &self.inner.lock().unwrap().outcome {
            Some(Outcome::Failure(cause)) => Some(cause.clone()),
            _ => None,
        }
    }

    fn state_name(&self) -> &'static str {
        match &self.inner.lock().unwrap().outcome {
            None => "pending",
            Some(Outcome::Success(Some(_))) => "succeeded",
            Some(Outcome::Success(None)) => "succeeded(empty)",
            Some(Outcome::Failure(_)) => "failed",
        }
    }
}

impl<T: Clone + Send + 'static> SharedFuture<T> {
    /// Returns the success value, once resolved non-empty.
    ///
    /// Pending, failed, and empty-success futures all read as `None`; use
    /// [`succeeded`][Self::succeeded] and [`failed`][Self::failed] to tell
    /// them apart.
    pub fn result(&self) -> Option<T> {
        match &self.inner.lock().unwrap().outcome {
            Some(Outcome::Success(value)) => value.clone(),
            _ => None,
        }
    }

    /// Returns a clone of the resolution, once resolved.
    pub fn outcome(&self) -> Option<Outcome<T>> {
        self.inner.lock().unwrap().outcome.clone()
    }

    /// Registers `f` to run with the resolution.
    ///
    /// Runs immediately if the future is already resolved, otherwise
    /// synchronously on the resolving thread. Callbacks are invoked outside
    /// the cell's lock, so `f` may freely introspect this future or register
    /// further callbacks on it.
    pub fn on_complete<F>(&self, f: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let outcome = {
            let mut inner = self.inner.lock().unwrap();
            match &inner.outcome {
                Some(outcome) => outcome.clone(),
                None => {
                    inner.callbacks.push(Box::new(f));
                    return;
                }
            }
        };
        f(outcome);
    }

    /// Derives a new future by mapping the resolution.
    pub(crate) fn derive<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        self.on_complete(move |outcome| promise.resolve(f(outcome)));
        future
    }

    /// Derives a new future by mapping the resolution to another future and
    /// flattening it.
    pub(crate) fn derive_flat<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> SharedFuture<U> + Send + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        self.on_complete(move |outcome| {
            f(outcome).on_complete(move |inner| promise.resolve(inner));
        });
        future
    }

    /// Maps the success value; failures pass through unchanged.
    pub fn map<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Option<T>) -> Option<U> + Send + 'static,
    {
        self.derive(|outcome| match outcome {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(cause) => Outcome::Failure(cause),
        })
    }

    /// Maps the success value with a fallible mapper; an `Err` becomes the
    /// failure of the derived future.
    pub fn try_map<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Option<T>) -> Result<Option<U>, Cause> + Send + 'static,
    {
        self.derive(|outcome| match outcome {
            Outcome::Success(value) => match f(value) {
                Ok(mapped) => Outcome::Success(mapped),
                Err(cause) => Outcome::Failure(cause),
            },
            Outcome::Failure(cause) => Outcome::Failure(cause),
        })
    }

    /// Maps the success value to another future and flattens it; failures
    /// pass through unchanged.
    pub fn flat_map<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Option<T>) -> SharedFuture<U> + Send + 'static,
    {
        self.derive_flat(|outcome| match outcome {
            Outcome::Success(value) => f(value),
            Outcome::Failure(cause) => SharedFuture::err(cause),
        })
    }

    /// Replaces a failure with a success carrying `value`.
    pub fn otherwise(&self, value: T) -> SharedFuture<T> {
        self.otherwise_with(move |_| value)
    }

    /// Replaces a failure with a success computed from the cause.
    pub fn otherwise_with<F>(&self, f: F) -> SharedFuture<T>
    where
        F: FnOnce(Cause) -> T + Send + 'static,
    {
        self.derive(|outcome| match outcome {
            Outcome::Failure(cause) => Outcome::success(f(cause)),
            success => success,
        })
    }

    /// Replaces a failure with an empty success.
    pub fn otherwise_empty(&self) -> SharedFuture<T> {
        self.derive(|outcome| match outcome {
            Outcome::Failure(_) => Outcome::empty(),
            success => success,
        })
    }

    /// Discards the success value, resolving empty; failures pass through.
    pub fn map_empty(&self) -> SharedFuture<T> {
        self.derive(|outcome| match outcome {
            Outcome::Success(_) => Outcome::empty(),
            failure => failure,
        })
    }

    /// Erases the value type, keeping only the success/failure signal.
    ///
    /// Empty and non-empty successes both signal success. This is the form
    /// the [`CompositeFuture`][crate::CompositeFuture] aggregation policies
    /// consume.
    pub fn signal(&self) -> SharedFuture<()> {
        self.derive(|outcome| match outcome {
            Outcome::Success(_) => Outcome::success(()),
            Outcome::Failure(cause) => Outcome::Failure(cause),
        })
    }
}

impl<T: Clone> Future for SharedFuture<T> {
    type Output = Result<Option<T>, Cause>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(outcome) = &inner.outcome {
            return Poll::Ready(outcome.clone().into_result());
        }
        let waker = cx.waker();
        if !inner.wakers.iter().any(|stored| stored.will_wake(waker)) {
            inner.wakers.push(waker.clone());
        }
        Poll::Pending
    }
}

impl<T: Clone> FusedFuture for SharedFuture<T> {
    fn is_terminated(&self) -> bool {
        self.is_complete()
    }
}

/// The writable counterpart of a [`SharedFuture`].
///
/// A promise resolves its future exactly once; the panicking completers
/// enforce this, the `try_` forms report it. Cloning yields another handle
/// onto the same future. Dropping every promise handle without resolving
/// leaves the future pending forever.
pub struct Promise<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.inner.lock().unwrap().outcome.is_some();
        f.debug_tuple("Promise").field(&resolved).finish()
    }
}

impl<T> Promise<T> {
    /// An unresolved promise.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::unresolved())),
        }
    }

    /// The future resolved by this promise.
    pub fn future(&self) -> SharedFuture<T> {
        SharedFuture {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Resolves the future with a non-empty success.
    ///
    /// # Panics
    ///
    /// Panics if the future is already resolved.
    pub fn complete(&self, value: T) {
        let resolved = self.try_complete(value);
        assert!(resolved, "promise must not be resolved twice");
    }

    /// Resolves the future with an empty success.
    ///
    /// # Panics
    ///
    /// Panics if the future is already resolved.
    pub fn complete_empty(&self) {
        let resolved = self.try_complete_empty();
        assert!(resolved, "promise must not be resolved twice");
    }

    /// Resolves the future with a failure.
    ///
    /// # Panics
    ///
    /// Panics if the future is already resolved.
    pub fn fail(&self, cause: impl Into<Cause>) {
        let resolved = self.try_fail(cause);
        assert!(resolved, "promise must not be resolved twice");
    }

    /// Resolves the future with the given outcome.
    ///
    /// # Panics
    ///
    /// Panics if the future is already resolved.
    pub fn resolve(&self, outcome: Outcome<T>) {
        let resolved = self.try_resolve(outcome);
        assert!(resolved, "promise must not be resolved twice");
    }

    /// Like [`complete`][Self::complete], returning `false` when the future
    /// was already resolved.
    pub fn try_complete(&self, value: T) -> bool {
        self.try_resolve(Outcome::success(value))
    }

    /// Like [`complete_empty`][Self::complete_empty], returning `false` when
    /// the future was already resolved.
    pub fn try_complete_empty(&self) -> bool {
        self.try_resolve(Outcome::empty())
    }

    /// Like [`fail`][Self::fail], returning `false` when the future was
    /// already resolved.
    pub fn try_fail(&self, cause: impl Into<Cause>) -> bool {
        self.try_resolve(Outcome::failure(cause))
    }

    /// Like [`resolve`][Self::resolve], returning `false` when the future
    /// was already resolved.
    pub fn try_resolve(&self, outcome: Outcome<T>) -> bool {
        let (callbacks, wakers) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.outcome.is_some() {
                return false;
            }
            inner.outcome = Some(outcome.clone());
            (
                std::mem::take(&mut inner.callbacks),
                std::mem::take(&mut inner.wakers),
            )
        };
        // Dispatch happens outside the lock: a callback may re-inspect the
        // future or register further callbacks without deadlocking.
        for callback in callbacks {
            callback(outcome.clone());
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_pending() {
        let promise = Promise::<i32>::new();
        let future = promise.future();
        assert!(!future.is_complete());
        assert!(!future.succeeded());
        assert!(!future.failed());
        assert_eq!(future.result(), None);
        assert!(future.cause().is_none());
    }

    #[test]
    fn complete_resolves_every_handle() {
        let promise = Promise::new();
        let future = promise.future();
        let other = future.clone();
        promise.complete(7);
        assert!(future.succeeded());
        assert_eq!(other.result(), Some(7));
        assert!(future.ptr_eq(&other));
    }

    #[test]
    fn empty_success_is_not_failure() {
        let promise = Promise::<String>::new();
        let future = promise.future();
        promise.complete_empty();
        assert!(future.succeeded());
        assert!(!future.failed());
        assert_eq!(future.result(), None);
    }

    #[test]
    fn fail_exposes_cause() {
        let future = SharedFuture::<i32>::err("error");
        assert!(future.failed());
        assert_eq!(future.cause().unwrap().to_string(), "error");
    }

    #[test]
    fn try_complete_reports_double_resolution() {
        let promise = Promise::new();
        assert!(promise.try_complete(1));
        assert!(!promise.try_complete(2));
        assert_eq!(promise.future().result(), Some(1));
    }

    #[test]
    #[should_panic(expected = "resolved twice")]
    fn complete_twice_panics() {
        let promise = Promise::new();
        promise.complete(1);
        promise.complete(2);
    }

    #[test]
    fn on_complete_runs_immediately_when_resolved() {
        let count = Arc::new(AtomicUsize::new(0));
        let future = SharedFuture::ok(3);
        let observed = Arc::clone(&count);
        future.on_complete(move |outcome| {
            assert_eq!(outcome.result(), Some(&3));
            observed.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn on_complete_runs_once_on_resolution() {
        let count = Arc::new(AtomicUsize::new(0));
        let promise: Promise<i32> = Promise::new();
        let observed = Arc::clone(&count);
        promise.future().on_complete(move |outcome| {
            assert!(outcome.failed());
            observed.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        promise.fail("late");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_reenter_the_cell() {
        let promise = Promise::new();
        let future = promise.future();
        let seen = Arc::new(AtomicUsize::new(0));
        let reentrant = future.clone();
        let observed = Arc::clone(&seen);
        future.on_complete(move |_| {
            // Introspecting the same cell from inside its own callback.
            assert_eq!(reentrant.result(), Some(5));
            let inner = Arc::clone(&observed);
            reentrant.on_complete(move |_| {
                inner.fetch_add(1, Ordering::SeqCst);
            });
        });
        promise.complete(5);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn map_and_otherwise() {
        let doubled = SharedFuture::ok(2).map(|v| v.map(|n| n * 2));
        assert_eq!(doubled.result(), Some(4));

        let recovered = SharedFuture::<i32>::err("error").otherwise(9);
        assert_eq!(recovered.result(), Some(9));

        let empty = SharedFuture::<i32>::err("error").otherwise_empty();
        assert!(empty.succeeded());
        assert_eq!(empty.result(), None);

        let erased = SharedFuture::ok(2).map_empty();
        assert!(erased.succeeded());
        assert_eq!(erased.result(), None);
    }

    #[test]
    fn flat_map_flattens() {
        let future = SharedFuture::ok(2).flat_map(|v| match v {
            Some(n) => SharedFuture::ok(n + 1),
            None => SharedFuture::empty(),
        });
        assert_eq!(future.result(), Some(3));

        let failed = SharedFuture::<i32>::ok(2).flat_map(|_| SharedFuture::<i32>::err("inner"));
        assert_eq!(failed.cause().unwrap().to_string(), "inner");
    }

    #[test]
    fn await_resolved_future() {
        futures_lite::future::block_on(async {
            let future = SharedFuture::ok("hello");
            assert_eq!(future.await.unwrap(), Some("hello"));
        });
    }

    #[test]
    fn await_wakes_on_late_resolution() {
        let promise = Promise::new();
        let future = promise.future();
        let resolver = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            promise.complete(11);
        });
        let value = futures_lite::future::block_on(async { future.await });
        resolver.join().unwrap();
        assert_eq!(value.unwrap(), Some(11));
    }
}
