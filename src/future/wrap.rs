//! Adapters from callback-style calls and fallible computations into
//! [`SharedFuture`]s.
//!
//! [`wrap`] and [`flat_wrap`] are the error boundary every completion-mapping
//! operation in this crate is built on: a mapper's `Err` always becomes the
//! failure of the returned future instead of escaping the combinator.

use crate::cause::Cause;
use crate::future::shared::{Promise, SharedFuture};

/// Adapts one callback-style asynchronous call into a [`SharedFuture`].
///
/// `f` receives a fresh [`Promise`] and is expected to hand it to the
/// callback that will eventually resolve it, exactly once. No retry is
/// performed; a callback that never fires leaves the future pending.
///
/// # Examples
///
/// ```
/// use futures_tuple::future::futurize;
///
/// let future = futurize(|promise| {
///     // stands in for handing `promise` to an asynchronous callback
///     promise.complete(1);
/// });
/// assert_eq!(future.result(), Some(1));
/// ```
pub fn futurize<T, F>(f: F) -> SharedFuture<T>
where
    T: Clone + Send + 'static,
    F: FnOnce(Promise<T>),
{
    let promise = Promise::new();
    let future = promise.future();
    f(promise);
    future
}

/// Runs a fallible computation, capturing its error as a failed future.
pub fn wrap<R, F>(f: F) -> SharedFuture<R>
where
    F: FnOnce() -> Result<R, Cause>,
{
    match f() {
        Ok(value) => SharedFuture::ok(value),
        Err(cause) => SharedFuture::err(cause),
    }
}

/// Applies a fallible function to `value`, capturing its error as a failed
/// future.
pub fn wrap_apply<T, R, F>(value: T, f: F) -> SharedFuture<R>
where
    F: FnOnce(T) -> Result<R, Cause>,
{
    wrap(move || f(value))
}

/// Runs a computation that itself returns a future, flattening the result;
/// an `Err` becomes a failed future instead of escaping.
pub fn flat_wrap<R, F>(f: F) -> SharedFuture<R>
where
    F: FnOnce() -> Result<SharedFuture<R>, Cause>,
{
    match f() {
        Ok(future) => future,
        Err(cause) => SharedFuture::err(cause),
    }
}

/// Applies a future-returning function to `value`, flattening the result.
pub fn flat_wrap_apply<T, R, F>(value: T, f: F) -> SharedFuture<R>
where
    F: FnOnce(T) -> Result<SharedFuture<R>, Cause>,
{
    flat_wrap(move || f(value))
}

/// Alias for [`flat_wrap`].
pub fn join_wrap<R, F>(f: F) -> SharedFuture<R>
where
    F: FnOnce() -> Result<SharedFuture<R>, Cause>,
{
    flat_wrap(f)
}

/// Alias for [`flat_wrap_apply`].
pub fn join_wrap_apply<T, R, F>(value: T, f: F) -> SharedFuture<R>
where
    F: FnOnce(T) -> Result<SharedFuture<R>, Cause>,
{
    flat_wrap_apply(value, f)
}
