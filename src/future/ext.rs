//! Empty-value and failure substitution combinators.
//!
//! An empty success, a future that resolved without a value, is a condition
//! of its own, distinct from failure. The combinators here substitute,
//! reject, or skip over it:
//!
//! | Operation       | on failure        | on empty success | on value        |
//! | ---             | ---               | ---              | ---             |
//! | `default_with`  | propagates        | default          | passes through  |
//! | `fallback_with` | fallback          | fallback         | passes through  |
//! | `non_empty`     | propagates        | fails            | passes through  |
//! | `map_some`      | propagates        | stays empty      | mapped          |

use crate::cause::{Cause, EmptyValueError};
use crate::future::shared::{Outcome, SharedFuture};

impl<T: Clone + Send + 'static> SharedFuture<T> {
    /// Replaces an empty success with `value`.
    ///
    /// Failures and non-empty successes pass through unchanged.
    pub fn default_with(&self, value: T) -> SharedFuture<T> {
        self.map(move |current| current.or(Some(value)))
    }

    /// Replaces an empty success with a lazily supplied value.
    ///
    /// The supplier runs only on the empty path.
    pub fn default_with_else<F>(&self, supplier: F) -> SharedFuture<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.map(move |current| current.or_else(|| Some(supplier())))
    }

    /// Replaces an empty success with a lazily supplied future.
    pub fn flat_default_with<F>(&self, supplier: F) -> SharedFuture<T>
    where
        F: FnOnce() -> SharedFuture<T> + Send + 'static,
    {
        self.flat_map(move |current| match current {
            Some(value) => SharedFuture::ok(value),
            None => supplier(),
        })
    }

    /// Replaces a failure or an empty success with `value`.
    ///
    /// The derived future never fails and never resolves empty.
    pub fn fallback_with(&self, value: T) -> SharedFuture<T> {
        self.fallback_with_else(move |_| value)
    }

    /// Replaces a failure or an empty success with a computed value.
    ///
    /// On the failure path `f` receives `Some(cause)`, on the empty path
    /// `None`; it does not run when a value is present.
    pub fn fallback_with_else<F>(&self, f: F) -> SharedFuture<T>
    where
        F: FnOnce(Option<Cause>) -> T + Send + 'static,
    {
        self.derive(|outcome| match outcome {
            Outcome::Failure(cause) => Outcome::success(f(Some(cause))),
            Outcome::Success(None) => Outcome::success(f(None)),
            value => value,
        })
    }

    /// Replaces a failure via `mapper` and an empty success via `supplier`.
    ///
    /// The two handlers are mutually exclusive per resolution: at most one
    /// of them runs, and only on its own path.
    pub fn fallback_with_handlers<M, S>(&self, mapper: M, supplier: S) -> SharedFuture<T>
    where
        M: FnOnce(Cause) -> T + Send + 'static,
        S: FnOnce() -> T + Send + 'static,
    {
        self.derive(|outcome| match outcome {
            Outcome::Failure(cause) => Outcome::success(mapper(cause)),
            Outcome::Success(None) => Outcome::success(supplier()),
            value => value,
        })
    }

    /// Replaces a failure or an empty success with a computed future.
    pub fn flat_fallback_with_else<F>(&self, f: F) -> SharedFuture<T>
    where
        F: FnOnce(Option<Cause>) -> SharedFuture<T> + Send + 'static,
    {
        self.derive_flat(|outcome| match outcome {
            Outcome::Failure(cause) => f(Some(cause)),
            Outcome::Success(None) => f(None),
            value => SharedFuture::from_outcome(value),
        })
    }

    /// Replaces a failure via `mapper` and an empty success via `supplier`,
    /// both returning futures that are flattened into the result.
    pub fn flat_fallback_with_handlers<M, S>(&self, mapper: M, supplier: S) -> SharedFuture<T>
    where
        M: FnOnce(Cause) -> SharedFuture<T> + Send + 'static,
        S: FnOnce() -> SharedFuture<T> + Send + 'static,
    {
        self.derive_flat(|outcome| match outcome {
            Outcome::Failure(cause) => mapper(cause),
            Outcome::Success(None) => supplier(),
            value => SharedFuture::from_outcome(value),
        })
    }

    /// Rejects an empty success, failing with [`EmptyValueError`].
    ///
    /// Non-empty successes and failures pass through unchanged.
    pub fn non_empty(&self) -> SharedFuture<T> {
        self.derive(|outcome| match outcome {
            Outcome::Success(None) => Outcome::Failure(Cause::new(EmptyValueError)),
            other => other,
        })
    }

    /// Maps only a non-empty success value.
    ///
    /// An empty success short-circuits to an empty success without invoking
    /// `f`; failures propagate unchanged.
    pub fn map_some<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.map(move |current| current.map(f))
    }

    /// Maps only a non-empty success value with a fallible mapper.
    ///
    /// An `Err` from `f` becomes the failure of the derived future.
    pub fn try_map_some<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, Cause> + Send + 'static,
    {
        self.try_map(move |current| match current {
            Some(value) => f(value).map(Some),
            None => Ok(None),
        })
    }

    /// Maps only a non-empty success value to another future, flattened.
    ///
    /// An empty success short-circuits to an empty success of the target
    /// type without invoking `f`; failures propagate unchanged.
    pub fn flat_map_some<U, F>(&self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> SharedFuture<U> + Send + 'static,
    {
        self.flat_map(move |current| match current {
            Some(value) => f(value),
            None => SharedFuture::empty(),
        })
    }
}
