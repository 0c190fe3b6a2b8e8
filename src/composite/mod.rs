//! Aggregation of many futures into one composite future.
//!
//! A [`CompositeFuture`] resolves as a function of its input futures'
//! resolutions, under one of three policies:
//!
//! | Policy   | Succeeds when            | Fails when                          |
//! | ---      | ---                      | ---                                 |
//! | [`all`]  | every input succeeded    | any input fails (fail-fast)         |
//! | [`any`]  | any input succeeds       | every input failed (last cause)     |
//! | [`join`] | every input succeeded    | any input failed, after all settle  |
//!
//! Inputs are type-erased success/failure signals; the typed layer over this
//! module lives in [`crate::tuple`], which retains each slot's value type.
//!
//! [`all`]: CompositeFuture::all
//! [`any`]: CompositeFuture::any
//! [`join`]: CompositeFuture::join

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cause::Cause;
use crate::future::{Outcome, Promise, SharedFuture};

pub use wrapper::CompositeFutureWrapper;

mod wrapper;

/// One future aggregated from many, with per-slot introspection.
///
/// Under the `any` and `all` policies the aggregate may reach a terminal
/// state while some slots are still unresolved; the per-slot accessors then
/// report the not-yet-terminal tri-state (`!succeeded_at && !failed_at`)
/// rather than blocking or panicking.
#[derive(Clone, Debug)]
pub struct CompositeFuture {
    aggregate: SharedFuture<()>,
    slots: Arc<[SharedFuture<()>]>,
}

impl CompositeFuture {
    /// Aggregates with fail-fast semantics.
    ///
    /// Fails as soon as any input fails, with that input's cause; succeeds
    /// once every input has succeeded. An empty input list succeeds at once.
    pub fn all(futures: Vec<SharedFuture<()>>) -> Self {
        let promise = Promise::new();
        let remaining = Arc::new(AtomicUsize::new(futures.len()));
        if futures.is_empty() {
            promise.try_complete(());
        }
        for future in &futures {
            let promise = promise.clone();
            let remaining = Arc::clone(&remaining);
            future.on_complete(move |outcome| match outcome {
                Outcome::Success(_) => {
                    if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                        promise.try_complete(());
                    }
                }
                Outcome::Failure(cause) => {
                    promise.try_fail(cause);
                }
            });
        }
        Self {
            aggregate: promise.future(),
            slots: futures.into(),
        }
    }

    /// Aggregates with succeed-fast semantics.
    ///
    /// Succeeds as soon as any input succeeds; fails only once every input
    /// has failed, with the cause of the failure observed last. An empty
    /// input list succeeds at once.
    pub fn any(futures: Vec<SharedFuture<()>>) -> Self {
        let promise = Promise::new();
        let failures_left = Arc::new(AtomicUsize::new(futures.len()));
        if futures.is_empty() {
            promise.try_complete(());
        }
        for future in &futures {
            let promise = promise.clone();
            let failures_left = Arc::clone(&failures_left);
            future.on_complete(move |outcome| match outcome {
                Outcome::Success(_) => {
                    promise.try_complete(());
                }
                Outcome::Failure(cause) => {
                    if failures_left.fetch_sub(1, Ordering::SeqCst) == 1 {
                        promise.try_fail(cause);
                    }
                }
            });
        }
        Self {
            aggregate: promise.future(),
            slots: futures.into(),
        }
    }

    /// Aggregates by waiting for every input regardless of outcome.
    ///
    /// Resolves only once every input is terminal; succeeds if all
    /// succeeded, otherwise fails with the first failure observed. An empty
    /// input list succeeds at once.
    pub fn join(futures: Vec<SharedFuture<()>>) -> Self {
        let promise = Promise::new();
        let remaining = Arc::new(AtomicUsize::new(futures.len()));
        let first_failure = Arc::new(Mutex::new(None::<Cause>));
        if futures.is_empty() {
            promise.try_complete(());
        }
        for future in &futures {
            let promise = promise.clone();
            let remaining = Arc::clone(&remaining);
            let first_failure = Arc::clone(&first_failure);
            future.on_complete(move |outcome| {
                if let Outcome::Failure(cause) = outcome {
                    first_failure.lock().unwrap().get_or_insert(cause);
                }
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    match first_failure.lock().unwrap().take() {
                        Some(cause) => promise.try_fail(cause),
                        None => promise.try_complete(()),
                    };
                }
            });
        }
        Self {
            aggregate: promise.future(),
            slots: futures.into(),
        }
    }

    /// The number of aggregated slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// The aggregate signal itself.
    pub fn aggregate(&self) -> &SharedFuture<()> {
        &self.aggregate
    }

    /// Returns `true` once the aggregate has resolved, either way.
    pub fn is_complete(&self) -> bool {
        self.aggregate.is_complete()
    }

    /// Returns `true` once the aggregate has resolved successfully.
    pub fn succeeded(&self) -> bool {
        self.aggregate.succeeded()
    }

    /// Returns `true` once the aggregate has resolved with a failure.
    pub fn failed(&self) -> bool {
        self.aggregate.failed()
    }

    /// The aggregate failure cause, once failed.
    pub fn cause(&self) -> Option<Cause> {
        self.aggregate.cause()
    }

    /// Registers `f` to run with the aggregate resolution.
    pub fn on_complete<F>(&self, f: F)
    where
        F: FnOnce(Outcome<()>) + Send + 'static,
    {
        self.aggregate.on_complete(f);
    }

    /// Returns `true` once slot `index` has resolved, either way.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn is_complete_at(&self, index: usize) -> bool {
        self.slots[index].is_complete()
    }

    /// Returns `true` once slot `index` has resolved successfully.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn succeeded_at(&self, index: usize) -> bool {
        self.slots[index].succeeded()
    }

    /// Returns `true` once slot `index` has resolved with a failure.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn failed_at(&self, index: usize) -> bool {
        self.slots[index].failed()
    }

    /// The failure cause of slot `index`, once failed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn cause_at(&self, index: usize) -> Option<Cause> {
        self.slots[index].cause()
    }
}
