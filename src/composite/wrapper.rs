use crate::cause::Cause;
use crate::composite::CompositeFuture;
use crate::future::{Promise, SharedFuture};

/// Completion-mapping operations over a bare [`CompositeFuture`].
///
/// This is the arity-independent core of the composite tuples in
/// [`crate::tuple`]: the "runs on any terminal state" mapping family,
/// without the typed per-slot access that requires a retained tuple. The
/// tuple types expose it through
/// [`wrapper()`][crate::tuple::CompositeFutureTuple2::wrapper].
#[derive(Clone, Debug)]
pub struct CompositeFutureWrapper {
    composite: CompositeFuture,
}

impl CompositeFutureWrapper {
    /// Wraps an aggregated future.
    pub fn of(composite: CompositeFuture) -> Self {
        Self { composite }
    }

    /// The wrapped composite future.
    pub fn raw(&self) -> &CompositeFuture {
        &self.composite
    }

    /// Runs side-effect code with the wrapped composite future.
    pub fn inspect<F>(&self, f: F)
    where
        F: FnOnce(&CompositeFuture),
    {
        f(&self.composite);
    }

    /// Alias for [`through`][Self::through].
    pub fn map_anyway<R, F>(&self, f: F) -> SharedFuture<R>
    where
        R: Clone + Send + 'static,
        F: FnOnce(&CompositeFuture) -> Result<R, Cause> + Send + 'static,
    {
        self.through(f)
    }

    /// Maps the composite future once it is terminal, succeeded or failed.
    ///
    /// `f` receives the composite (already terminal, per-slot state
    /// readable); `Ok` becomes the success of the returned future, `Err`
    /// its failure.
    pub fn through<R, F>(&self, f: F) -> SharedFuture<R>
    where
        R: Clone + Send + 'static,
        F: FnOnce(&CompositeFuture) -> Result<R, Cause> + Send + 'static,
    {
        let composite = self.composite.clone();
        let promise = Promise::new();
        let future = promise.future();
        self.composite.on_complete(move |_| match f(&composite) {
            Ok(value) => promise.complete(value),
            Err(cause) => promise.fail(cause),
        });
        future
    }

    /// Alias for [`join_through`][Self::join_through].
    pub fn flat_map_anyway<R, F>(&self, f: F) -> SharedFuture<R>
    where
        R: Clone + Send + 'static,
        F: FnOnce(&CompositeFuture) -> Result<SharedFuture<R>, Cause> + Send + 'static,
    {
        self.join_through(f)
    }

    /// Maps the composite future once it is terminal and flattens the
    /// future `f` returns.
    ///
    /// An `Err` from `f` fails the returned future instead of escaping.
    pub fn join_through<R, F>(&self, f: F) -> SharedFuture<R>
    where
        R: Clone + Send + 'static,
        F: FnOnce(&CompositeFuture) -> Result<SharedFuture<R>, Cause> + Send + 'static,
    {
        let composite = self.composite.clone();
        let promise = Promise::new();
        let future = promise.future();
        self.composite.on_complete(move |_| match f(&composite) {
            Ok(inner) => inner.on_complete(move |outcome| promise.resolve(outcome)),
            Err(cause) => promise.fail(cause),
        });
        future
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::future::futurize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn join2(a: &SharedFuture<f64>, b: &SharedFuture<i32>) -> CompositeFuture {
        CompositeFuture::join(vec![a.signal(), b.signal()])
    }

    #[test]
    fn raw_returns_the_wrapped_composite() {
        let composite = CompositeFuture::join(Vec::new());
        let wrapper = CompositeFutureWrapper::of(composite.clone());
        assert!(wrapper.raw().aggregate().ptr_eq(composite.aggregate()));
    }

    #[test]
    fn inspect_sees_per_slot_state() {
        let promise = Promise::<f64>::new();
        let failed = SharedFuture::<i32>::err("error");
        let wrapper = CompositeFutureWrapper::of(join2(&promise.future(), &failed));

        let statuses = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&statuses);
        wrapper.inspect(|composite| {
            let handle = composite.clone();
            composite.on_complete(move |outcome| {
                assert!(outcome.failed());
                let succeeded = (0..handle.size())
                    .filter(|&i| handle.succeeded_at(i))
                    .count();
                observed.store(succeeded + 1, Ordering::SeqCst);
            });
        });

        promise.complete(1.0);
        assert_eq!(statuses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn through_runs_on_failure_too() {
        let promise = Promise::<f64>::new();
        let failed = SharedFuture::<i32>::err("error");
        let wrapper = CompositeFutureWrapper::of(join2(&promise.future(), &failed));

        let counted = wrapper.through(|composite| {
            Ok((0..composite.size())
                .filter(|&i| composite.succeeded_at(i))
                .count())
        });
        assert!(!counted.is_complete());

        promise.complete(1.0);
        assert_eq!(counted.result(), Some(1));
    }

    #[test]
    fn through_captures_mapper_errors() {
        let wrapper = CompositeFutureWrapper::of(CompositeFuture::all(Vec::new()));
        let failed: SharedFuture<i32> = wrapper.through(|_| Err(Cause::msg("mapper")));
        assert!(failed.failed());
        assert_eq!(failed.cause().unwrap().to_string(), "mapper");
    }

    #[test]
    fn join_through_flattens() {
        let promise = Promise::<f64>::new();
        let done = SharedFuture::ok(2);
        let wrapper = CompositeFutureWrapper::of(join2(&promise.future(), &done));

        let summed = wrapper.join_through(|composite| {
            let terminal = (0..composite.size())
                .filter(|&i| composite.is_complete_at(i))
                .count();
            Ok(futurize(move |inner| inner.complete(terminal)))
        });

        promise.fail("error");
        assert_eq!(summed.result(), Some(2));

        let refused: SharedFuture<i32> =
            wrapper.flat_map_anyway(|_| Err(Cause::msg("no future")));
        assert_eq!(refused.cause().unwrap().to_string(), "no future");
    }
}
