use core::fmt;

use crate::cause::Cause;
use crate::composite::{CompositeFuture, CompositeFutureWrapper};
use crate::future::{Outcome, Promise, SharedFuture};
use crate::tuple::{
    FutureTuple2, FutureTuple3, FutureTuple4, FutureTuple5, FutureTuple6, FutureTuple7,
    FutureTuple8, FutureTuple9,
};

macro_rules! impl_composite_future_tuple {
    ($StructName:ident $TupleName:ident $LEN:literal $(($T:ident, $v:ident, $idx:tt))+) => {
        /// Pairs an aggregated [`CompositeFuture`] with the future tuple it
        /// was built from.
        ///
        /// Reacting to the aggregate's completion goes through the mapping
        /// families below; each slot's original, type-correct future (and so
        /// its value or failure) stays reachable through
        /// [`tuple`][Self::tuple]. Slot `i` of the aggregate corresponds to
        /// element `i` of the tuple.
        pub struct $StructName<$($T),+> {
            composite: CompositeFuture,
            tuple: $TupleName<$($T),+>,
        }

        impl<$($T),+> Clone for $StructName<$($T),+> {
            fn clone(&self) -> Self {
                Self {
                    composite: self.composite.clone(),
                    tuple: self.tuple.clone(),
                }
            }
        }

        impl<$($T),+> fmt::Debug for $StructName<$($T),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($StructName))
                    .field(&self.composite)
                    .field(&self.tuple)
                    .finish()
            }
        }

        impl<$($T: Clone + Send + 'static),+> $StructName<$($T),+> {
            /// Pairs a tuple with the aggregate built from it.
            ///
            /// # Panics
            ///
            /// Panics if the aggregate's slot count differs from the tuple
            /// arity.
            pub fn of(tuple: $TupleName<$($T),+>, composite: CompositeFuture) -> Self {
                assert!(
                    composite.size() == $LEN,
                    "composite arity {} does not match tuple arity {}",
                    composite.size(),
                    $LEN,
                );
                Self { composite, tuple }
            }

            /// The original future tuple.
            pub fn tuple(&self) -> &$TupleName<$($T),+> {
                &self.tuple
            }

            /// The aggregated composite future.
            pub fn raw(&self) -> &CompositeFuture {
                &self.composite
            }

            /// The arity-independent wrapper over the same aggregate.
            pub fn wrapper(&self) -> CompositeFutureWrapper {
                CompositeFutureWrapper::of(self.composite.clone())
            }

            /// Runs side-effect code with the aggregate and the original
            /// slot futures.
            pub fn inspect<F>(&self, f: F)
            where
                F: FnOnce(&CompositeFuture, $(&SharedFuture<$T>),+),
            {
                f(&self.composite, $(&self.tuple.$idx),+);
            }

            /// Applies `f` to the aggregate and the original slot futures,
            /// returning its value directly.
            pub fn with<R, F>(&self, f: F) -> R
            where
                F: FnOnce(&CompositeFuture, $(&SharedFuture<$T>),+) -> R,
            {
                f(&self.composite, $(&self.tuple.$idx),+)
            }

            /// Alias for [`through`][Self::through].
            pub fn map_anyway<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(&SharedFuture<$T>),+) -> Result<R, Cause> + Send + 'static,
            {
                self.through(f)
            }

            /// Maps the original slot futures once the aggregate is
            /// terminal, succeeded or failed.
            ///
            /// `Ok` becomes the success of the returned future, `Err` its
            /// failure. Under the `any` and `all` policies some slots may
            /// still be unresolved when `f` runs.
            pub fn through<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(&SharedFuture<$T>),+) -> Result<R, Cause> + Send + 'static,
            {
                let tuple = self.tuple.clone();
                let promise = Promise::new();
                let future = promise.future();
                self.composite.on_complete(move |_| match f($(&tuple.$idx),+) {
                    Ok(value) => promise.complete(value),
                    Err(cause) => promise.fail(cause),
                });
                future
            }

            /// Alias for [`join_through`][Self::join_through].
            pub fn flat_map_anyway<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(&SharedFuture<$T>),+) -> Result<SharedFuture<R>, Cause> + Send + 'static,
            {
                self.join_through(f)
            }

            /// Maps the original slot futures once the aggregate is terminal
            /// and flattens the future `f` returns.
            ///
            /// An `Err` from `f` fails the returned future instead of
            /// escaping the combinator.
            pub fn join_through<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(&SharedFuture<$T>),+) -> Result<SharedFuture<R>, Cause> + Send + 'static,
            {
                let tuple = self.tuple.clone();
                let promise = Promise::new();
                let future = promise.future();
                self.composite.on_complete(move |_| match f($(&tuple.$idx),+) {
                    Ok(inner) => inner.on_complete(move |outcome| promise.resolve(outcome)),
                    Err(cause) => promise.fail(cause),
                });
                future
            }

            /// Alias for [`applift`][Self::applift].
            pub fn map_typed<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(Option<$T>),+) -> Result<R, Cause> + Send + 'static,
            {
                self.applift(f)
            }

            /// Lifts `f` over the slot values, applying it only if the
            /// aggregate succeeded.
            ///
            /// `f` receives each slot's success value. A slot that resolved
            /// empty, or that a succeed-fast aggregate left unresolved,
            /// reads as `None`. If the aggregate failed, its failure
            /// propagates and `f` is never invoked.
            pub fn applift<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(Option<$T>),+) -> Result<R, Cause> + Send + 'static,
            {
                let tuple = self.tuple.clone();
                let promise = Promise::new();
                let future = promise.future();
                self.composite.on_complete(move |outcome| match outcome {
                    Outcome::Success(_) => match f($(tuple.$idx.result()),+) {
                        Ok(value) => promise.complete(value),
                        Err(cause) => promise.fail(cause),
                    },
                    Outcome::Failure(cause) => promise.fail(cause),
                });
                future
            }

            /// Alias for [`join_applift`][Self::join_applift].
            pub fn flat_map_typed<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(Option<$T>),+) -> Result<SharedFuture<R>, Cause> + Send + 'static,
            {
                self.join_applift(f)
            }

            /// Lifts a future-returning `f` over the slot values, applying
            /// it only if the aggregate succeeded, and flattens the result.
            pub fn join_applift<R, F>(&self, f: F) -> SharedFuture<R>
            where
                R: Clone + Send + 'static,
                F: FnOnce($(Option<$T>),+) -> Result<SharedFuture<R>, Cause> + Send + 'static,
            {
                let tuple = self.tuple.clone();
                let promise = Promise::new();
                let future = promise.future();
                self.composite.on_complete(move |outcome| match outcome {
                    Outcome::Success(_) => match f($(tuple.$idx.result()),+) {
                        Ok(inner) => inner.on_complete(move |inner_outcome| promise.resolve(inner_outcome)),
                        Err(cause) => promise.fail(cause),
                    },
                    Outcome::Failure(cause) => promise.fail(cause),
                });
                future
            }
        }
    };
}

impl_composite_future_tuple! { CompositeFutureTuple2 FutureTuple2 2 (T0, v0, 0) (T1, v1, 1) }
impl_composite_future_tuple! { CompositeFutureTuple3 FutureTuple3 3 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) }
impl_composite_future_tuple! { CompositeFutureTuple4 FutureTuple4 4 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) }
impl_composite_future_tuple! { CompositeFutureTuple5 FutureTuple5 5 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) }
impl_composite_future_tuple! { CompositeFutureTuple6 FutureTuple6 6 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) }
impl_composite_future_tuple! { CompositeFutureTuple7 FutureTuple7 7 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) }
impl_composite_future_tuple! { CompositeFutureTuple8 FutureTuple8 8 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) (T7, v7, 7) }
impl_composite_future_tuple! { CompositeFutureTuple9 FutureTuple9 9 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) (T7, v7, 7) (T8, v8, 8) }
