//! Typed tuples of futures, arity 2 through 9.
//!
//! A future tuple is an immutable, ordered collection of independently-typed
//! [`SharedFuture`]s. It offers slot-wise forms of the substitution
//! combinators (`otherwise`, `defaults`, `fallback`, ...) and three
//! aggregation entry points (`all`, `any`, `join`) that pair the tuple with
//! a [`CompositeFuture`] while keeping every slot's value type.
//!
//! Build one with `of` or by converting a native tuple:
//!
//! ```
//! use futures_tuple::prelude::*;
//! use futures_tuple::SharedFuture;
//!
//! let tuple = (SharedFuture::ok(1u8), SharedFuture::ok("hi")).into_future_tuple();
//! let sum = tuple
//!     .all()
//!     .applift(|n, s| Ok(u32::from(n.unwrap()) + s.unwrap().len() as u32));
//! assert_eq!(sum.result(), Some(3));
//! ```

use core::fmt;
use std::sync::{Arc, Mutex};

use crate::cause::Cause;
use crate::composite::CompositeFuture;
use crate::future::SharedFuture;

pub use composite::{
    CompositeFutureTuple2, CompositeFutureTuple3, CompositeFutureTuple4, CompositeFutureTuple5,
    CompositeFutureTuple6, CompositeFutureTuple7, CompositeFutureTuple8, CompositeFutureTuple9,
};

mod composite;

/// Conversion from a native tuple of [`SharedFuture`]s into a future tuple.
///
/// Implemented for tuples of arity 2 through 9.
pub trait IntoFutureTuple {
    /// The future-tuple type this converts into.
    type Tuple;

    /// Converts a native tuple of shared futures into a future tuple.
    fn into_future_tuple(self) -> Self::Tuple;
}

macro_rules! impl_future_tuple {
    ($StructName:ident $CompositeName:ident $(($T:ident, $v:ident, $idx:tt))+) => {
        /// An immutable, ordered tuple of independently-typed
        /// [`SharedFuture`]s.
        ///
        /// Every transformation derives new futures slot-wise and returns a
        /// new tuple; the original slots are never mutated. The slot futures
        /// are reachable through the public positional fields.
        pub struct $StructName<$($T),+>($(
            #[doc = "A slot future, in declaration order."]
            pub SharedFuture<$T>
        ),+);

        impl<$($T),+> Clone for $StructName<$($T),+> {
            fn clone(&self) -> Self {
                Self($(self.$idx.clone()),+)
            }
        }

        impl<$($T),+> fmt::Debug for $StructName<$($T),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($StructName))
                    $(.field(&self.$idx))+
                    .finish()
            }
        }

        impl<$($T: Clone + Send + 'static),+> $StructName<$($T),+> {
            /// Builds a tuple from its slot futures, in order.
            pub fn of($($v: SharedFuture<$T>),+) -> Self {
                Self($($v),+)
            }

            /// Discards every slot's success value, resolving each empty.
            pub fn map_empty(&self) -> Self {
                Self($(self.$idx.map_empty()),+)
            }

            /// Replaces each slot's failure with the corresponding value.
            ///
            /// Successes pass through unchanged, empty successes stay empty.
            pub fn otherwise(&self, $($v: $T),+) -> Self {
                Self($(self.$idx.otherwise($v)),+)
            }

            /// Like [`otherwise`][Self::otherwise], additionally running
            /// `on_failure` with each substituted cause.
            pub fn otherwise_inspect<F>(&self, on_failure: F, $($v: $T),+) -> Self
            where
                F: FnMut(&Cause) + Send + 'static,
            {
                let on_failure = Arc::new(Mutex::new(on_failure));
                Self($({
                    let on_failure = Arc::clone(&on_failure);
                    self.$idx.otherwise_with(move |cause| {
                        (*on_failure.lock().unwrap())(&cause);
                        $v
                    })
                }),+)
            }

            /// Replaces each slot's failure with an empty success.
            pub fn otherwise_empty(&self) -> Self {
                Self($(self.$idx.otherwise_empty()),+)
            }

            /// Replaces each slot's empty success with the corresponding
            /// default value.
            pub fn defaults(&self, $($v: $T),+) -> Self {
                Self($(self.$idx.default_with($v)),+)
            }

            /// Like [`defaults`][Self::defaults], additionally running
            /// `on_empty` once per slot actually defaulted.
            pub fn defaults_inspect<F>(&self, on_empty: F, $($v: $T),+) -> Self
            where
                F: FnMut() + Send + 'static,
            {
                let on_empty = Arc::new(Mutex::new(on_empty));
                Self($({
                    let on_empty = Arc::clone(&on_empty);
                    self.$idx.default_with_else(move || {
                        (*on_empty.lock().unwrap())();
                        $v
                    })
                }),+)
            }

            /// Replaces each slot's failure or empty success with the
            /// corresponding fallback value.
            ///
            /// The derived slots never fail and never resolve empty.
            pub fn fallback(&self, $($v: $T),+) -> Self {
                Self($(self.$idx.fallback_with($v)),+)
            }

            /// Like [`fallback`][Self::fallback], additionally running
            /// `on_failure` on each failed slot and `on_empty` on each empty
            /// slot. The two are mutually exclusive per slot resolution.
            pub fn fallback_inspect<F, G>(&self, on_failure: F, on_empty: G, $($v: $T),+) -> Self
            where
                F: FnMut(&Cause) + Send + 'static,
                G: FnMut() + Send + 'static,
            {
                let on_failure = Arc::new(Mutex::new(on_failure));
                let on_empty = Arc::new(Mutex::new(on_empty));
                Self($({
                    let on_failure = Arc::clone(&on_failure);
                    let on_empty = Arc::clone(&on_empty);
                    let fallback = $v.clone();
                    self.$idx.fallback_with_handlers(
                        move |cause| {
                            (*on_failure.lock().unwrap())(&cause);
                            fallback
                        },
                        move || {
                            (*on_empty.lock().unwrap())();
                            $v
                        },
                    )
                }),+)
            }

            /// Aggregates the slots with fail-fast
            /// [`all`][CompositeFuture::all] semantics.
            pub fn all(&self) -> $CompositeName<$($T),+> {
                $CompositeName::of(self.clone(), CompositeFuture::all(self.signals()))
            }

            /// Aggregates the slots with succeed-fast
            /// [`any`][CompositeFuture::any] semantics.
            pub fn any(&self) -> $CompositeName<$($T),+> {
                $CompositeName::of(self.clone(), CompositeFuture::any(self.signals()))
            }

            /// Aggregates the slots, waiting for every one regardless of
            /// outcome ([`join`][CompositeFuture::join] semantics).
            pub fn join(&self) -> $CompositeName<$($T),+> {
                $CompositeName::of(self.clone(), CompositeFuture::join(self.signals()))
            }

            /// Aggregates the slots with a caller-supplied policy.
            ///
            /// The aggregate `f` builds must cover exactly these slots, in
            /// order; the pairing constructor asserts the arity.
            pub fn compose<F>(&self, f: F) -> $CompositeName<$($T),+>
            where
                F: FnOnce($(SharedFuture<$T>),+) -> CompositeFuture,
            {
                $CompositeName::of(self.clone(), f($(self.$idx.clone()),+))
            }

            fn signals(&self) -> Vec<SharedFuture<()>> {
                vec![$(self.$idx.signal()),+]
            }
        }

        impl<$($T: Clone + Send + 'static),+> IntoFutureTuple for ($(SharedFuture<$T>,)+) {
            type Tuple = $StructName<$($T),+>;

            fn into_future_tuple(self) -> Self::Tuple {
                let ($($v,)+) = self;
                $StructName::of($($v),+)
            }
        }
    };
}

impl_future_tuple! { FutureTuple2 CompositeFutureTuple2 (T0, v0, 0) (T1, v1, 1) }
impl_future_tuple! { FutureTuple3 CompositeFutureTuple3 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) }
impl_future_tuple! { FutureTuple4 CompositeFutureTuple4 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) }
impl_future_tuple! { FutureTuple5 CompositeFutureTuple5 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) }
impl_future_tuple! { FutureTuple6 CompositeFutureTuple6 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) }
impl_future_tuple! { FutureTuple7 CompositeFutureTuple7 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) }
impl_future_tuple! { FutureTuple8 CompositeFutureTuple8 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) (T7, v7, 7) }
impl_future_tuple! { FutureTuple9 CompositeFutureTuple9 (T0, v0, 0) (T1, v1, 1) (T2, v2, 2) (T3, v3, 3) (T4, v4, 4) (T5, v5, 5) (T6, v6, 6) (T7, v7, 7) (T8, v8, 8) }

#[cfg(test)]
mod test {
    use super::*;
    use crate::future::Promise;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn assert_succeeds_with<T: PartialEq + fmt::Debug + Clone + Send + 'static>(
        expected: Option<T>,
        future: &SharedFuture<T>,
    ) {
        assert!(future.succeeded());
        assert_eq!(future.result(), expected);
    }

    #[test]
    fn slots_keep_their_identity() {
        let future0 = SharedFuture::<String>::empty();
        let future1 = Promise::<i32>::new().future();

        let tuple = FutureTuple2::of(future0.clone(), future1.clone());
        assert!(tuple.0.ptr_eq(&future0));
        assert!(tuple.1.ptr_eq(&future1));
    }

    #[test]
    fn native_tuple_conversion_keeps_identity() {
        let future0 = SharedFuture::ok(1u8);
        let future1 = SharedFuture::ok("hello");
        let future2 = SharedFuture::ok(3u16);

        let tuple = (future0.clone(), future1.clone(), future2.clone()).into_future_tuple();
        assert!(tuple.0.ptr_eq(&future0));
        assert!(tuple.1.ptr_eq(&future1));
        assert!(tuple.2.ptr_eq(&future2));
    }

    #[test]
    fn nine_slots_keep_their_identity() {
        let f0 = SharedFuture::ok(0u8);
        let f1 = SharedFuture::ok(1u16);
        let f2 = SharedFuture::ok(2u32);
        let f3 = SharedFuture::ok(3u64);
        let f4 = SharedFuture::ok(4i8);
        let f5 = SharedFuture::ok(5i16);
        let f6 = SharedFuture::ok(6i32);
        let f7 = SharedFuture::ok(7i64);
        let f8 = SharedFuture::ok("eight");

        let tuple = FutureTuple9::of(
            f0.clone(),
            f1.clone(),
            f2.clone(),
            f3.clone(),
            f4.clone(),
            f5.clone(),
            f6.clone(),
            f7.clone(),
            f8.clone(),
        );
        assert!(tuple.0.ptr_eq(&f0));
        assert!(tuple.4.ptr_eq(&f4));
        assert!(tuple.8.ptr_eq(&f8));
    }

    #[test]
    fn map_empty_erases_values() {
        let tuple = FutureTuple2::of(SharedFuture::ok(1), SharedFuture::ok("hello")).map_empty();
        assert!(tuple.0.succeeded());
        assert_eq!(tuple.0.result(), None);
        assert!(tuple.1.succeeded());
        assert_eq!(tuple.1.result(), None);

        let failed =
            FutureTuple2::of(SharedFuture::<i32>::err("fail0"), SharedFuture::ok("hi")).map_empty();
        assert_eq!(failed.0.cause().unwrap().to_string(), "fail0");
    }

    #[test]
    fn otherwise_substitutes_failures_only() {
        let tuple = FutureTuple2::of(SharedFuture::ok(1), SharedFuture::ok("hello"))
            .otherwise(0, "default");
        assert_succeeds_with(Some(1), &tuple.0);
        assert_succeeds_with(Some("hello"), &tuple.1);

        let failed = FutureTuple2::of(
            SharedFuture::<i32>::err("fail0"),
            SharedFuture::<&str>::err("fail1"),
        )
        .otherwise(0, "default");
        assert_succeeds_with(Some(0), &failed.0);
        assert_succeeds_with(Some("default"), &failed.1);
    }

    #[test]
    fn otherwise_inspect_sees_each_cause_in_slot_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let observed = Arc::clone(&seen);
        let kept = FutureTuple2::of(SharedFuture::ok(1), SharedFuture::ok("hello"))
            .otherwise_inspect(move |cause| observed.lock().unwrap().push(cause.to_string()), 0, "default");
        assert_succeeds_with(Some(1), &kept.0);
        assert!(seen.lock().unwrap().is_empty());

        let observed = Arc::clone(&seen);
        let substituted = FutureTuple2::of(
            SharedFuture::<i32>::err("fail0"),
            SharedFuture::<&str>::err("fail1"),
        )
        .otherwise_inspect(move |cause| observed.lock().unwrap().push(cause.to_string()), 0, "default");
        assert_succeeds_with(Some(0), &substituted.0);
        assert_succeeds_with(Some("default"), &substituted.1);
        assert_eq!(*seen.lock().unwrap(), ["fail0", "fail1"]);
    }

    #[test]
    fn otherwise_empty_absorbs_failures() {
        let tuple = FutureTuple2::of(
            SharedFuture::<i32>::err("fail0"),
            SharedFuture::ok("hello"),
        )
        .otherwise_empty();
        assert!(tuple.0.succeeded());
        assert_eq!(tuple.0.result(), None);
        assert_succeeds_with(Some("hello"), &tuple.1);
    }

    #[test]
    fn defaults_fill_empty_slots() {
        let tuple = FutureTuple2::of(SharedFuture::ok(1), SharedFuture::ok("hello"))
            .defaults(0, "default");
        assert_succeeds_with(Some(1), &tuple.0);
        assert_succeeds_with(Some("hello"), &tuple.1);

        let emptied = FutureTuple2::of(SharedFuture::<i32>::empty(), SharedFuture::<&str>::empty())
            .defaults(0, "default");
        assert_succeeds_with(Some(0), &emptied.0);
        assert_succeeds_with(Some("default"), &emptied.1);
    }

    #[test]
    fn defaults_inspect_counts_defaulted_slots() {
        let count = Arc::new(AtomicUsize::new(0));

        let observed = Arc::clone(&count);
        let kept = FutureTuple2::of(SharedFuture::ok(1), SharedFuture::ok("hello"))
            .defaults_inspect(move || { observed.fetch_add(1, Ordering::SeqCst); }, 0, "default");
        assert_succeeds_with(Some(1), &kept.0);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let observed = Arc::clone(&count);
        let defaulted = FutureTuple2::of(SharedFuture::<i32>::empty(), SharedFuture::<&str>::empty())
            .defaults_inspect(move || { observed.fetch_add(1, Ordering::SeqCst); }, 0, "default");
        assert_succeeds_with(Some(0), &defaulted.0);
        assert_succeeds_with(Some("default"), &defaulted.1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fallback_covers_failure_and_empty() {
        let tuple = FutureTuple2::of(
            SharedFuture::<i32>::err("fail0"),
            SharedFuture::<&str>::empty(),
        )
        .fallback(0, "default");
        assert_succeeds_with(Some(0), &tuple.0);
        assert_succeeds_with(Some("default"), &tuple.1);
    }

    #[test]
    fn fallback_inspect_fires_each_handler_on_its_own_path() {
        let empties = Arc::new(AtomicUsize::new(0));
        let causes = Arc::new(Mutex::new(Vec::new()));

        let observed_causes = Arc::clone(&causes);
        let observed_empties = Arc::clone(&empties);
        let tuple = FutureTuple2::of(
            SharedFuture::<i32>::err("fail0"),
            SharedFuture::<&str>::empty(),
        )
        .fallback_inspect(
            move |cause| observed_causes.lock().unwrap().push(cause.to_string()),
            move || { observed_empties.fetch_add(1, Ordering::SeqCst); },
            0,
            "default",
        );
        assert_succeeds_with(Some(0), &tuple.0);
        assert_succeeds_with(Some("default"), &tuple.1);
        assert_eq!(*causes.lock().unwrap(), ["fail0"]);
        assert_eq!(empties.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn aggregation_retains_the_tuple() {
        let promise = Promise::<i32>::new();
        let tuple = FutureTuple2::of(SharedFuture::ok("hello".to_string()), promise.future());

        let composite = tuple.join();
        assert!(composite.tuple().0.ptr_eq(&tuple.0));
        assert!(composite.tuple().1.ptr_eq(&tuple.1));
        assert_eq!(composite.raw().size(), 2);
    }

    #[test]
    fn compose_uses_the_caller_policy() {
        let tuple = FutureTuple2::of(SharedFuture::<i32>::err("fail0"), SharedFuture::ok("hi"));
        let composite = tuple.compose(|f0, f1| CompositeFuture::any(vec![f0.signal(), f1.signal()]));
        assert!(composite.raw().succeeded());
    }
}
