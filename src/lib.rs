//! Typed tuples of shared futures.
//!
//! This library combines N independently-completing asynchronous results
//! (arity 2 through 9) into strongly-typed aggregated views, without
//! collapsing the per-slot types into an untyped list:
//!
//! - [`SharedFuture`]/[`Promise`]: a one-shot, write-once result cell shared
//!   between all of its handles, with empty-success and failure substitution
//!   combinators (`default_with`, `fallback_with`, `non_empty`, `map_some`).
//! - [`tuple::FutureTuple2`]..[`tuple::FutureTuple9`]: ordered tuples of
//!   futures with slot-wise substitution and `all`/`any`/`join` aggregation.
//! - [`tuple::CompositeFutureTuple2`]..[`tuple::CompositeFutureTuple9`]:
//!   an aggregate paired with its originating tuple, offering completion
//!   mapping over the original futures (`through`, `join_through`) or over
//!   the typed success values (`applift`, `join_applift`).
//! - [`CompositeFutureWrapper`]: the arity-independent completion-mapping
//!   core over a bare [`CompositeFuture`].
//!
//! There is no scheduler and no I/O here: completion dispatch is a
//! synchronous callback cascade on whichever thread resolves a promise, and
//! every future can also be `.await`ed under any executor.
//!
//! # Examples
//!
//! ```
//! use futures_tuple::prelude::*;
//! use futures_tuple::{Promise, SharedFuture};
//!
//! let promise = Promise::<i32>::new();
//! let greeting = SharedFuture::ok("hello".to_string());
//!
//! let sum = (greeting, promise.future())
//!     .into_future_tuple()
//!     .all()
//!     .applift(|s, n| Ok(s.unwrap().len() as i32 + n.unwrap()));
//!
//! promise.complete(4);
//! assert_eq!(sum.result(), Some(9));
//! ```
//!
//! Awaiting works too, since every [`SharedFuture`] is a
//! [`Future`][core::future::Future]:
//!
//! ```
//! use futures_tuple::SharedFuture;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let future = SharedFuture::ok(1u8);
//!     assert_eq!(future.await.unwrap(), Some(1));
//! })
//! ```

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod cause;

pub mod composite;
pub mod future;
pub mod tuple;

pub use cause::{Cause, EmptyValueError};
pub use composite::{CompositeFuture, CompositeFutureWrapper};
pub use future::{Outcome, Promise, SharedFuture};

/// The futures tuple prelude.
pub mod prelude {
    pub use super::tuple::IntoFutureTuple as _;
}
