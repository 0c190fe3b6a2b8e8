//! The shared single-result future and its combinators.
//!
//! [`SharedFuture`] is a one-shot, write-once result cell shared between
//! every handle cloned from it; [`Promise`] is its writable counterpart.
//! A resolution is an [`Outcome`]: a success that may be *empty* (no value),
//! or a failure carrying a [`Cause`][crate::Cause].
//!
//! On top of the cell sit the substitution combinators (`default_with`,
//! `fallback_with`, `non_empty`, `map_some`, ...) and the adapters
//! ([`futurize`], [`wrap`], [`flat_wrap`]) that the tuple and composite
//! layers of this crate build on.
//!
//! # Examples
//!
//! ```
//! use futures_tuple::{Promise, SharedFuture};
//!
//! let promise = Promise::<u32>::new();
//! let doubled = promise.future().map_some(|n| n * 2);
//! promise.complete(21);
//! assert_eq!(doubled.result(), Some(42));
//!
//! let recovered = SharedFuture::<u32>::err("boom").fallback_with(0);
//! assert_eq!(recovered.result(), Some(0));
//! ```

pub use shared::{Outcome, Promise, SharedFuture};
pub use wrap::{
    flat_wrap, flat_wrap_apply, futurize, join_wrap, join_wrap_apply, wrap, wrap_apply,
};

mod ext;
mod shared;
mod wrap;
