use core::fmt;
use std::error::Error;
use std::sync::Arc;

/// A shareable failure cause.
///
/// Every observer of a failed [`SharedFuture`][crate::SharedFuture] sees the
/// same underlying error; cloning a `Cause` clones the handle, not the error.
#[derive(Clone)]
pub struct Cause {
    inner: Arc<dyn Error + Send + Sync>,
}

impl Cause {
    /// Wraps a concrete error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates a cause carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Borrows the underlying error.
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        &*self.inner
    }

    /// Returns `true` if the underlying error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: Error + 'static,
    {
        self.downcast_ref::<E>().is_some()
    }

    /// Attempts to borrow the underlying error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.as_error().downcast_ref::<E>()
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<Box<dyn Error + Send + Sync>> for Cause {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        Self { inner: error.into() }
    }
}

/// Message-only error backing [`Cause::msg`].
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Error for Message {}

/// The error a future rejected by
/// [`non_empty`][crate::SharedFuture::non_empty] fails with.
#[derive(Debug)]
pub struct EmptyValueError;

impl fmt::Display for EmptyValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("future resolved with an empty value")
    }
}

impl Error for EmptyValueError {}
