//! Type-erased argument and result values passed between callers and drivers.
//!
//! The dispatcher never looks inside a [`Payload`]; it only moves it between
//! the caller and the driver that defines its meaning.

use std::any::Any;
use std::fmt;

use crate::error::{Result, VolError};
use crate::handle::Request;

/// Backend-owned state behind a handle or request token.
pub type Opaque = Box<dyn Any + Send>;

/// A value whose type is agreed between a caller and one driver.
///
/// # Example
///
/// ```rust
/// use h5vol_backend::Payload;
///
/// let p = Payload::new(42u32);
/// assert_eq!(p.downcast_ref::<u32>(), Some(&42));
/// assert!(p.downcast_ref::<u64>().is_none());
/// assert_eq!(p.downcast::<u32>().unwrap(), 42);
/// ```
#[derive(Default)]
pub struct Payload(Option<Opaque>);

impl Payload {
    /// A payload carrying nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Wrap a value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// Returns `true` if nothing is carried.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` if the carried value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_ref().is_some_and(|v| v.is::<T>())
    }

    /// Borrow the value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_ref()?.downcast_ref::<T>()
    }

    /// Mutably borrow the value as a `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_mut()?.downcast_mut::<T>()
    }

    /// Take the value out as a `T`.
    ///
    /// # Errors
    ///
    /// - [`VolError::Args`] if the payload is empty or holds another type
    pub fn downcast<T: Any>(self) -> Result<T> {
        let inner = self
            .0
            .ok_or_else(|| VolError::Args("expected a payload, found none".into()))?;
        inner.downcast::<T>().map(|b| *b).map_err(|_| {
            VolError::Args(format!(
                "payload is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Payload(..)"),
            None => f.write_str("Payload(empty)"),
        }
    }
}

/// Arguments for one dispatched call.
///
/// Carries the caller's input [`Payload`] to the driver and, for drivers
/// that complete asynchronously, the request token back to the caller.
///
/// A driver that defers completion calls [`Args::defer`]; after the call
/// returns, the caller collects the bound [`Request`] with
/// [`Args::take_request`].
#[derive(Debug, Default)]
pub struct Args {
    input: Payload,
    token: Option<Opaque>,
    request: Option<Request>,
}

impl Args {
    /// Arguments with no input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Arguments carrying `value` as input.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self::from_payload(Payload::new(value))
    }

    /// Arguments carrying an existing payload.
    pub fn from_payload(input: Payload) -> Self {
        Self {
            input,
            token: None,
            request: None,
        }
    }

    /// The input payload.
    #[inline]
    pub fn input(&self) -> &Payload {
        &self.input
    }

    /// Take the input payload, leaving an empty one.
    pub fn take_input(&mut self) -> Payload {
        std::mem::take(&mut self.input)
    }

    /// Borrow the input as a `T`.
    ///
    /// # Errors
    ///
    /// - [`VolError::Args`] if the input is missing or of another type
    pub fn get<T: Any>(&self) -> Result<&T> {
        self.input.downcast_ref::<T>().ok_or_else(|| {
            VolError::Args(format!(
                "expected {} argument",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Mark the call as asynchronous; `token` identifies it to the driver.
    ///
    /// Called by drivers only.
    pub fn defer<T: Any + Send>(&mut self, token: T) {
        self.token = Some(Box::new(token));
    }

    /// Returns `true` if the driver deferred completion and the request has
    /// not yet been taken.
    pub fn is_deferred(&self) -> bool {
        self.token.is_some() || self.request.is_some()
    }

    /// Take the request produced by the last call, if it was deferred.
    pub fn take_request(&mut self) -> Option<Request> {
        self.request.take()
    }

    pub(crate) fn take_token(&mut self) -> Option<Opaque> {
        self.token.take()
    }

    pub(crate) fn set_request(&mut self, request: Request) {
        self.request = Some(request);
    }
}
