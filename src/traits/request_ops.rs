//! Asynchronous request operations.

use std::any::Any;

use crate::error::Result;
use crate::types::RequestStatus;

/// Progress control for requests a backend deferred with
/// [`Args::defer`](crate::Args::defer).
///
/// `token` is the value the backend deferred with. Synchronous backends do
/// not implement this trait; the dispatcher then answers every request
/// operation with [`VolError::RequestUnsupported`](crate::VolError::RequestUnsupported).
pub trait RequestOps: Send + Sync {
    /// Ask the backend to abandon the request.
    ///
    /// Returns [`RequestStatus::Canceled`] if it was stopped, or the terminal
    /// status it had already reached.
    fn cancel(&self, token: &mut dyn Any) -> Result<RequestStatus>;

    /// Poll without blocking.
    fn test(&self, token: &mut dyn Any) -> Result<RequestStatus>;

    /// Block until the request reaches a terminal status.
    fn wait(&self, token: &mut dyn Any) -> Result<RequestStatus>;
}
