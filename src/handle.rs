//! Handles to open objects and outstanding requests.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::payload::Opaque;
use crate::registry::DriverId;
use crate::traits::Connector;
use crate::types::{ObjectKind, RequestStatus};

/// An open object: the driver that produced it, its kind, and the driver's
/// private state.
///
/// The handle keeps its driver alive; unregistering the driver does not
/// invalidate handles already open. Closing goes through the matching
/// domain of the [`Dispatcher`](crate::Dispatcher) and consumes the handle.
/// A handle dropped without a close releases the driver state without
/// telling the driver.
pub struct ObjectHandle {
    driver: DriverId,
    kind: ObjectKind,
    connector: Arc<dyn Connector>,
    inner: Opaque,
}

impl ObjectHandle {
    pub(crate) fn new(
        driver: DriverId,
        kind: ObjectKind,
        connector: Arc<dyn Connector>,
        inner: Opaque,
    ) -> Self {
        Self {
            driver,
            kind,
            connector,
            inner,
        }
    }

    /// Id the producing driver was registered under.
    #[inline]
    pub fn driver_id(&self) -> DriverId {
        self.driver
    }

    /// Kind of object, fixed at creation.
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Name of the producing driver.
    pub fn driver_name(&self) -> &str {
        self.connector.name()
    }

    pub(crate) fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub(crate) fn state(&self) -> &dyn Any {
        &*self.inner
    }

    pub(crate) fn state_mut(&mut self) -> &mut dyn Any {
        &mut *self.inner
    }

    pub(crate) fn into_state(self) -> Opaque {
        self.inner
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("driver", &self.driver)
            .field("driver_name", &self.connector.name())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An operation a driver deferred instead of completing in place.
///
/// Produced by the dispatcher when a driver calls
/// [`Args::defer`](crate::Args::defer); collected with
/// [`Args::take_request`](crate::Args::take_request). Once the request
/// reaches a terminal [`RequestStatus`] the status is kept and the driver is
/// not asked again.
pub struct Request {
    driver: DriverId,
    connector: Arc<dyn Connector>,
    token: Opaque,
    status: RequestStatus,
}

impl Request {
    pub(crate) fn new(driver: DriverId, connector: Arc<dyn Connector>, token: Opaque) -> Self {
        Self {
            driver,
            connector,
            token,
            status: RequestStatus::Pending,
        }
    }

    /// Id of the driver that owns the request.
    #[inline]
    pub fn driver_id(&self) -> DriverId {
        self.driver
    }

    /// Last status observed.
    #[inline]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub(crate) fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub(crate) fn token_mut(&mut self) -> &mut dyn Any {
        &mut *self.token
    }

    pub(crate) fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("driver", &self.driver)
            .field("driver_name", &self.connector.name())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
