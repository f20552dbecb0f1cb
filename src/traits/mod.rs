//! # Connector Traits
//!
//! The capability traits a storage backend implements to be reachable
//! through the [`Dispatcher`](crate::Dispatcher).
//!
//! ## Layout
//!
//! A backend is one [`Connector`]. The connector hands out one operation
//! table per domain it supports; every table is optional, and every method
//! of a table has a default that reports [`VolError::Unsupported`]:
//!
//! ```text
//! Connector ──┬── file()      → Option<&dyn FileOps>
//!             ├── group()     → Option<&dyn GroupOps>
//!             ├── dataset()   → Option<&dyn DatasetOps>
//!             ├── attribute() → Option<&dyn AttributeOps>
//!             ├── datatype()  → Option<&dyn DatatypeOps>
//!             ├── link()      → Option<&dyn LinkOps>
//!             ├── object()    → Option<&dyn ObjectOps>
//!             └── request()   → Option<&dyn RequestOps>
//! ```
//!
//! ## Quick Reference
//!
//! | Table | Verbs |
//! |-------|-------|
//! | [`FileOps`] | create, open, get, specific, optional, close |
//! | [`GroupOps`] | create, open, get, specific, optional, close |
//! | [`DatasetOps`] | create, open, read, write, get, specific, optional, close |
//! | [`AttributeOps`] | create, open, read, write, get, specific, optional, close |
//! | [`DatatypeOps`] | create (commit), open, get, specific, optional, close |
//! | [`LinkOps`] | create, copy, move, get, specific, optional |
//! | [`ObjectOps`] | open, copy, get, specific, optional |
//! | [`RequestOps`] | cancel, test, wait |
//!
//! ## Backend State
//!
//! Create and open return the backend's own state for the new object as an
//! [`Opaque`](crate::Opaque) box. The dispatcher stores it inside an
//! [`ObjectHandle`](crate::ObjectHandle) and passes it back as `&mut dyn Any`
//! on every later call; backends downcast it to their concrete type.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`. Backends use interior
//! mutability for shared state.
//!
//! ## Object Safety
//!
//! All traits are object-safe:
//!
//! ```rust
//! use h5vol_backend::{Connector, FileOps};
//!
//! struct Native;
//! impl FileOps for Native {}
//! impl Connector for Native {
//!     fn name(&self) -> &str { "native" }
//!     fn file(&self) -> Option<&dyn FileOps> { Some(self) }
//! }
//!
//! let c: Box<dyn Connector> = Box::new(Native);
//! assert!(c.file().is_some());
//! assert!(c.group().is_none());
//! ```

mod attribute_ops;
mod dataset_ops;
mod datatype_ops;
mod file_ops;
mod group_ops;
mod link_ops;
mod object_ops;
mod request_ops;

pub use attribute_ops::AttributeOps;
pub use dataset_ops::DatasetOps;
pub use datatype_ops::DatatypeOps;
pub use file_ops::FileOps;
pub use group_ops::GroupOps;
pub use link_ops::LinkOps;
pub use object_ops::ObjectOps;
pub use request_ops::RequestOps;

use crate::error::{Result, VolError};
use crate::payload::Args;
use crate::types::{Domain, Verb};

/// A storage backend reachable through the dispatcher.
///
/// Only [`name`](Connector::name) is required. A connector that supports
/// nothing else is still valid: every dispatch to it reports
/// [`VolError::Unsupported`].
///
/// # Lifecycle
///
/// The registry calls [`initialize`](Connector::initialize) and
/// [`terminate`](Connector::terminate) at most once each. Both default to
/// doing nothing.
pub trait Connector: Send + Sync {
    /// Driver name; unique within a registry and never empty.
    fn name(&self) -> &str;

    /// One-time setup before first use.
    ///
    /// # Errors
    ///
    /// Any error the backend reports; the registry leaves the driver
    /// uninitialized so the call may be retried.
    fn initialize(&self, args: &mut Args) -> Result<()> {
        let _ = args;
        Ok(())
    }

    /// One-time teardown.
    ///
    /// # Errors
    ///
    /// Any error the backend reports.
    fn terminate(&self, args: &mut Args) -> Result<()> {
        let _ = args;
        Ok(())
    }

    /// File operations, if supported.
    fn file(&self) -> Option<&dyn FileOps> {
        None
    }

    /// Group operations, if supported.
    fn group(&self) -> Option<&dyn GroupOps> {
        None
    }

    /// Dataset operations, if supported.
    fn dataset(&self) -> Option<&dyn DatasetOps> {
        None
    }

    /// Attribute operations, if supported.
    fn attribute(&self) -> Option<&dyn AttributeOps> {
        None
    }

    /// Named datatype operations, if supported.
    fn datatype(&self) -> Option<&dyn DatatypeOps> {
        None
    }

    /// Link operations, if supported.
    fn link(&self) -> Option<&dyn LinkOps> {
        None
    }

    /// Generic object operations, if supported.
    fn object(&self) -> Option<&dyn ObjectOps> {
        None
    }

    /// Asynchronous request operations, if supported.
    fn request(&self) -> Option<&dyn RequestOps> {
        None
    }
}

/// The default answer of every unimplemented table method.
#[inline]
pub(crate) fn unsupported<T>(domain: Domain, verb: Verb) -> Result<T> {
    Err(VolError::Unsupported { domain, verb })
}
