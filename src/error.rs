//! Error types for the driver, registry and dispatch layers.

use std::path::PathBuf;

use crate::types::{Domain, Verb};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VolError>;

/// Error type with contextual variants for every layer of the crate.
///
/// Medium-level variants carry the underlying [`std::io::Error`] as their
/// source. [`VolError::Unsupported`] is special: it is the answer a backend
/// gives for a capability it does not have, and callers probing for optional
/// features should treat it as an expected outcome (see
/// [`ProbeExt`](crate::ProbeExt)).
///
/// # Examples
///
/// ```rust
/// use h5vol_backend::{Domain, VolError, Verb};
///
/// let err = VolError::Unsupported { domain: Domain::Link, verb: Verb::Optional };
/// assert!(err.is_unsupported());
/// assert_eq!(err.to_string(), "link optional: operation not supported by driver");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum VolError {
    // Medium errors
    /// The file could not be opened (missing without `CREATE`, or the OS refused).
    #[error("can't open file: {path}: {source}")]
    CantOpenFile {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `CREATE | EXCLUSIVE` was requested for a path that already exists.
    #[error("file exists but CREATE and EXCLUSIVE were specified: {path}")]
    FileExists {
        /// The path that already exists.
        path: PathBuf,
    },

    /// Releasing the medium failed.
    #[error("close failed: {source}")]
    CloseError {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Repositioning the medium failed.
    #[error("seek to {address} failed: {source}")]
    SeekError {
        /// The address that was requested.
        address: u64,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from the medium failed.
    #[error("read of {size} bytes at {address} failed: {source}")]
    ReadError {
        /// Start address of the read.
        address: u64,
        /// Requested size.
        size: usize,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing (or flushing) to the medium failed, including short writes.
    #[error("write of {size} bytes at {address} failed: {source}")]
    WriteError {
        /// Start address of the write (0 for flush).
        address: u64,
        /// Requested size (0 for flush).
        size: usize,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The address range exceeds the largest representable medium offset.
    #[error("file address overflowed: {address} + {size} exceeds limit {limit}")]
    Overflow {
        /// Start address of the request.
        address: u64,
        /// Requested size.
        size: u64,
        /// Exclusive upper bound on addresses.
        limit: u64,
    },

    // Registry errors
    /// A driver could not be registered.
    #[error("can't register driver {name:?}: {reason}")]
    CantRegister {
        /// The driver name that was offered.
        name: String,
        /// Why registration was refused.
        reason: &'static str,
    },

    /// An identifier or handle does not refer to what the operation needs.
    #[error("bad type: {0}")]
    BadType(String),

    /// Iteration over registered drivers failed.
    #[error("can't iterate over driver ids: {0}")]
    BadIterator(String),

    /// An argument or payload had the wrong shape for the operation.
    #[error("invalid argument: {0}")]
    Args(String),

    // Dispatch outcomes
    /// The driver has no implementation for this domain and verb.
    #[error("{domain} {verb}: operation not supported by driver")]
    Unsupported {
        /// Operation domain that was dispatched.
        domain: Domain,
        /// Verb that was dispatched.
        verb: Verb,
    },

    /// The driver has no asynchronous request support.
    #[error("request {operation}: operation not supported by driver")]
    RequestUnsupported {
        /// `"cancel"`, `"test"` or `"wait"`.
        operation: &'static str,
    },

    /// Failure reported by a backend implementation.
    #[error("driver {driver}: {message}")]
    Backend {
        /// Name of the reporting driver.
        driver: String,
        /// Backend-provided description.
        message: String,
    },
}

impl VolError {
    /// Returns `true` for the capability-probe outcomes
    /// [`VolError::Unsupported`] and [`VolError::RequestUnsupported`].
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            VolError::Unsupported { .. } | VolError::RequestUnsupported { .. }
        )
    }

    /// Returns `true` for errors raised by the medium itself.
    pub fn is_medium(&self) -> bool {
        matches!(
            self,
            VolError::CantOpenFile { .. }
                | VolError::FileExists { .. }
                | VolError::CloseError { .. }
                | VolError::SeekError { .. }
                | VolError::ReadError { .. }
                | VolError::WriteError { .. }
                | VolError::Overflow { .. }
        )
    }

    /// Shorthand for a backend-reported failure.
    pub fn backend(driver: impl Into<String>, message: impl Into<String>) -> Self {
        VolError::Backend {
            driver: driver.into(),
            message: message.into(),
        }
    }
}

impl From<VolError> for std::io::Error {
    fn from(err: VolError) -> Self {
        let kind = match &err {
            VolError::CantOpenFile { source, .. }
            | VolError::CloseError { source }
            | VolError::SeekError { source, .. }
            | VolError::ReadError { source, .. }
            | VolError::WriteError { source, .. } => source.kind(),
            VolError::FileExists { .. } => std::io::ErrorKind::AlreadyExists,
            VolError::Overflow { .. } | VolError::Args(_) => std::io::ErrorKind::InvalidInput,
            VolError::Unsupported { .. } | VolError::RequestUnsupported { .. } => {
                std::io::ErrorKind::Unsupported
            }
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
