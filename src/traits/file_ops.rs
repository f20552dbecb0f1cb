//! File-level operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, OpenFlags, Opcode, Verb};

/// Operations on container files.
///
/// A file is the root of every other object: groups, datasets and the rest
/// are created relative to an open file handle.
///
/// # Example
///
/// ```rust
/// use std::any::Any;
/// use h5vol_backend::{Args, FileOps, OpenFlags, Opaque, Result};
///
/// struct Scratch;
///
/// impl FileOps for Scratch {
///     fn create(&self, name: &str, _: OpenFlags, _: &mut Args) -> Result<Opaque> {
///         Ok(Box::new(name.to_string()))
///     }
///
///     fn close(&self, file: Opaque, _: &mut Args) -> Result<()> {
///         drop(file);
///         Ok(())
///     }
/// }
///
/// let f = Scratch.create("a.h5", OpenFlags::CREATE, &mut Args::empty()).unwrap();
/// assert_eq!(f.downcast_ref::<String>().map(String::as_str), Some("a.h5"));
/// assert!(Scratch.open("a.h5", OpenFlags::empty(), &mut Args::empty()).is_err());
/// ```
pub trait FileOps: Send + Sync {
    /// Create a file named `name`.
    ///
    /// # Errors
    ///
    /// - [`VolError::Unsupported`](crate::VolError::Unsupported) by default
    fn create(&self, name: &str, flags: OpenFlags, args: &mut Args) -> Result<Opaque> {
        let _ = (name, flags, args);
        unsupported(Domain::File, Verb::Create)
    }

    /// Open an existing file named `name`.
    ///
    /// # Errors
    ///
    /// - [`VolError::Unsupported`](crate::VolError::Unsupported) by default
    fn open(&self, name: &str, flags: OpenFlags, args: &mut Args) -> Result<Opaque> {
        let _ = (name, flags, args);
        unsupported(Domain::File, Verb::Open)
    }

    /// Query a property of an open file.
    fn get(&self, file: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (file, op, args);
        unsupported(Domain::File, Verb::Get)
    }

    /// Backend-specific file operation.
    ///
    /// `file` is `None` for operations that act on names rather than on an
    /// open file (existence checks, deletion).
    fn specific(&self, file: Option<&mut dyn Any>, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (file, op, args);
        unsupported(Domain::File, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, file: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (file, op, args);
        unsupported(Domain::File, Verb::Optional)
    }

    /// Release an open file.
    fn close(&self, file: Opaque, args: &mut Args) -> Result<()> {
        let _ = (file, args);
        unsupported(Domain::File, Verb::Close)
    }
}
