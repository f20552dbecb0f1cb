//! # h5vol-backend
//!
//! The pluggable storage-backend layer of a container file format:
//!
//! - a **block I/O driver** contract mapping logical file addresses onto a
//!   storage medium, with a reference driver over ordinary files, and
//! - a **driver registry** plus **dispatch layer** routing structured-object
//!   operations (file, group, dataset, attribute, datatype, link, object) to
//!   interchangeable backends selected at runtime.
//!
//! The crate does not interpret the bytes it moves.
//!
//! ---
//!
//! ## Quick Start
//!
//! Reading and writing raw bytes through the reference block driver:
//!
//! ```rust
//! use h5vol_backend::{Address, BlockDriver, DriverConfig, OpenFlags, StdioFile};
//!
//! # fn main() -> h5vol_backend::Result<()> {
//! # let dir = std::env::temp_dir().join(format!("h5vol-lib-{}", std::process::id()));
//! # std::fs::create_dir_all(&dir).unwrap();
//! let path = dir.join("data.bin");
//! let mut file = StdioFile::open(
//!     &path,
//!     OpenFlags::CREATE | OpenFlags::READ_WRITE | OpenFlags::TRUNCATE,
//!     DriverConfig::default(),
//! )?;
//! file.write(Address::new(4), b"abcd")?;
//! assert_eq!(file.eof(), 8);
//!
//! let mut head = [0xffu8; 6];
//! file.read(Address::ZERO, &mut head)?;
//! assert_eq!(&head, b"\0\0\0\0ab");
//! file.close()?;
//! # std::fs::remove_dir_all(&dir).unwrap();
//! # Ok(())
//! # }
//! ```
//!
//! Registering a backend and dispatching to it:
//!
//! ```rust
//! use h5vol_backend::{Args, Connector, FileOps, Opaque, OpenFlags, Registry, Result};
//!
//! struct Scratch;
//!
//! impl FileOps for Scratch {
//!     fn create(&self, name: &str, _: OpenFlags, _: &mut Args) -> Result<Opaque> {
//!         Ok(Box::new(name.to_owned()))
//!     }
//!     fn close(&self, _: Opaque, _: &mut Args) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl Connector for Scratch {
//!     fn name(&self) -> &str { "scratch" }
//!     fn file(&self) -> Option<&dyn FileOps> { Some(self) }
//! }
//!
//! let mut registry = Registry::new();
//! let id = registry.register(Scratch)?;
//!
//! let dispatcher = registry.dispatcher();
//! let mut args = Args::empty();
//! let file = dispatcher.file_create(id, "a.h5", OpenFlags::CREATE | OpenFlags::READ_WRITE, &mut args)?;
//! assert_eq!(file.driver_name(), "scratch");
//! dispatcher.file_close(file, &mut args)?;
//! # Ok::<(), h5vol_backend::VolError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BlockDriver`] | Byte-addressable driver contract |
//! | [`StdioFile`] | Reference driver with seek-skip position tracking |
//! | [`Connector`] | A backend: name, lifecycle hooks, per-domain tables |
//! | [`Registry`] | Registered drivers by id and name |
//! | [`Dispatcher`] | One entry point per `(domain, verb)` |
//! | [`ObjectHandle`] | An open object tagged with its driver and kind |
//! | [`Request`] | A deferred operation |
//! | [`VolError`] | Error type with context |
//!
//! ---
//!
//! ## Capability Probing
//!
//! Every dispatch may answer [`VolError::Unsupported`]. It is an expected
//! outcome, not a failure: it is how callers learn which optional features a
//! backend has. Use [`ProbeExt::probe`] to fold it into `Ok(None)`.
//!
//! ---
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: `info` for
//! registry changes, `debug` for opens, closes and failed calls, `trace` for
//! individual dispatches and seeks. Install any subscriber to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`DriverConfig`] and the plain value types, plus JSON config loading |

// Private modules
mod block;
mod config;
mod dispatch;
mod error;
mod ext;
mod handle;
mod payload;
mod registry;
mod traits;
mod types;

// Public re-exports - error types
pub use error::{Result, VolError};

// Public re-exports - core types
pub use types::{
    Address, Domain, IdentityKey, LastOp, Location, ObjectKind, OffsetWidth, Opcode, OpenFlags,
    RequestStatus, Verb,
};

// Public re-exports - block I/O
pub use block::{BlockDriver, Medium, StdioFile};
pub use config::{DriverConfig, DriverConfigBuilder};

// Public re-exports - connector traits
pub use traits::{
    AttributeOps, Connector, DatasetOps, DatatypeOps, FileOps, GroupOps, LinkOps, ObjectOps,
    RequestOps,
};

// Public re-exports - registry and dispatch
pub use dispatch::Dispatcher;
pub use handle::{ObjectHandle, Request};
pub use payload::{Args, Opaque, Payload};
pub use registry::{DriverId, Registry};

// Public re-exports - infrastructure
pub use ext::ProbeExt;
