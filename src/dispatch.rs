//! # Dispatch Layer
//!
//! Routes `(domain, verb)` calls to the connector that owns the target.
//!
//! ## Routing
//!
//! ```text
//! caller ── file_create(id, ..) ──► Registry::get(id) ──► Connector::file() ──► FileOps::create
//!   │                                                                              │
//!   │◄──────────────────────── ObjectHandle { driver, kind, state } ◄──────────────┘
//!   │
//!   └── group_create(&mut handle, ..) ──► handle's connector ──► GroupOps::create(state, ..)
//! ```
//!
//! Calls that start from a handle go to the connector that produced the
//! handle, so they keep working after the driver is unregistered. Only the
//! root calls ([`file_create`](Dispatcher::file_create),
//! [`file_open`](Dispatcher::file_open), handle-less
//! [`file_specific`](Dispatcher::file_specific) and
//! [`object_register`](Dispatcher::object_register)) look the driver up by id.
//!
//! ## Outcomes
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Ok(..)` | The backend completed (or deferred) the call |
//! | [`VolError::Unsupported`] | The backend has no such table or method; an expected probe result |
//! | [`VolError::BadType`] | Unknown driver id, wrong handle kind, or handles of different drivers |
//! | other errors | Reported by the backend |
//!
//! ## Handle Kinds
//!
//! Verbs that take a [`Location`] only use the handle as an anchor for the
//! lookup (creating a group under a file, querying a link) and accept any
//! kind. Every other verb acts on the handle itself and requires a handle of
//! the domain's own kind. See [`Domain::accepts`].
//!
//! Links and untyped objects never become handles: no domain closes them.
//!
//! ## Deferred Calls
//!
//! A backend completing asynchronously calls [`Args::defer`] during the call.
//! On success the dispatcher turns the deferred token into a [`Request`],
//! which the caller collects with [`Args::take_request`] and drives with
//! [`request_test`](Dispatcher::request_test),
//! [`request_wait`](Dispatcher::request_wait) or
//! [`request_cancel`](Dispatcher::request_cancel).

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::{Result, VolError};
use crate::handle::{ObjectHandle, Request};
use crate::payload::{Args, Opaque, Payload};
use crate::registry::{DriverId, Registry};
use crate::traits::{Connector, RequestOps};
use crate::types::{Domain, Location, ObjectKind, Opcode, OpenFlags, RequestStatus, Verb};

/// Entry points for every `(domain, verb)` pair.
///
/// # Example
///
/// ```rust
/// use h5vol_backend::{Args, Connector, Domain, Opcode, OpenFlags, ProbeExt, Registry, Verb, VolError};
///
/// struct ReadOnly;
/// impl Connector for ReadOnly {
///     fn name(&self) -> &str { "read-only" }
/// }
///
/// let mut registry = Registry::new();
/// let id = registry.register(ReadOnly).unwrap();
/// let dispatcher = registry.dispatcher();
///
/// let err = dispatcher
///     .file_create(id, "a.h5", OpenFlags::CREATE | OpenFlags::READ_WRITE, &mut Args::empty())
///     .unwrap_err();
/// assert!(matches!(err, VolError::Unsupported { domain: Domain::File, verb: Verb::Create }));
///
/// // Probing turns the expected answer into `None`.
/// let probed = dispatcher
///     .file_specific(None, id, Opcode(1), &mut Args::empty())
///     .probe()
///     .unwrap();
/// assert!(probed.is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r Registry,
}

impl<'r> Dispatcher<'r> {
    /// A dispatcher resolving driver ids through `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// The registry driver ids are resolved through.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    // =========================================================================
    // File
    // =========================================================================

    /// Create a file through driver `id`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    /// - [`VolError::Unsupported`] if the driver cannot create files
    pub fn file_create(
        &self,
        id: DriverId,
        name: &str,
        flags: OpenFlags,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        self.open_root(id, Verb::Create, args, |c, args| {
            table(c.file(), Domain::File, Verb::Create)?.create(name, flags, args)
        })
    }

    /// Open a file through driver `id`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    /// - [`VolError::Unsupported`] if the driver cannot open files
    pub fn file_open(
        &self,
        id: DriverId,
        name: &str,
        flags: OpenFlags,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        self.open_root(id, Verb::Open, args, |c, args| {
            table(c.file(), Domain::File, Verb::Open)?.open(name, flags, args)
        })
    }

    /// Query an open file.
    pub fn file_get(
        &self,
        file: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(file, Domain::File, Verb::Get, args, |c, obj, args| {
            table(c.file(), Domain::File, Verb::Get)?.get(obj, op, args)
        })
    }

    /// Backend-specific file operation, with or without an open file.
    ///
    /// Without a handle the call goes to driver `id`. With one, the handle
    /// must belong to driver `id`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered (handle-less), the
    ///   handle belongs to another driver, or it is not a file
    /// - [`VolError::Unsupported`] if the driver has no such operation
    pub fn file_specific(
        &self,
        file: Option<&mut ObjectHandle>,
        id: DriverId,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let (domain, verb) = (Domain::File, Verb::Specific);
        let connector = match &file {
            Some(handle) => {
                if handle.driver_id() != id {
                    return Err(VolError::BadType(format!(
                        "file handle belongs to {}, not {id}",
                        handle.driver_id()
                    )));
                }
                accept(handle, domain, verb)?;
                handle.connector().clone()
            }
            None => self.registry.get(id)?.clone(),
        };
        let result = table(connector.file(), domain, verb)
            .and_then(|ops| ops.specific(file.map(|h| h.state_mut()), op, args));
        settle(domain, verb, id, &connector, args, result)
    }

    /// Backend-private file operation.
    pub fn file_optional(
        &self,
        file: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(file, Domain::File, Verb::Optional, args, |c, obj, args| {
            table(c.file(), Domain::File, Verb::Optional)?.optional(obj, op, args)
        })
    }

    /// Close a file, consuming the handle.
    pub fn file_close(&self, file: ObjectHandle, args: &mut Args) -> Result<()> {
        close_handle(file, Domain::File, args, |c, state, args| {
            table(c.file(), Domain::File, Verb::Close)?.close(state, args)
        })
    }

    // =========================================================================
    // Group
    // =========================================================================

    /// Create a group under `parent`.
    pub fn group_create(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Group, Verb::Create, args, |c, obj, args| {
            table(c.group(), Domain::Group, Verb::Create)?.create(obj, at, name, args)
        })
    }

    /// Open a group under `parent`.
    pub fn group_open(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Group, Verb::Open, args, |c, obj, args| {
            table(c.group(), Domain::Group, Verb::Open)?.open(obj, at, name, args)
        })
    }

    /// Query a group.
    pub fn group_get(
        &self,
        group: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(group, Domain::Group, Verb::Get, args, |c, obj, args| {
            table(c.group(), Domain::Group, Verb::Get)?.get(obj, op, args)
        })
    }

    /// Backend-specific group operation.
    pub fn group_specific(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Group, Verb::Specific, args, |c, obj, args| {
            table(c.group(), Domain::Group, Verb::Specific)?.specific(obj, at, op, args)
        })
    }

    /// Backend-private group operation.
    pub fn group_optional(
        &self,
        group: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(group, Domain::Group, Verb::Optional, args, |c, obj, args| {
            table(c.group(), Domain::Group, Verb::Optional)?.optional(obj, op, args)
        })
    }

    /// Close a group, consuming the handle.
    pub fn group_close(&self, group: ObjectHandle, args: &mut Args) -> Result<()> {
        close_handle(group, Domain::Group, args, |c, state, args| {
            table(c.group(), Domain::Group, Verb::Close)?.close(state, args)
        })
    }

    // =========================================================================
    // Dataset
    // =========================================================================

    /// Create a dataset under `parent`.
    pub fn dataset_create(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Dataset, Verb::Create, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Create)?.create(obj, at, name, args)
        })
    }

    /// Open a dataset under `parent`.
    pub fn dataset_open(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Dataset, Verb::Open, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Open)?.open(obj, at, name, args)
        })
    }

    /// Read dataset elements into `buf`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `dataset` is not a dataset handle
    /// - [`VolError::Unsupported`] if the driver cannot read datasets
    pub fn dataset_read(
        &self,
        dataset: &mut ObjectHandle,
        buf: &mut [u8],
        args: &mut Args,
    ) -> Result<()> {
        on_handle(dataset, Domain::Dataset, Verb::Read, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Read)?.read(obj, buf, args)
        })
    }

    /// Write dataset elements from `buf`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `dataset` is not a dataset handle
    /// - [`VolError::Unsupported`] if the driver cannot write datasets
    pub fn dataset_write(
        &self,
        dataset: &mut ObjectHandle,
        buf: &[u8],
        args: &mut Args,
    ) -> Result<()> {
        on_handle(dataset, Domain::Dataset, Verb::Write, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Write)?.write(obj, buf, args)
        })
    }

    /// Query a dataset.
    pub fn dataset_get(
        &self,
        dataset: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(dataset, Domain::Dataset, Verb::Get, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Get)?.get(obj, op, args)
        })
    }

    /// Backend-specific dataset operation.
    pub fn dataset_specific(
        &self,
        obj: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Dataset, Verb::Specific, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Specific)?.specific(obj, op, args)
        })
    }

    /// Backend-private dataset operation.
    pub fn dataset_optional(
        &self,
        dataset: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(dataset, Domain::Dataset, Verb::Optional, args, |c, obj, args| {
            table(c.dataset(), Domain::Dataset, Verb::Optional)?.optional(obj, op, args)
        })
    }

    /// Close a dataset, consuming the handle.
    pub fn dataset_close(&self, dataset: ObjectHandle, args: &mut Args) -> Result<()> {
        close_handle(dataset, Domain::Dataset, args, |c, state, args| {
            table(c.dataset(), Domain::Dataset, Verb::Close)?.close(state, args)
        })
    }

    // =========================================================================
    // Attribute
    // =========================================================================

    /// Attach an attribute to the object at `at`.
    pub fn attribute_create(
        &self,
        owner: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(owner, Domain::Attribute, Verb::Create, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Create)?.create(obj, at, name, args)
        })
    }

    /// Open an attribute of the object at `at`.
    pub fn attribute_open(
        &self,
        owner: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(owner, Domain::Attribute, Verb::Open, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Open)?.open(obj, at, name, args)
        })
    }

    /// Read an attribute value into `buf`.
    pub fn attribute_read(
        &self,
        attr: &mut ObjectHandle,
        buf: &mut [u8],
        args: &mut Args,
    ) -> Result<()> {
        on_handle(attr, Domain::Attribute, Verb::Read, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Read)?.read(obj, buf, args)
        })
    }

    /// Write an attribute value from `buf`.
    pub fn attribute_write(
        &self,
        attr: &mut ObjectHandle,
        buf: &[u8],
        args: &mut Args,
    ) -> Result<()> {
        on_handle(attr, Domain::Attribute, Verb::Write, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Write)?.write(obj, buf, args)
        })
    }

    /// Query attributes of `obj`.
    pub fn attribute_get(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Attribute, Verb::Get, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Get)?.get(obj, at, op, args)
        })
    }

    /// Backend-specific attribute operation.
    pub fn attribute_specific(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Attribute, Verb::Specific, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Specific)?.specific(obj, at, op, args)
        })
    }

    /// Backend-private attribute operation.
    pub fn attribute_optional(
        &self,
        attr: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(attr, Domain::Attribute, Verb::Optional, args, |c, obj, args| {
            table(c.attribute(), Domain::Attribute, Verb::Optional)?.optional(obj, op, args)
        })
    }

    /// Close an attribute, consuming the handle.
    pub fn attribute_close(&self, attr: ObjectHandle, args: &mut Args) -> Result<()> {
        close_handle(attr, Domain::Attribute, args, |c, state, args| {
            table(c.attribute(), Domain::Attribute, Verb::Close)?.close(state, args)
        })
    }

    // =========================================================================
    // Datatype
    // =========================================================================

    /// Commit a datatype under `name` (the datatype domain's create verb).
    pub fn datatype_commit(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Datatype, Verb::Create, args, |c, obj, args| {
            table(c.datatype(), Domain::Datatype, Verb::Create)?.create(obj, at, name, args)
        })
    }

    /// Open a committed datatype.
    pub fn datatype_open(
        &self,
        parent: &mut ObjectHandle,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        create_under(parent, Domain::Datatype, Verb::Open, args, |c, obj, args| {
            table(c.datatype(), Domain::Datatype, Verb::Open)?.open(obj, at, name, args)
        })
    }

    /// Query a committed datatype.
    pub fn datatype_get(
        &self,
        datatype: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(datatype, Domain::Datatype, Verb::Get, args, |c, obj, args| {
            table(c.datatype(), Domain::Datatype, Verb::Get)?.get(obj, op, args)
        })
    }

    /// Backend-specific datatype operation.
    pub fn datatype_specific(
        &self,
        obj: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Datatype, Verb::Specific, args, |c, obj, args| {
            table(c.datatype(), Domain::Datatype, Verb::Specific)?.specific(obj, op, args)
        })
    }

    /// Backend-private datatype operation.
    pub fn datatype_optional(
        &self,
        datatype: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(datatype, Domain::Datatype, Verb::Optional, args, |c, obj, args| {
            table(c.datatype(), Domain::Datatype, Verb::Optional)?.optional(obj, op, args)
        })
    }

    /// Close a committed datatype, consuming the handle.
    pub fn datatype_close(&self, datatype: ObjectHandle, args: &mut Args) -> Result<()> {
        close_handle(datatype, Domain::Datatype, args, |c, state, args| {
            table(c.datatype(), Domain::Datatype, Verb::Close)?.close(state, args)
        })
    }

    // =========================================================================
    // Link
    // =========================================================================

    /// Create a link at `at`; `op` selects the link flavor.
    pub fn link_create(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<()> {
        on_handle(obj, Domain::Link, Verb::Create, args, |c, obj, args| {
            table(c.link(), Domain::Link, Verb::Create)?.create(obj, at, op, args)
        })
    }

    /// Copy a link.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if the handles belong to different drivers
    pub fn link_copy(
        &self,
        src: &ObjectHandle,
        src_at: &Location,
        dst: &ObjectHandle,
        dst_at: &Location,
        args: &mut Args,
    ) -> Result<()> {
        on_pair(src, dst, Domain::Link, Verb::Copy, args, |c, s, d, args| {
            table(c.link(), Domain::Link, Verb::Copy)?.copy(s, src_at, d, dst_at, args)
        })
    }

    /// Move a link.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if the handles belong to different drivers
    pub fn link_move(
        &self,
        src: &ObjectHandle,
        src_at: &Location,
        dst: &ObjectHandle,
        dst_at: &Location,
        args: &mut Args,
    ) -> Result<()> {
        on_pair(src, dst, Domain::Link, Verb::Move, args, |c, s, d, args| {
            table(c.link(), Domain::Link, Verb::Move)?.move_link(s, src_at, d, dst_at, args)
        })
    }

    /// Query a link.
    pub fn link_get(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Link, Verb::Get, args, |c, obj, args| {
            table(c.link(), Domain::Link, Verb::Get)?.get(obj, at, op, args)
        })
    }

    /// Backend-specific link operation.
    pub fn link_specific(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Link, Verb::Specific, args, |c, obj, args| {
            table(c.link(), Domain::Link, Verb::Specific)?.specific(obj, at, op, args)
        })
    }

    /// Backend-private link operation.
    pub fn link_optional(
        &self,
        obj: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Link, Verb::Optional, args, |c, obj, args| {
            table(c.link(), Domain::Link, Verb::Optional)?.optional(obj, op, args)
        })
    }

    // =========================================================================
    // Object
    // =========================================================================

    /// Open whatever object lives at `at`.
    ///
    /// The returned handle carries the kind the driver reported, so it is
    /// accepted by that kind's domain.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if the driver reports a link or an untyped
    ///   object; no domain could close such a handle, so the opened state is
    ///   dropped
    pub fn object_open(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        args: &mut Args,
    ) -> Result<ObjectHandle> {
        let (state, kind) = on_handle(obj, Domain::Object, Verb::Open, args, |c, obj, args| {
            table(c.object(), Domain::Object, Verb::Open)?.open(obj, at, args)
        })?;
        wrap(obj.driver_id(), kind, obj.connector().clone(), state)
    }

    /// Wrap state a driver produced outside a dispatched create or open.
    ///
    /// The handle behaves like one returned by the matching create or open:
    /// it is routed to driver `id` and closed through the domain of `kind`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered, or `kind` is a link
    ///   or an untyped object
    pub fn object_register(
        &self,
        id: DriverId,
        kind: ObjectKind,
        state: Opaque,
    ) -> Result<ObjectHandle> {
        let connector = self.registry.get(id)?.clone();
        let handle = wrap(id, kind, connector, state)?;
        debug!(driver = handle.driver_name(), ?kind, "registered object");
        Ok(handle)
    }

    /// Copy an object to `dst_at` under `dst_name`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if the handles belong to different drivers
    pub fn object_copy(
        &self,
        src: &ObjectHandle,
        src_at: &Location,
        dst: &ObjectHandle,
        dst_at: &Location,
        dst_name: &str,
        args: &mut Args,
    ) -> Result<()> {
        on_pair(src, dst, Domain::Object, Verb::Copy, args, |c, s, d, args| {
            table(c.object(), Domain::Object, Verb::Copy)?
                .copy(s, src_at, d, dst_at, dst_name, args)
        })
    }

    /// Query an object.
    pub fn object_get(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Object, Verb::Get, args, |c, obj, args| {
            table(c.object(), Domain::Object, Verb::Get)?.get(obj, at, op, args)
        })
    }

    /// Backend-specific object operation.
    pub fn object_specific(
        &self,
        obj: &mut ObjectHandle,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Object, Verb::Specific, args, |c, obj, args| {
            table(c.object(), Domain::Object, Verb::Specific)?.specific(obj, at, op, args)
        })
    }

    /// Backend-private object operation.
    pub fn object_optional(
        &self,
        obj: &mut ObjectHandle,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        on_handle(obj, Domain::Object, Verb::Optional, args, |c, obj, args| {
            table(c.object(), Domain::Object, Verb::Optional)?.optional(obj, op, args)
        })
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Ask the owning driver to abandon `request`.
    ///
    /// # Errors
    ///
    /// - [`VolError::RequestUnsupported`] if the driver has no request support
    pub fn request_cancel(&self, request: &mut Request) -> Result<RequestStatus> {
        progress(request, "cancel", |ops, token| ops.cancel(token))
    }

    /// Poll `request` without blocking.
    ///
    /// # Errors
    ///
    /// - [`VolError::RequestUnsupported`] if the driver has no request support
    pub fn request_test(&self, request: &mut Request) -> Result<RequestStatus> {
        progress(request, "test", |ops, token| ops.test(token))
    }

    /// Block until `request` reaches a terminal status.
    ///
    /// # Errors
    ///
    /// - [`VolError::RequestUnsupported`] if the driver has no request support
    pub fn request_wait(&self, request: &mut Request) -> Result<RequestStatus> {
        progress(request, "wait", |ops, token| ops.wait(token))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_root<F>(
        &self,
        id: DriverId,
        verb: Verb,
        args: &mut Args,
        call: F,
    ) -> Result<ObjectHandle>
    where
        F: FnOnce(&dyn Connector, &mut Args) -> Result<Opaque>,
    {
        let connector = self.registry.get(id)?.clone();
        let result = call(connector.as_ref(), args);
        let state = settle(Domain::File, verb, id, &connector, args, result)?;
        Ok(ObjectHandle::new(id, ObjectKind::File, connector, state))
    }
}

/// The domain table, or the probe answer if the driver has none.
#[inline]
fn table<T: ?Sized>(ops: Option<&T>, domain: Domain, verb: Verb) -> Result<&T> {
    ops.ok_or(VolError::Unsupported { domain, verb })
}

fn accept(handle: &ObjectHandle, domain: Domain, verb: Verb) -> Result<()> {
    if domain.accepts(verb, handle.kind()) {
        Ok(())
    } else {
        Err(VolError::BadType(format!(
            "{domain} {verb} does not accept a {:?} handle",
            handle.kind()
        )))
    }
}

/// A handle for `state`, unless no domain could ever close it.
fn wrap(
    driver: DriverId,
    kind: ObjectKind,
    connector: Arc<dyn Connector>,
    state: Opaque,
) -> Result<ObjectHandle> {
    if !kind.is_openable() {
        warn!(driver = connector.name(), ?kind, "dropping state of a handle no domain closes");
        return Err(VolError::BadType(format!("no handle can be of kind {kind:?}")));
    }
    Ok(ObjectHandle::new(driver, kind, connector, state))
}

fn on_handle<R, F>(
    handle: &mut ObjectHandle,
    domain: Domain,
    verb: Verb,
    args: &mut Args,
    call: F,
) -> Result<R>
where
    F: FnOnce(&dyn Connector, &mut dyn Any, &mut Args) -> Result<R>,
{
    accept(handle, domain, verb)?;
    let driver = handle.driver_id();
    let connector = handle.connector().clone();
    let result = call(connector.as_ref(), handle.state_mut(), args);
    settle(domain, verb, driver, &connector, args, result)
}

fn create_under<F>(
    parent: &mut ObjectHandle,
    domain: Domain,
    verb: Verb,
    args: &mut Args,
    call: F,
) -> Result<ObjectHandle>
where
    F: FnOnce(&dyn Connector, &mut dyn Any, &mut Args) -> Result<Opaque>,
{
    let state = on_handle(parent, domain, verb, args, call)?;
    Ok(ObjectHandle::new(
        parent.driver_id(),
        domain.kind(),
        parent.connector().clone(),
        state,
    ))
}

fn on_pair<R, F>(
    src: &ObjectHandle,
    dst: &ObjectHandle,
    domain: Domain,
    verb: Verb,
    args: &mut Args,
    call: F,
) -> Result<R>
where
    F: FnOnce(&dyn Connector, &dyn Any, &dyn Any, &mut Args) -> Result<R>,
{
    if src.driver_id() != dst.driver_id() {
        return Err(VolError::BadType(format!(
            "{domain} {verb} across drivers ({} to {})",
            src.driver_id(),
            dst.driver_id()
        )));
    }
    accept(src, domain, verb)?;
    accept(dst, domain, verb)?;
    let connector = src.connector().clone();
    let result = call(connector.as_ref(), src.state(), dst.state(), args);
    settle(domain, verb, src.driver_id(), &connector, args, result)
}

fn close_handle<F>(handle: ObjectHandle, domain: Domain, args: &mut Args, call: F) -> Result<()>
where
    F: FnOnce(&dyn Connector, Opaque, &mut Args) -> Result<()>,
{
    if let Err(e) = accept(&handle, domain, Verb::Close) {
        warn!(
            driver = handle.driver_name(),
            kind = ?handle.kind(),
            %domain,
            "releasing handle closed through the wrong domain"
        );
        return Err(e);
    }
    let driver = handle.driver_id();
    let connector = handle.connector().clone();
    let result = call(connector.as_ref(), handle.into_state(), args);
    settle(domain, Verb::Close, driver, &connector, args, result)
}

/// Bind a deferred token to a request and log the outcome.
fn settle<T>(
    domain: Domain,
    verb: Verb,
    driver: DriverId,
    connector: &Arc<dyn Connector>,
    args: &mut Args,
    result: Result<T>,
) -> Result<T> {
    let token = args.take_token();
    match &result {
        Ok(_) => {
            if let Some(token) = token {
                trace!(driver = connector.name(), %domain, %verb, "call deferred");
                args.set_request(Request::new(driver, connector.clone(), token));
            } else {
                trace!(driver = connector.name(), %domain, %verb, "call completed");
            }
        }
        Err(e) if e.is_unsupported() => {
            trace!(driver = connector.name(), %domain, %verb, "not supported");
        }
        Err(e) => {
            debug!(driver = connector.name(), %domain, %verb, error = %e, "call failed");
        }
    }
    result
}

fn progress<F>(request: &mut Request, operation: &'static str, call: F) -> Result<RequestStatus>
where
    F: FnOnce(&dyn RequestOps, &mut dyn Any) -> Result<RequestStatus>,
{
    if request.status().is_terminal() {
        return Ok(request.status());
    }
    let connector = request.connector().clone();
    let ops = connector
        .request()
        .ok_or(VolError::RequestUnsupported { operation })?;
    let status = call(ops, request.token_mut())?;
    trace!(driver = connector.name(), operation, ?status, "request progressed");
    request.set_status(status);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Connector for Bare {
        fn name(&self) -> &str {
            "bare"
        }
    }

    fn handle(kind: ObjectKind) -> ObjectHandle {
        ObjectHandle::new(DriverId::from_raw(1), kind, Arc::new(Bare), Box::new(()))
    }

    #[test]
    fn dispatcher_is_copy_and_send() {
        fn assert_traits<T: Copy + Send + Sync>() {}
        assert_traits::<Dispatcher<'_>>();
    }

    #[test]
    fn missing_table_is_unsupported() {
        let registry = Registry::new();
        let d = registry.dispatcher();
        let mut g = handle(ObjectKind::Group);
        let err = d.group_get(&mut g, Opcode(0), &mut Args::empty()).unwrap_err();
        assert!(matches!(
            err,
            VolError::Unsupported {
                domain: Domain::Group,
                verb: Verb::Get
            }
        ));
    }

    #[test]
    fn wrong_kind_is_bad_type_before_the_driver_is_asked() {
        let registry = Registry::new();
        let d = registry.dispatcher();
        let mut g = handle(ObjectKind::Group);
        let err = d.dataset_read(&mut g, &mut [0u8; 4], &mut Args::empty()).unwrap_err();
        assert!(matches!(err, VolError::BadType(_)));
        let err = d.dataset_specific(&mut g, Opcode(1), &mut Args::empty()).unwrap_err();
        assert!(matches!(err, VolError::BadType(_)));

        let err = d.file_close(handle(ObjectKind::Dataset), &mut Args::empty()).unwrap_err();
        assert!(matches!(err, VolError::BadType(_)));
    }

    #[test]
    fn object_register_checks_driver_and_kind() {
        let mut registry = Registry::new();
        let id = registry.register(Bare).unwrap();
        let d = registry.dispatcher();

        let h = d.object_register(id, ObjectKind::Dataset, Box::new(7u8)).unwrap();
        assert_eq!(h.kind(), ObjectKind::Dataset);
        assert_eq!(h.driver_name(), "bare");
        assert_eq!(registry.ref_count(id).unwrap(), 2);

        for kind in [ObjectKind::Link, ObjectKind::Object] {
            let err = d.object_register(id, kind, Box::new(())).unwrap_err();
            assert!(matches!(err, VolError::BadType(_)));
        }
        let err = d
            .object_register(DriverId::from_raw(9), ObjectKind::Group, Box::new(()))
            .unwrap_err();
        assert!(matches!(err, VolError::BadType(_)));
    }

    #[test]
    fn unknown_driver_id_is_bad_type() {
        let registry = Registry::new();
        let err = registry
            .dispatcher()
            .file_open(DriverId::from_raw(9), "x", OpenFlags::empty(), &mut Args::empty())
            .unwrap_err();
        assert!(matches!(err, VolError::BadType(_)));
    }

    #[test]
    fn terminal_request_status_is_cached() {
        let registry = Registry::new();
        let mut r = Request::new(DriverId::from_raw(1), Arc::new(Bare), Box::new(()));
        assert!(matches!(
            registry.dispatcher().request_test(&mut r),
            Err(VolError::RequestUnsupported { operation: "test" })
        ));
        r.set_status(RequestStatus::Complete);
        assert_eq!(registry.dispatcher().request_wait(&mut r).unwrap(), RequestStatus::Complete);
    }
}
