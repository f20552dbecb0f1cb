//! Generic object operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, Location, ObjectKind, Opcode, Verb};

/// Operations on objects whose kind the caller does not know in advance.
pub trait ObjectOps: Send + Sync {
    /// Open whatever object lives at `at`, reporting its kind.
    ///
    /// The returned kind decides which domain later accepts the handle. It
    /// must be one some domain closes ([`ObjectKind::is_openable`]); the
    /// dispatcher drops the state of anything else.
    fn open(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        args: &mut Args,
    ) -> Result<(Opaque, ObjectKind)> {
        let _ = (obj, at, args);
        unsupported(Domain::Object, Verb::Open)
    }

    /// Copy the object at `src_at` to `dst_at` under `dst_name`.
    fn copy(
        &self,
        src: &dyn Any,
        src_at: &Location,
        dst: &dyn Any,
        dst_at: &Location,
        dst_name: &str,
        args: &mut Args,
    ) -> Result<()> {
        let _ = (src, src_at, dst, dst_at, dst_name, args);
        unsupported(Domain::Object, Verb::Copy)
    }

    /// Query an object (info record, comment).
    fn get(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Object, Verb::Get)
    }

    /// Backend-specific object operation (reference counting, visiting).
    fn specific(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Object, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, obj: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (obj, op, args);
        unsupported(Domain::Object, Verb::Optional)
    }
}
