//! Link operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Payload};
use crate::types::{Domain, Location, Opcode, Verb};

/// Operations on links, the named edges between groups and objects.
///
/// Links are not opened; every call addresses them through a [`Location`]
/// relative to an open object. `op` of [`create`](LinkOps::create) selects
/// the link flavor (hard, soft, external) as the backend defines it.
///
/// Copy and move receive both endpoints by shared reference; source and
/// destination may be the same object.
pub trait LinkOps: Send + Sync {
    /// Create a link at `at`.
    fn create(&self, obj: &mut dyn Any, at: &Location, op: Opcode, args: &mut Args) -> Result<()> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Link, Verb::Create)
    }

    /// Copy the link at `src_at` to `dst_at`.
    fn copy(
        &self,
        src: &dyn Any,
        src_at: &Location,
        dst: &dyn Any,
        dst_at: &Location,
        args: &mut Args,
    ) -> Result<()> {
        let _ = (src, src_at, dst, dst_at, args);
        unsupported(Domain::Link, Verb::Copy)
    }

    /// Move the link at `src_at` to `dst_at`.
    fn move_link(
        &self,
        src: &dyn Any,
        src_at: &Location,
        dst: &dyn Any,
        dst_at: &Location,
        args: &mut Args,
    ) -> Result<()> {
        let _ = (src, src_at, dst, dst_at, args);
        unsupported(Domain::Link, Verb::Move)
    }

    /// Query a link (target value, info record, name by index).
    fn get(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Link, Verb::Get)
    }

    /// Backend-specific link operation (delete, exists, iterate).
    fn specific(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Link, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, obj: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (obj, op, args);
        unsupported(Domain::Link, Verb::Optional)
    }
}
