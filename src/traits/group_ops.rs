//! Group operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, Location, Opcode, Verb};

/// Operations on groups, the directory-like containers of a file.
///
/// `parent` is the backend state of the file or group the new group is
/// created in or opened from; `at` narrows where within it.
pub trait GroupOps: Send + Sync {
    /// Create a group named `name` under `parent`.
    fn create(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Group, Verb::Create)
    }

    /// Open the group named `name` under `parent`.
    fn open(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Group, Verb::Open)
    }

    /// Query a property of an open group.
    fn get(&self, group: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (group, op, args);
        unsupported(Domain::Group, Verb::Get)
    }

    /// Backend-specific group operation.
    fn specific(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Group, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, group: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (group, op, args);
        unsupported(Domain::Group, Verb::Optional)
    }

    /// Release an open group.
    fn close(&self, group: Opaque, args: &mut Args) -> Result<()> {
        let _ = (group, args);
        unsupported(Domain::Group, Verb::Close)
    }
}
