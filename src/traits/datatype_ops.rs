//! Named datatype operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, Location, Opcode, Verb};

/// Operations on named (committed) datatypes.
///
/// [`create`](DatatypeOps::create) commits a transient type description,
/// carried in `args`, under `name`.
pub trait DatatypeOps: Send + Sync {
    /// Commit a datatype under `name`.
    fn create(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Datatype, Verb::Create)
    }

    /// Open the committed datatype named `name`.
    fn open(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Datatype, Verb::Open)
    }

    /// Query a committed datatype, such as its serialized description.
    fn get(&self, datatype: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (datatype, op, args);
        unsupported(Domain::Datatype, Verb::Get)
    }

    /// Backend-specific datatype operation.
    fn specific(&self, obj: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (obj, op, args);
        unsupported(Domain::Datatype, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, datatype: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (datatype, op, args);
        unsupported(Domain::Datatype, Verb::Optional)
    }

    /// Release a committed datatype handle.
    fn close(&self, datatype: Opaque, args: &mut Args) -> Result<()> {
        let _ = (datatype, args);
        unsupported(Domain::Datatype, Verb::Close)
    }
}
