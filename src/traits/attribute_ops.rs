//! Attribute operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, Location, Opcode, Verb};

/// Operations on attributes, the small named values attached to objects.
pub trait AttributeOps: Send + Sync {
    /// Attach an attribute named `name` to the object at `at`.
    fn create(
        &self,
        owner: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (owner, at, name, args);
        unsupported(Domain::Attribute, Verb::Create)
    }

    /// Open the attribute named `name` of the object at `at`.
    fn open(
        &self,
        owner: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (owner, at, name, args);
        unsupported(Domain::Attribute, Verb::Open)
    }

    /// Fill `buf` with the attribute value.
    fn read(&self, attr: &mut dyn Any, buf: &mut [u8], args: &mut Args) -> Result<()> {
        let _ = (attr, buf, args);
        unsupported(Domain::Attribute, Verb::Read)
    }

    /// Replace the attribute value with `buf`.
    fn write(&self, attr: &mut dyn Any, buf: &[u8], args: &mut Args) -> Result<()> {
        let _ = (attr, buf, args);
        unsupported(Domain::Attribute, Verb::Write)
    }

    /// Query attribute properties of the object at `at`.
    ///
    /// Queries such as "name of the n-th attribute" are asked of the owner,
    /// so `obj` may be any object.
    fn get(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Attribute, Verb::Get)
    }

    /// Backend-specific attribute operation (delete, rename, iterate).
    fn specific(
        &self,
        obj: &mut dyn Any,
        at: &Location,
        op: Opcode,
        args: &mut Args,
    ) -> Result<Payload> {
        let _ = (obj, at, op, args);
        unsupported(Domain::Attribute, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, attr: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (attr, op, args);
        unsupported(Domain::Attribute, Verb::Optional)
    }

    /// Release an open attribute.
    fn close(&self, attr: Opaque, args: &mut Args) -> Result<()> {
        let _ = (attr, args);
        unsupported(Domain::Attribute, Verb::Close)
    }
}
