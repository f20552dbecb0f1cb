//! Dataset operations.

use std::any::Any;

use super::unsupported;
use crate::error::Result;
use crate::payload::{Args, Opaque, Payload};
use crate::types::{Domain, Location, Opcode, Verb};

/// Operations on datasets, the typed multi-dimensional arrays of a file.
///
/// Read and write move raw bytes; element type and selection travel in
/// `args` as whatever the backend expects. Backends that keep datasets in
/// a file usually satisfy them through a
/// [`BlockDriver`](crate::BlockDriver).
pub trait DatasetOps: Send + Sync {
    /// Create a dataset named `name` under `parent`.
    fn create(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Dataset, Verb::Create)
    }

    /// Open the dataset named `name` under `parent`.
    fn open(
        &self,
        parent: &mut dyn Any,
        at: &Location,
        name: &str,
        args: &mut Args,
    ) -> Result<Opaque> {
        let _ = (parent, at, name, args);
        unsupported(Domain::Dataset, Verb::Open)
    }

    /// Fill `buf` from the dataset.
    fn read(&self, dataset: &mut dyn Any, buf: &mut [u8], args: &mut Args) -> Result<()> {
        let _ = (dataset, buf, args);
        unsupported(Domain::Dataset, Verb::Read)
    }

    /// Store `buf` into the dataset.
    fn write(&self, dataset: &mut dyn Any, buf: &[u8], args: &mut Args) -> Result<()> {
        let _ = (dataset, buf, args);
        unsupported(Domain::Dataset, Verb::Write)
    }

    /// Query a property of an open dataset (space, type, creation settings).
    fn get(&self, dataset: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (dataset, op, args);
        unsupported(Domain::Dataset, Verb::Get)
    }

    /// Backend-specific dataset operation, such as changing its extent.
    fn specific(&self, obj: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (obj, op, args);
        unsupported(Domain::Dataset, Verb::Specific)
    }

    /// Backend-private extension operation.
    fn optional(&self, dataset: &mut dyn Any, op: Opcode, args: &mut Args) -> Result<Payload> {
        let _ = (dataset, op, args);
        unsupported(Domain::Dataset, Verb::Optional)
    }

    /// Release an open dataset.
    fn close(&self, dataset: Opaque, args: &mut Args) -> Result<()> {
        let _ = (dataset, args);
        unsupported(Domain::Dataset, Verb::Close)
    }
}
