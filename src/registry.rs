//! Driver registry: names connectors and hands out driver ids.
//!
//! The registry is an ordinary value owned by the application. It performs
//! no locking of its own; wrap it in a lock if several threads register
//! drivers. Lookups borrow it shared, registration borrows it exclusively.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::{Result, VolError};
use crate::payload::Args;
use crate::traits::Connector;

/// Identifier of a registered driver.
///
/// Ids are never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverId(u64);

impl DriverId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Lifecycle {
    #[default]
    Registered,
    Initialized,
    Terminated,
}

struct Entry {
    connector: Arc<dyn Connector>,
    lifecycle: Lifecycle,
}

/// Set of registered drivers.
///
/// # Example
///
/// ```rust
/// use h5vol_backend::{Connector, Registry, VolError};
///
/// struct Native;
/// impl Connector for Native {
///     fn name(&self) -> &str { "native" }
/// }
///
/// let mut registry = Registry::new();
/// let id = registry.register(Native).unwrap();
/// assert!(registry.is_registered("native"));
/// assert_eq!(registry.lookup("native"), Some(id));
///
/// // Names are unique.
/// assert!(matches!(registry.register(Native), Err(VolError::CantRegister { .. })));
///
/// registry.unregister(id).unwrap();
/// assert!(!registry.is_registered("native"));
/// ```
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<DriverId, Entry>,
    next_id: u64,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `connector` under its own name.
    ///
    /// # Errors
    ///
    /// - [`VolError::CantRegister`] if the name is empty or already taken
    pub fn register<C: Connector + 'static>(&mut self, connector: C) -> Result<DriverId> {
        self.register_shared(Arc::new(connector))
    }

    /// Register a connector that is already shared.
    ///
    /// # Errors
    ///
    /// - [`VolError::CantRegister`] if the name is empty or already taken
    pub fn register_shared(&mut self, connector: Arc<dyn Connector>) -> Result<DriverId> {
        let name = connector.name();
        if name.is_empty() {
            return Err(VolError::CantRegister {
                name: String::new(),
                reason: "driver name is empty",
            });
        }
        if self.lookup(name).is_some() {
            warn!(driver = name, "duplicate driver registration refused");
            return Err(VolError::CantRegister {
                name: name.to_string(),
                reason: "a driver with the same name is already registered",
            });
        }

        self.next_id += 1;
        let id = DriverId(self.next_id);
        info!(driver = name, %id, "registered driver");
        self.entries.insert(
            id,
            Entry {
                connector,
                lifecycle: Lifecycle::Registered,
            },
        );
        Ok(id)
    }

    /// Remove a driver.
    ///
    /// Handles and requests already produced by the driver stay usable; the
    /// driver itself is dropped once the last of them is gone.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    pub fn unregister(&mut self, id: DriverId) -> Result<()> {
        let entry = self
            .entries
            .remove(&id)
            .ok_or_else(|| VolError::BadType(format!("{id} is not a registered driver")))?;
        info!(
            driver = entry.connector.name(),
            %id,
            open = Arc::strong_count(&entry.connector) - 1,
            "unregistered driver"
        );
        Ok(())
    }

    /// Returns `true` if a driver named `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Find the id of the driver named `name`.
    pub fn lookup(&self, name: &str) -> Option<DriverId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.connector.name() == name)
            .map(|(id, _)| *id)
    }

    /// The connector registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    pub fn get(&self, id: DriverId) -> Result<&Arc<dyn Connector>> {
        self.entry(id).map(|entry| &entry.connector)
    }

    /// Name of the driver registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    pub fn driver_name(&self, id: DriverId) -> Result<&str> {
        self.entry(id).map(|entry| entry.connector.name())
    }

    /// Number of live references to the driver: the registration itself plus
    /// every open handle and request it produced.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    pub fn ref_count(&self, id: DriverId) -> Result<usize> {
        self.entry(id).map(|entry| Arc::strong_count(&entry.connector))
    }

    /// Number of registered drivers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no driver is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = DriverId> + '_ {
        self.entries.keys().copied()
    }

    /// Visit drivers in registration order until `visit` breaks.
    ///
    /// Returns the id the visit stopped at, or `None` if every driver was
    /// visited.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadIterator`] if `visit` fails; the failure is kept in
    ///   the message
    pub fn iterate<F>(&self, mut visit: F) -> Result<Option<DriverId>>
    where
        F: FnMut(DriverId, &dyn Connector) -> Result<ControlFlow<()>>,
    {
        for (id, entry) in &self.entries {
            match visit(*id, entry.connector.as_ref()) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => return Ok(Some(*id)),
                Err(e) => return Err(VolError::BadIterator(format!("at {id}: {e}"))),
            }
        }
        Ok(None)
    }

    /// Run the driver's initialize hook. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    /// - whatever the hook reports; the driver stays uninitialized
    pub fn initialize(&mut self, id: DriverId, args: &mut Args) -> Result<()> {
        let entry = self.entry_mut(id)?;
        if entry.lifecycle != Lifecycle::Registered {
            return Ok(());
        }
        entry.connector.initialize(args)?;
        entry.lifecycle = Lifecycle::Initialized;
        debug!(driver = entry.connector.name(), %id, "initialized driver");
        Ok(())
    }

    /// Run the driver's terminate hook. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// - [`VolError::BadType`] if `id` is not registered
    /// - whatever the hook reports
    pub fn terminate(&mut self, id: DriverId, args: &mut Args) -> Result<()> {
        let entry = self.entry_mut(id)?;
        if entry.lifecycle == Lifecycle::Terminated {
            return Ok(());
        }
        entry.lifecycle = Lifecycle::Terminated;
        debug!(driver = entry.connector.name(), %id, "terminating driver");
        entry.connector.terminate(args)
    }

    /// A dispatcher routing through this registry.
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn entry(&self, id: DriverId) -> Result<&Entry> {
        self.entries
            .get(&id)
            .ok_or_else(|| VolError::BadType(format!("{id} is not a registered driver")))
    }

    fn entry_mut(&mut self, id: DriverId) -> Result<&mut Entry> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| VolError::BadType(format!("{id} is not a registered driver")))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(id, entry)| (id.get(), entry.connector.name())),
            )
            .finish()
    }
}
