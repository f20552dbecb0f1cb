//! Core types shared by the block driver, the registry and the dispatcher.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::{Result, VolError};

/// Flags for opening a medium, combinable with `|`.
///
/// The empty set opens an existing medium read-only.
///
/// ```rust
/// use h5vol_backend::OpenFlags;
///
/// let flags = OpenFlags::CREATE | OpenFlags::READ_WRITE;
/// assert!(flags.contains(OpenFlags::CREATE));
/// assert!(!flags.contains(OpenFlags::EXCLUSIVE));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFlags(u8);

impl OpenFlags {
    /// Create the medium if it does not exist (requires `READ_WRITE`).
    pub const CREATE: Self = Self(0b0001);
    /// Open for reading and writing.
    pub const READ_WRITE: Self = Self(0b0010);
    /// Truncate an existing medium to zero length (requires `READ_WRITE`).
    pub const TRUNCATE: Self = Self(0b0100);
    /// Together with `CREATE`, fail if the medium already exists.
    pub const EXCLUSIVE: Self = Self(0b1000);

    /// No flags: open an existing medium read-only.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build flags from raw bits, dropping unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Raw bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for OpenFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Width in bits of the medium's native signed offset type.
///
/// Addresses and `address + size` must stay strictly below `2^(bits-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct OffsetWidth(u32);

impl OffsetWidth {
    /// 64-bit offsets, as used by `std::io::Seek`.
    pub const NATIVE: Self = Self(64);

    /// Create a width; only 2 through 64 bits are meaningful.
    pub fn new(bits: u32) -> Result<Self> {
        if (2..=64).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(VolError::Args(format!(
                "offset width must be between 2 and 64 bits, got {bits}"
            )))
        }
    }

    /// Number of bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Exclusive upper bound for addresses: `2^(bits-1)`.
    #[inline]
    pub const fn limit(self) -> u64 {
        1u64 << (self.0 - 1)
    }
}

impl Default for OffsetWidth {
    fn default() -> Self {
        Self::NATIVE
    }
}

impl TryFrom<u32> for OffsetWidth {
    type Error = VolError;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<OffsetWidth> for u32 {
    fn from(width: OffsetWidth) -> u32 {
        width.0
    }
}

/// A backend-independent byte offset into a medium's address space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(u64);

impl Address {
    /// The first byte of the medium.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw offset.
    #[inline]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Raw offset.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Validate the range `[self, self + size)` against `width` and return
    /// its exclusive end.
    ///
    /// This is the only overflow check in the crate; it runs before any I/O.
    ///
    /// # Errors
    ///
    /// - [`VolError::Overflow`] if the start, the end, or the addition itself
    ///   reaches the limit.
    pub fn checked_end(self, size: usize, width: OffsetWidth) -> Result<u64> {
        let limit = width.limit();
        let overflow = || VolError::Overflow {
            address: self.0,
            size: size as u64,
            limit,
        };
        if self.0 >= limit {
            return Err(overflow());
        }
        let end = u64::try_from(size)
            .ok()
            .and_then(|size| self.0.checked_add(size))
            .ok_or_else(overflow)?;
        if end >= limit {
            return Err(overflow());
        }
        Ok(end)
    }
}

impl From<u64> for Address {
    fn from(offset: u64) -> Self {
        Self(offset)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> u64 {
        addr.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Identifies the physical medium behind a handle (device + inode on Unix).
///
/// Two handles with equal keys refer to the same medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentityKey {
    /// Device (or volume) identifier.
    pub device: u64,
    /// Inode (or file index) within the device.
    pub inode: u64,
}

/// The last operation performed on a block handle.
///
/// Used to elide repositioning for sequential access of the same kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LastOp {
    /// The position is not trusted; the next access repositions.
    #[default]
    Unknown,
    /// The last successful operation was a read.
    Read,
    /// The last successful operation was a write.
    Write,
}

/// Kind of object an [`ObjectHandle`](crate::ObjectHandle) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// A container file.
    File,
    /// A group of objects.
    Group,
    /// A dataset.
    Dataset,
    /// An attribute attached to an object.
    Attribute,
    /// A committed datatype.
    Datatype,
    /// A link.
    Link,
    /// An object of unspecified kind.
    Object,
}

impl ObjectKind {
    /// Returns `true` if an open handle may be of this kind, that is, some
    /// domain closes it. Links and untyped objects are only ever addressed
    /// through a [`Location`].
    pub const fn is_openable(self) -> bool {
        !matches!(self, ObjectKind::Link | ObjectKind::Object)
    }
}

/// Operation domain of a dispatched call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// File operations.
    File,
    /// Group operations.
    Group,
    /// Dataset operations.
    Dataset,
    /// Attribute operations.
    Attribute,
    /// Committed datatype operations.
    Datatype,
    /// Link operations.
    Link,
    /// Generic object operations.
    Object,
}

impl Domain {
    /// All seven domains in declaration order.
    pub const ALL: [Domain; 7] = [
        Domain::File,
        Domain::Group,
        Domain::Dataset,
        Domain::Attribute,
        Domain::Datatype,
        Domain::Link,
        Domain::Object,
    ];

    /// The object kind this domain creates and closes.
    pub const fn kind(self) -> ObjectKind {
        match self {
            Domain::File => ObjectKind::File,
            Domain::Group => ObjectKind::Group,
            Domain::Dataset => ObjectKind::Dataset,
            Domain::Attribute => ObjectKind::Attribute,
            Domain::Datatype => ObjectKind::Datatype,
            Domain::Link => ObjectKind::Link,
            Domain::Object => ObjectKind::Object,
        }
    }

    /// Verbs this domain accepts, in dispatch order.
    pub const fn verbs(self) -> &'static [Verb] {
        match self {
            Domain::File | Domain::Group | Domain::Datatype => &[
                Verb::Create,
                Verb::Open,
                Verb::Get,
                Verb::Specific,
                Verb::Optional,
                Verb::Close,
            ],
            Domain::Dataset | Domain::Attribute => &[
                Verb::Create,
                Verb::Open,
                Verb::Read,
                Verb::Write,
                Verb::Get,
                Verb::Specific,
                Verb::Optional,
                Verb::Close,
            ],
            Domain::Link => &[
                Verb::Create,
                Verb::Copy,
                Verb::Move,
                Verb::Get,
                Verb::Specific,
                Verb::Optional,
            ],
            Domain::Object => &[
                Verb::Open,
                Verb::Copy,
                Verb::Get,
                Verb::Specific,
                Verb::Optional,
            ],
        }
    }

    /// Returns `true` if `verb` addresses its target through a
    /// [`Location`], so the handle passed in only anchors the lookup.
    ///
    /// Link and object operations always act on a location; those domains
    /// have no handles of their own.
    pub const fn takes_location(self, verb: Verb) -> bool {
        match self {
            Domain::Link | Domain::Object => true,
            Domain::File => false,
            Domain::Group => matches!(verb, Verb::Create | Verb::Open | Verb::Specific),
            Domain::Attribute => {
                matches!(verb, Verb::Create | Verb::Open | Verb::Get | Verb::Specific)
            }
            Domain::Dataset | Domain::Datatype => matches!(verb, Verb::Create | Verb::Open),
        }
    }

    /// Whether `verb` on a handle of `kind` is a valid combination.
    ///
    /// A verb without a location acts on the handle itself, which must then
    /// be of this domain's kind. Located verbs accept any kind.
    pub fn accepts(self, verb: Verb, kind: ObjectKind) -> bool {
        self.takes_location(verb) || kind == self.kind()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::File => "file",
            Domain::Group => "group",
            Domain::Dataset => "dataset",
            Domain::Attribute => "attribute",
            Domain::Datatype => "datatype",
            Domain::Link => "link",
            Domain::Object => "object",
        };
        f.write_str(s)
    }
}

/// Lifecycle or data-movement verb of a dispatched call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verb {
    /// Create a new object (commit, for datatypes).
    Create,
    /// Open an existing object.
    Open,
    /// Read raw data.
    Read,
    /// Write raw data.
    Write,
    /// Query information.
    Get,
    /// Domain-defined operation outside the common verbs.
    Specific,
    /// Backend-defined extension.
    Optional,
    /// Release the object.
    Close,
    /// Copy a link or object.
    Copy,
    /// Move a link.
    Move,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Create => "create",
            Verb::Open => "open",
            Verb::Read => "read",
            Verb::Write => "write",
            Verb::Get => "get",
            Verb::Specific => "specific",
            Verb::Optional => "optional",
            Verb::Close => "close",
            Verb::Copy => "copy",
            Verb::Move => "move",
        };
        f.write_str(s)
    }
}

/// Backend-defined sub-operation code for `Get`, `Specific` and `Optional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opcode(pub u32);

/// Where, relative to a handle, an operation applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// The object the handle refers to.
    #[default]
    SelfRef,
    /// A named member relative to the handle.
    ByName(String),
    /// The `index`-th member of the group `group` relative to the handle.
    ByIndex {
        /// Group path relative to the handle.
        group: String,
        /// Position within the group.
        index: u64,
    },
    /// An object at a medium address.
    ByAddress(Address),
}

/// State of an asynchronous request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestStatus {
    /// The operation is still in flight.
    #[default]
    Pending,
    /// The operation finished successfully.
    Complete,
    /// The operation was canceled before completion.
    Canceled,
    /// The operation finished with an error.
    Failed,
}

impl RequestStatus {
    /// Returns `true` for `Complete`, `Canceled` and `Failed`.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}
