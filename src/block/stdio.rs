//! The reference block driver over a seekable medium.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::{BlockDriver, Medium, identity_of, read_full};
use crate::config::DriverConfig;
use crate::error::{Result, VolError};
use crate::types::{Address, IdentityKey, LastOp, OpenFlags};

/// Reference block driver: one handle over one [`Medium`].
///
/// Tracks the medium position and the last operation so that sequential
/// reads (or sequential writes) do not reposition the medium between calls.
/// Any failed or ambiguous operation, and every flush, resets the tracking
/// to [`LastOp::Unknown`], forcing a reposition on the next access.
///
/// # Example
///
/// ```rust
/// use h5vol_backend::{Address, BlockDriver, DriverConfig, OpenFlags, StdioFile};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = std::env::temp_dir().join(format!("h5vol-doc-{}", std::process::id()));
/// std::fs::create_dir_all(&dir)?;
/// let path = dir.join("t.bin");
/// # let _ = std::fs::remove_file(&path);
///
/// let mut file = StdioFile::open(&path, OpenFlags::CREATE | OpenFlags::READ_WRITE, DriverConfig::default())?;
/// file.write(Address::ZERO, b"0123456789")?;
///
/// let mut buf = [0xffu8; 20];
/// file.read(Address::ZERO, &mut buf)?;
/// assert_eq!(&buf[..10], b"0123456789");
/// assert_eq!(&buf[10..], &[0u8; 10]);
/// file.close()?;
/// # std::fs::remove_dir_all(&dir)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StdioFile<M: Medium = File> {
    medium: M,
    path: Option<PathBuf>,
    flags: OpenFlags,
    config: DriverConfig,
    identity: IdentityKey,
    position: u64,
    last_op: LastOp,
    eof: u64,
}

impl StdioFile<File> {
    /// Open the file at `path`.
    ///
    /// | Flags | Missing path | Existing path |
    /// |-------|--------------|---------------|
    /// | none | `CantOpenFile` | read-only |
    /// | `READ_WRITE` | `CantOpenFile` | read-write |
    /// | `READ_WRITE \| TRUNCATE` | `CantOpenFile` | read-write, emptied |
    /// | `CREATE \| READ_WRITE` | created | read-write |
    /// | `CREATE \| EXCLUSIVE \| READ_WRITE` | created atomically | `FileExists` |
    ///
    /// `CREATE` without `READ_WRITE` never creates anything.
    ///
    /// # Errors
    ///
    /// - [`VolError::CantOpenFile`] if the path is missing and cannot be
    ///   created, or the OS refuses to open it
    /// - [`VolError::FileExists`] if `CREATE | EXCLUSIVE` names an existing path
    pub fn open(path: &Path, flags: OpenFlags, config: DriverConfig) -> Result<Self> {
        let file = Self::open_file(path, flags)?;
        let identity = identity_of(&file, path).map_err(|source| VolError::CantOpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::build(file, Some(path.to_path_buf()), identity, flags, config)
    }

    fn open_file(path: &Path, flags: OpenFlags) -> Result<File> {
        let create = flags.contains(OpenFlags::CREATE);
        let read_write = flags.contains(OpenFlags::READ_WRITE);
        let cant_open = |source: io::Error| VolError::CantOpenFile {
            path: path.to_path_buf(),
            source,
        };

        if create && flags.contains(OpenFlags::EXCLUSIVE) {
            if !read_write {
                // Nothing can be created read-only; only report existence.
                return match std::fs::metadata(path) {
                    Ok(_) => Err(VolError::FileExists {
                        path: path.to_path_buf(),
                    }),
                    Err(source) => Err(cant_open(source)),
                };
            }
            return OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|source| {
                    if source.kind() == io::ErrorKind::AlreadyExists {
                        VolError::FileExists {
                            path: path.to_path_buf(),
                        }
                    } else {
                        cant_open(source)
                    }
                });
        }

        let mut options = OpenOptions::new();
        options.read(true);
        if read_write {
            options
                .write(true)
                .create(create)
                .truncate(flags.contains(OpenFlags::TRUNCATE));
        }
        options.open(path).map_err(cant_open)
    }
}

impl<M: Medium> StdioFile<M> {
    /// Wrap an already-open medium.
    ///
    /// The logical EOF starts at the medium's current size. `flags` decides
    /// whether writes are allowed (`READ_WRITE`); creation flags are ignored.
    ///
    /// # Errors
    ///
    /// - [`VolError::SeekError`] if the medium size cannot be determined
    pub fn from_medium(
        medium: M,
        identity: IdentityKey,
        flags: OpenFlags,
        config: DriverConfig,
    ) -> Result<Self> {
        Self::build(medium, None, identity, flags, config)
    }

    fn build(
        mut medium: M,
        path: Option<PathBuf>,
        identity: IdentityKey,
        flags: OpenFlags,
        config: DriverConfig,
    ) -> Result<Self> {
        let eof = match medium.size() {
            Ok(eof) => eof,
            Err(source) => {
                return Err(match path {
                    Some(path) => VolError::CantOpenFile { path, source },
                    None => VolError::SeekError { address: 0, source },
                });
            }
        };

        debug!(
            path = ?path,
            flags = flags.bits(),
            eof,
            device = identity.device,
            inode = identity.inode,
            "opened block handle"
        );

        Ok(Self {
            medium,
            path,
            flags,
            config,
            identity,
            position: 0,
            last_op: LastOp::Unknown,
            eof,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Tracked medium position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Last operation; [`LastOp::Unknown`] means the next access repositions.
    #[inline]
    pub fn last_op(&self) -> LastOp {
        self.last_op
    }

    /// Flags the handle was opened with.
    #[inline]
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// Configuration in effect.
    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Path the handle was opened from, if it was opened by path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Borrow the underlying medium.
    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    /// Returns `true` if both handles resolve to the same physical medium.
    pub fn is_same_medium<N: Medium>(&self, other: &StdioFile<N>) -> bool {
        self.identity == other.identity
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    #[inline]
    fn writable(&self) -> bool {
        self.flags.contains(OpenFlags::READ_WRITE)
    }

    /// Position the medium at `offset` unless the last `op` already left it there.
    fn reposition(&mut self, offset: u64, op: LastOp) -> Result<()> {
        if self.config.seek_optimization && self.last_op == op && self.position == offset {
            trace!(offset, ?op, "seek skipped");
            return Ok(());
        }
        trace!(offset, ?op, last_op = ?self.last_op, position = self.position, "seek");
        if let Err(source) = self.medium.seek(SeekFrom::Start(offset)) {
            self.last_op = LastOp::Unknown;
            warn!(offset, error = %source, "seek failed");
            return Err(VolError::SeekError {
                address: offset,
                source,
            });
        }
        self.position = offset;
        Ok(())
    }
}

impl<M: Medium> BlockDriver for StdioFile<M> {
    fn close(mut self) -> Result<()> {
        if self.writable() {
            if let Err(source) = self.medium.flush().and_then(|()| self.medium.sync()) {
                warn!(path = ?self.path, error = %source, "close failed");
                return Err(VolError::CloseError { source });
            }
        }
        debug!(path = ?self.path, eof = self.eof, "closed block handle");
        Ok(())
    }

    fn eof(&self) -> u64 {
        self.eof
    }

    fn identity(&self) -> IdentityKey {
        self.identity
    }

    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<()> {
        let size = buf.len();
        let end = addr.checked_end(size, self.config.offset_width)?;
        let offset = addr.get();

        if size == 0 {
            return Ok(());
        }
        if offset >= self.eof {
            trace!(offset, size, eof = self.eof, "read past eof");
            buf.fill(0);
            return Ok(());
        }

        self.reposition(offset, LastOp::Read)?;

        // Zeros past the logical EOF; the medium is only asked for the rest.
        let mut want = size;
        if end > self.eof {
            let beyond = (end - self.eof) as usize;
            want -= beyond;
            buf[want..].fill(0);
        }

        let n = match read_full(&mut self.medium, &mut buf[..want]) {
            Ok(n) => n,
            Err(source) => {
                self.last_op = LastOp::Unknown;
                warn!(offset, size, error = %source, "read failed");
                return Err(VolError::ReadError {
                    address: offset,
                    size,
                    source,
                });
            }
        };
        if n < want {
            buf[n..want].fill(0);
        }

        self.position = offset + n as u64;
        self.last_op = LastOp::Read;
        Ok(())
    }

    fn write(&mut self, addr: Address, buf: &[u8]) -> Result<()> {
        let size = buf.len();
        let end = addr.checked_end(size, self.config.offset_width)?;
        let offset = addr.get();

        if !self.writable() {
            return Err(VolError::WriteError {
                address: offset,
                size,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "handle is read-only"),
            });
        }
        if size == 0 {
            return Ok(());
        }

        self.reposition(offset, LastOp::Write)?;

        if let Err(source) = self.medium.write_all(buf) {
            self.last_op = LastOp::Unknown;
            warn!(offset, size, error = %source, "write failed");
            return Err(VolError::WriteError {
                address: offset,
                size,
                source,
            });
        }

        self.position = end;
        self.last_op = LastOp::Write;
        self.eof = self.eof.max(end);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // The position after a flush is not guaranteed.
        self.last_op = LastOp::Unknown;

        let sync = self.config.sync_on_flush && self.writable();
        let result = self
            .medium
            .flush()
            .and_then(|()| if sync { self.medium.sync() } else { Ok(()) });
        result.map_err(|source| {
            warn!(path = ?self.path, error = %source, "flush failed");
            VolError::WriteError {
                address: 0,
                size: 0,
                source,
            }
        })
    }

    fn extend(&mut self, new_eof: u64) -> Result<()> {
        Address::new(new_eof).checked_end(0, self.config.offset_width)?;
        if new_eof <= self.eof {
            return Ok(());
        }
        if !self.writable() {
            return Err(VolError::WriteError {
                address: self.eof,
                size: 0,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "handle is read-only"),
            });
        }
        if let Err(source) = self.medium.set_len(new_eof) {
            self.last_op = LastOp::Unknown;
            return Err(VolError::WriteError {
                address: self.eof,
                size: 0,
                source,
            });
        }
        debug!(from = self.eof, to = new_eof, "extended block handle");
        self.eof = new_eof;
        Ok(())
    }
}
