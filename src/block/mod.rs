//! # Block I/O
//!
//! The byte-addressable driver contract every higher-level structure sits on.
//!
//! ## Address Model
//!
//! A driver exposes one logical address space of 64-bit [`Address`]es.
//! Every request is bounded by the medium's native offset width
//! ([`OffsetWidth`](crate::OffsetWidth)); exceeding it is
//! [`VolError::Overflow`], detected before any I/O.
//!
//! ```text
//!   0                      logical EOF                 2^(N-1)
//!   ├──────── data ────────────┤──── reads yield zeros ────┤
//!                              └─ writes past EOF advance it
//! ```
//!
//! ## Components
//!
//! | Item | Role |
//! |------|------|
//! | [`Medium`] | The physical store (a file, or any seekable byte store) |
//! | [`BlockDriver`] | The driver contract: read/write/flush/extend/close |
//! | [`StdioFile`] | The reference driver over a [`Medium`] |
//!
//! ## Thread Safety
//!
//! Handles are `Send` but not shared: every operation takes `&mut self`, so
//! the position-tracking state is only ever touched by its owner.

use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{Address, IdentityKey};

mod stdio;

pub use stdio::StdioFile;

/// A physical store a block driver reads from and writes to.
///
/// `std::fs::File` implements it; tests and alternative stores can supply
/// their own.
pub trait Medium: Read + Write + Seek + Send {
    /// Current size of the store in bytes.
    fn size(&mut self) -> io::Result<u64>;

    /// Push written data through to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Grow (or shrink) the store without writing data.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl Medium for File {
    fn size(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

/// The block I/O driver contract.
///
/// Maps a logical address space onto one medium. Reads at or past the
/// logical end of file yield zeros without touching the medium; writes past
/// it advance it.
///
/// # Object Safety
///
/// Everything except [`close`](BlockDriver::close) is usable through
/// `dyn BlockDriver`. Opening is driver-specific; see
/// [`StdioFile::open`] for the reference driver.
pub trait BlockDriver: Send {
    /// Release the medium. The handle is gone whether or not this fails.
    ///
    /// # Errors
    ///
    /// - [`VolError::CloseError`] if the release reported a failure
    fn close(self) -> Result<()>
    where
        Self: Sized;

    /// One past the last valid address.
    fn eof(&self) -> u64;

    /// Identity of the underlying medium.
    fn identity(&self) -> IdentityKey;

    /// Fill `buf` with the bytes at `addr`, zeros beyond the logical EOF.
    ///
    /// # Errors
    ///
    /// - [`VolError::Overflow`] if the range exceeds the offset width
    /// - [`VolError::SeekError`] / [`VolError::ReadError`] on medium failure
    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<()>;

    /// Write all of `buf` at `addr`.
    ///
    /// # Errors
    ///
    /// - [`VolError::Overflow`] if the range exceeds the offset width
    /// - [`VolError::SeekError`] / [`VolError::WriteError`] on medium failure
    fn write(&mut self, addr: Address, buf: &[u8]) -> Result<()>;

    /// Force pending writes out. The next access always repositions.
    ///
    /// # Errors
    ///
    /// - [`VolError::WriteError`] if the flush failed
    fn flush(&mut self) -> Result<()>;

    /// Grow the address space to `new_eof` without meaningful data.
    ///
    /// The default writes zeros over the gap; drivers with a native way to
    /// grow the medium override it. Extending to or below the current EOF
    /// does nothing.
    fn extend(&mut self, new_eof: u64) -> Result<()> {
        const CHUNK: u64 = 64 * 1024;

        let eof = self.eof();
        if new_eof <= eof {
            return Ok(());
        }
        let zeros = vec![0u8; (new_eof - eof).min(CHUNK) as usize];
        let mut addr = eof;
        while addr < new_eof {
            let n = (new_eof - addr).min(CHUNK) as usize;
            self.write(Address::new(addr), &zeros[..n])?;
            addr += n as u64;
        }
        Ok(())
    }
}

/// Read until `buf` is full or the medium reports end of data.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Identity key of an open file.
#[cfg(unix)]
pub(crate) fn identity_of(file: &File, _path: &Path) -> io::Result<IdentityKey> {
    use std::os::unix::fs::MetadataExt;

    let meta = file.metadata()?;
    Ok(IdentityKey {
        device: meta.dev(),
        inode: meta.ino(),
    })
}

/// Identity key of an open file, derived from its canonical path.
#[cfg(not(unix))]
pub(crate) fn identity_of(_file: &File, path: &Path) -> io::Result<IdentityKey> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let canonical = std::fs::canonicalize(path)?;
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok(IdentityKey {
        device: 0,
        inode: hasher.finish(),
    })
}
