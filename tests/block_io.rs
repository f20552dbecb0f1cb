//! Block driver tests.
//!
//! These tests verify:
//! - Open flag handling against real files
//! - Zero-fill past the logical end of file
//! - Overflow detection before any I/O
//! - Seek elision for sequential access, and its reset rules
//! - Extend, flush and close semantics

mod common;

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use h5vol_backend::*;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    common::init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn rw_create() -> OpenFlags {
    OpenFlags::CREATE | OpenFlags::READ_WRITE
}

#[derive(Debug, Default)]
struct Counters {
    seeks: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    syncs: AtomicUsize,
}

impl Counters {
    fn seeks(&self) -> usize {
        self.seeks.load(Ordering::SeqCst)
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

/// In-memory medium that counts every call and can be told to misbehave.
#[derive(Debug)]
struct CountingMedium {
    inner: Cursor<Vec<u8>>,
    counters: Arc<Counters>,
    seek_budget: Option<usize>,
    read_budget: Option<usize>,
    write_budget: Option<usize>,
    sync_fails: bool,
    claimed_size: Option<u64>,
}

impl CountingMedium {
    fn new(data: Vec<u8>) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let medium = Self {
            inner: Cursor::new(data),
            counters: counters.clone(),
            seek_budget: None,
            read_budget: None,
            write_budget: None,
            sync_fails: false,
            claimed_size: None,
        };
        (medium, counters)
    }

    /// Seeks after the first `seeks` fail.
    fn failing_after(mut self, seeks: usize) -> Self {
        self.seek_budget = Some(seeks);
        self
    }

    /// Reads after the first `reads` fail.
    fn failing_reads_after(mut self, reads: usize) -> Self {
        self.read_budget = Some(reads);
        self
    }

    /// Writes after the first `writes` accept nothing.
    fn stalling_writes_after(mut self, writes: usize) -> Self {
        self.write_budget = Some(writes);
        self
    }

    fn failing_sync(mut self) -> Self {
        self.sync_fails = true;
        self
    }

    /// Report `size` bytes while holding fewer, so reads come up short.
    fn claiming_size(mut self, size: u64) -> Self {
        self.claimed_size = Some(size);
        self
    }
}

impl Read for CountingMedium {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let done = self.counters.reads.fetch_add(1, Ordering::SeqCst);
        if self.read_budget.is_some_and(|budget| done >= budget) {
            return Err(io::Error::other("read refused"));
        }
        self.inner.read(buf)
    }
}

impl Write for CountingMedium {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let done = self.counters.writes.fetch_add(1, Ordering::SeqCst);
        if self.write_budget.is_some_and(|budget| done >= budget) {
            return Ok(0);
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for CountingMedium {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let done = self.counters.seeks.fetch_add(1, Ordering::SeqCst);
        if self.seek_budget.is_some_and(|budget| done >= budget) {
            return Err(io::Error::other("seek refused"));
        }
        self.inner.seek(pos)
    }
}

impl Medium for CountingMedium {
    fn size(&mut self) -> io::Result<u64> {
        Ok(self
            .claimed_size
            .unwrap_or(self.inner.get_ref().len() as u64))
    }

    fn sync(&mut self) -> io::Result<()> {
        self.counters.syncs.fetch_add(1, Ordering::SeqCst);
        if self.sync_fails {
            return Err(io::Error::other("sync refused"));
        }
        Ok(())
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.inner.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

fn counting(
    data: Vec<u8>,
    flags: OpenFlags,
    config: DriverConfig,
) -> (StdioFile<CountingMedium>, Arc<Counters>) {
    let (medium, counters) = CountingMedium::new(data);
    let identity = IdentityKey { device: 0, inode: 1 };
    let file = StdioFile::from_medium(medium, identity, flags, config).unwrap();
    (file, counters)
}

fn over(medium: CountingMedium, flags: OpenFlags) -> StdioFile<CountingMedium> {
    let identity = IdentityKey { device: 0, inode: 9 };
    StdioFile::from_medium(medium, identity, flags, DriverConfig::default()).unwrap()
}

fn hundred_bytes() -> Vec<u8> {
    (0..100u8).collect()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_missing_without_create_fails() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("missing.bin");

    let err = StdioFile::open(&path, OpenFlags::READ_WRITE, DriverConfig::default()).unwrap_err();
    assert!(matches!(err, VolError::CantOpenFile { .. }));
}

#[test]
fn test_create_without_read_write_creates_nothing() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("never.bin");

    let err = StdioFile::open(&path, OpenFlags::CREATE, DriverConfig::default()).unwrap_err();
    assert!(matches!(err, VolError::CantOpenFile { .. }));
    assert!(!path.exists());
}

#[test]
fn test_exclusive_create_on_existing_path_fails() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("t.bin");
    std::fs::write(&path, b"x").unwrap();

    let flags = rw_create() | OpenFlags::EXCLUSIVE;
    let err = StdioFile::open(&path, flags, DriverConfig::default()).unwrap_err();
    assert!(matches!(err, VolError::FileExists { .. }));

    let flags = OpenFlags::CREATE | OpenFlags::EXCLUSIVE;
    let err = StdioFile::open(&path, flags, DriverConfig::default()).unwrap_err();
    assert!(matches!(err, VolError::FileExists { .. }));
}

#[test]
fn test_exclusive_create_on_fresh_path_succeeds() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("fresh.bin");

    let flags = rw_create() | OpenFlags::EXCLUSIVE;
    let file = StdioFile::open(&path, flags, DriverConfig::default()).unwrap();
    assert_eq!(file.eof(), 0);
    assert_eq!(file.path(), Some(path.as_path()));
    file.close().unwrap();
    assert!(path.exists());
}

#[test]
fn test_truncate_empties_existing_file() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("t.bin");
    std::fs::write(&path, b"old contents").unwrap();

    let file = StdioFile::open(
        &path,
        OpenFlags::READ_WRITE | OpenFlags::TRUNCATE,
        DriverConfig::default(),
    )
    .unwrap();
    assert_eq!(file.eof(), 0);
}

#[test]
fn test_open_starts_with_unknown_position() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("t.bin");
    std::fs::write(&path, b"abc").unwrap();

    let file = StdioFile::open(&path, OpenFlags::empty(), DriverConfig::default()).unwrap();
    assert_eq!(file.eof(), 3);
    assert_eq!(file.position(), 0);
    assert_eq!(file.last_op(), LastOp::Unknown);
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_write_read_reopen_scenario() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("t.bin");

    let mut file = StdioFile::open(&path, rw_create(), DriverConfig::default()).unwrap();
    file.write(Address::ZERO, b"0123456789").unwrap();
    assert_eq!(file.eof(), 10);

    let mut buf = [0xaau8; 20];
    file.read(Address::ZERO, &mut buf).unwrap();
    assert_eq!(&buf[..10], b"0123456789");
    assert_eq!(&buf[10..], &[0u8; 10]);
    file.close().unwrap();

    let mut file = StdioFile::open(&path, OpenFlags::empty(), DriverConfig::default()).unwrap();
    assert_eq!(file.eof(), 10);

    let mut tail = [0xaau8; 4];
    file.read(Address::new(8), &mut tail).unwrap();
    assert_eq!(&tail, b"89\0\0");

    let err = file.write(Address::ZERO, b"x").unwrap_err();
    assert!(matches!(err, VolError::WriteError { .. }));
    file.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
}

#[test]
fn test_write_past_eof_leaves_zero_gap() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("gap.bin");

    let mut file = StdioFile::open(&path, rw_create(), DriverConfig::default()).unwrap();
    file.write(Address::new(100), b"x").unwrap();
    assert_eq!(file.eof(), 101);

    let mut buf = vec![0xffu8; 101];
    file.read(Address::ZERO, &mut buf).unwrap();
    assert!(buf[..100].iter().all(|&b| b == 0));
    assert_eq!(buf[100], b'x');
}

#[test]
fn test_read_entirely_past_eof_touches_nothing() {
    let (mut file, counters) =
        counting(b"abc".to_vec(), OpenFlags::empty(), DriverConfig::default());

    let mut buf = [0xffu8; 8];
    file.read(Address::new(3), &mut buf).unwrap();
    assert_eq!(buf, [0u8; 8]);
    assert_eq!(counters.seeks(), 0);
    assert_eq!(counters.reads(), 0);
}

#[test]
fn test_zero_size_requests_do_no_io() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::READ_WRITE, DriverConfig::default());

    file.read(Address::new(5), &mut []).unwrap();
    file.write(Address::new(5), &[]).unwrap();
    assert_eq!(counters.seeks(), 0);
    assert_eq!(counters.reads(), 0);
    assert_eq!(counters.writes(), 0);
    assert_eq!(file.eof(), 100);
}

#[test]
fn test_write_on_read_only_handle_does_no_io() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::empty(), DriverConfig::default());

    let err = file.write(Address::ZERO, b"abc").unwrap_err();
    match err {
        VolError::WriteError { source, .. } => {
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(counters.seeks(), 0);
    assert_eq!(counters.writes(), 0);
}

// =============================================================================
// Overflow Tests
// =============================================================================

#[test]
fn test_overflow_is_detected_before_io() {
    let width = OffsetWidth::new(16).unwrap();
    let config = DriverConfig::builder().offset_width(width).build();
    let (mut file, counters) = counting(Vec::new(), OpenFlags::READ_WRITE, config);
    let limit = width.limit();

    let err = file.write(Address::new(limit - 1), b"x").unwrap_err();
    assert!(matches!(err, VolError::Overflow { limit: l, .. } if l == limit));

    let mut buf = [0u8; 8];
    let err = file.read(Address::new(limit - 8), &mut buf).unwrap_err();
    assert!(matches!(err, VolError::Overflow { .. }));

    let err = file.read(Address::new(limit), &mut []).unwrap_err();
    assert!(matches!(err, VolError::Overflow { .. }));

    assert_eq!(counters.seeks(), 0);
    assert_eq!(counters.reads(), 0);
    assert_eq!(counters.writes(), 0);
    assert_eq!(file.eof(), 0);
}

#[test]
fn test_request_just_below_limit_is_accepted() {
    let width = OffsetWidth::new(16).unwrap();
    let config = DriverConfig::builder().offset_width(width).build();
    let (mut file, _) = counting(Vec::new(), OpenFlags::READ_WRITE, config);

    file.write(Address::new(width.limit() - 2), b"x").unwrap();
    assert_eq!(file.eof(), width.limit() - 1);
}

#[test]
fn test_native_width_rejects_wrapping_ranges() {
    let (mut file, _) = counting(Vec::new(), OpenFlags::READ_WRITE, DriverConfig::default());

    let err = file.write(Address::new(u64::MAX), b"x").unwrap_err();
    assert!(matches!(err, VolError::Overflow { .. }));
}

// =============================================================================
// Seek Elision Tests
// =============================================================================

#[test]
fn test_sequential_reads_seek_once() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::empty(), DriverConfig::default());

    let mut buf = [0u8; 10];
    for i in 0..5u8 {
        file.read(Address::new(u64::from(i) * 10), &mut buf).unwrap();
        assert_eq!(buf[0], i * 10);
    }
    assert_eq!(counters.seeks(), 1);
    assert_eq!(file.position(), 50);
    assert_eq!(file.last_op(), LastOp::Read);
}

#[test]
fn test_switching_operation_forces_seek() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::READ_WRITE, DriverConfig::default());

    let mut buf = [0u8; 10];
    file.read(Address::ZERO, &mut buf).unwrap();
    file.write(Address::new(10), b"0123456789").unwrap();
    assert_eq!(counters.seeks(), 2);

    file.write(Address::new(20), b"0123456789").unwrap();
    assert_eq!(counters.seeks(), 2);

    file.read(Address::new(30), &mut buf).unwrap();
    assert_eq!(counters.seeks(), 3);
    assert_eq!(buf[0], 30);
}

#[test]
fn test_non_contiguous_read_seeks() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::empty(), DriverConfig::default());

    let mut buf = [0u8; 4];
    file.read(Address::ZERO, &mut buf).unwrap();
    file.read(Address::new(50), &mut buf).unwrap();
    assert_eq!(counters.seeks(), 2);
    assert_eq!(buf, [50, 51, 52, 53]);
}

#[test]
fn test_disabled_optimization_always_seeks() {
    let config = DriverConfig::builder().seek_optimization(false).build();
    let (mut file, counters) = counting(hundred_bytes(), OpenFlags::empty(), config);

    let mut buf = [0u8; 10];
    for i in 0..3u64 {
        file.read(Address::new(i * 10), &mut buf).unwrap();
    }
    assert_eq!(counters.seeks(), 3);
}

#[test]
fn test_flush_forces_next_seek() {
    let (mut file, counters) =
        counting(hundred_bytes(), OpenFlags::READ_WRITE, DriverConfig::default());

    let mut buf = [0u8; 10];
    file.read(Address::ZERO, &mut buf).unwrap();
    file.flush().unwrap();
    assert_eq!(file.last_op(), LastOp::Unknown);

    file.read(Address::new(10), &mut buf).unwrap();
    assert_eq!(counters.seeks(), 2);
    assert_eq!(counters.syncs(), 1);
}

#[test]
fn test_flush_without_sync() {
    let config = DriverConfig::builder().sync_on_flush(false).build();
    let (mut file, counters) = counting(hundred_bytes(), OpenFlags::READ_WRITE, config);

    file.flush().unwrap();
    assert_eq!(counters.syncs(), 0);
}

#[test]
fn test_failed_seek_resets_tracking() {
    let (medium, counters) = CountingMedium::new(hundred_bytes());
    let mut file = over(medium.failing_after(1), OpenFlags::empty());

    let mut buf = [0u8; 10];
    file.read(Address::ZERO, &mut buf).unwrap();
    assert_eq!(file.last_op(), LastOp::Read);

    let err = file.read(Address::new(60), &mut buf).unwrap_err();
    assert!(matches!(err, VolError::SeekError { address: 60, .. }));
    assert_eq!(file.last_op(), LastOp::Unknown);

    // The next request repositions even though it is contiguous.
    let err = file.read(Address::new(10), &mut buf).unwrap_err();
    assert!(matches!(err, VolError::SeekError { .. }));
    assert_eq!(counters.seeks(), 3);
}

// =============================================================================
// Medium Failure Tests
// =============================================================================

#[test]
fn test_failed_read_resets_tracking() {
    let (medium, counters) = CountingMedium::new(hundred_bytes());
    let mut file = over(medium.failing_reads_after(1), OpenFlags::empty());

    let mut buf = [0u8; 10];
    file.read(Address::ZERO, &mut buf).unwrap();
    assert_eq!(file.last_op(), LastOp::Read);

    let err = file.read(Address::new(10), &mut buf).unwrap_err();
    assert!(matches!(err, VolError::ReadError { address: 10, size: 10, .. }));
    assert_eq!(file.last_op(), LastOp::Unknown);
    assert_eq!(counters.seeks(), 1);

    // Contiguous, but the position is no longer trusted.
    file.read(Address::new(10), &mut buf).unwrap_err();
    assert_eq!(counters.seeks(), 2);
}

#[test]
fn test_write_underrun_is_write_error() {
    let (medium, counters) = CountingMedium::new(Vec::new());
    let mut file = over(medium.stalling_writes_after(1), OpenFlags::READ_WRITE);

    file.write(Address::ZERO, b"abc").unwrap();
    assert_eq!(file.eof(), 3);

    let err = file.write(Address::new(3), b"def").unwrap_err();
    match err {
        VolError::WriteError { address, size, source } => {
            assert_eq!((address, size), (3, 3));
            assert_eq!(source.kind(), io::ErrorKind::WriteZero);
        }
        other => panic!("expected WriteError, got {other:?}"),
    }
    assert_eq!(file.last_op(), LastOp::Unknown);
    assert_eq!(file.eof(), 3);

    file.write(Address::new(3), b"def").unwrap_err();
    assert_eq!(counters.seeks(), 2);
}

#[test]
fn test_short_read_is_zero_padded() {
    let (medium, counters) = CountingMedium::new(hundred_bytes());
    let mut file = over(medium.claiming_size(120), OpenFlags::empty());
    assert_eq!(file.eof(), 120);

    let mut buf = [0xffu8; 20];
    file.read(Address::new(90), &mut buf).unwrap();
    assert_eq!(&buf[..10], &(90..100u8).collect::<Vec<_>>()[..]);
    assert_eq!(&buf[10..], &[0u8; 10]);
    assert_eq!(file.last_op(), LastOp::Read);
    assert_eq!(file.position(), 100);

    // The medium stopped short of the requested end, so the next read seeks.
    let mut tail = [0xffu8; 5];
    file.read(Address::new(110), &mut tail).unwrap();
    assert_eq!(tail, [0u8; 5]);
    assert_eq!(counters.seeks(), 2);
}

#[test]
fn test_failed_sync_is_reported() {
    let (medium, counters) = CountingMedium::new(Vec::new());
    let mut file = over(medium.failing_sync(), OpenFlags::READ_WRITE);

    let err = file.flush().unwrap_err();
    assert!(matches!(err, VolError::WriteError { .. }));

    let err = file.close().unwrap_err();
    assert!(matches!(err, VolError::CloseError { .. }));
    assert_eq!(counters.syncs(), 2);
}

// =============================================================================
// Extend Tests
// =============================================================================

#[test]
fn test_extend_grows_without_writing() {
    let (mut file, counters) =
        counting(b"abc".to_vec(), OpenFlags::READ_WRITE, DriverConfig::default());

    file.extend(64).unwrap();
    assert_eq!(file.eof(), 64);
    assert_eq!(counters.writes(), 0);
    assert_eq!(file.get_ref().inner.get_ref().len(), 64);

    file.extend(10).unwrap();
    assert_eq!(file.eof(), 64);

    let mut buf = [0xffu8; 4];
    file.read(Address::new(60), &mut buf).unwrap();
    assert_eq!(buf, [0u8; 4]);
}

#[test]
fn test_extend_read_only_fails() {
    let (mut file, _) = counting(b"abc".to_vec(), OpenFlags::empty(), DriverConfig::default());

    let err = file.extend(10).unwrap_err();
    assert!(matches!(err, VolError::WriteError { .. }));
    assert_eq!(file.eof(), 3);
}

#[test]
fn test_extend_past_limit_overflows() {
    let width = OffsetWidth::new(8).unwrap();
    let config = DriverConfig::builder().offset_width(width).build();
    let (mut file, _) = counting(Vec::new(), OpenFlags::READ_WRITE, config);

    assert!(matches!(file.extend(width.limit()), Err(VolError::Overflow { .. })));
}

/// Driver relying on the default zero-fill extend.
struct VecDriver {
    data: Vec<u8>,
}

impl BlockDriver for VecDriver {
    fn close(self) -> Result<()> {
        Ok(())
    }

    fn eof(&self) -> u64 {
        self.data.len() as u64
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::default()
    }

    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<()> {
        buf.fill(0);
        let start = (addr.get() as usize).min(self.data.len());
        let end = (start + buf.len()).min(self.data.len());
        buf[..end - start].copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn write(&mut self, addr: Address, buf: &[u8]) -> Result<()> {
        let start = addr.get() as usize;
        if self.data.len() < start + buf.len() {
            self.data.resize(start + buf.len(), 0);
        }
        self.data[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_default_extend_zero_fills() {
    let mut driver = VecDriver { data: vec![1, 2, 3] };

    driver.extend(200_000).unwrap();
    assert_eq!(driver.eof(), 200_000);
    assert_eq!(&driver.data[..3], &[1, 2, 3]);
    assert!(driver.data[3..].iter().all(|&b| b == 0));

    driver.extend(5).unwrap();
    assert_eq!(driver.eof(), 200_000);
}

#[test]
fn test_block_driver_through_trait_object() {
    let mut driver: Box<dyn BlockDriver> = Box::new(VecDriver { data: Vec::new() });
    driver.write(Address::new(2), b"hi").unwrap();

    let mut buf = [0xffu8; 4];
    driver.read(Address::ZERO, &mut buf).unwrap();
    assert_eq!(&buf, b"\0\0hi");
}

// =============================================================================
// Close and Identity Tests
// =============================================================================

#[test]
fn test_close_syncs_writable_handles_only() {
    let (rw, rw_counters) = counting(Vec::new(), OpenFlags::READ_WRITE, DriverConfig::default());
    rw.close().unwrap();
    assert_eq!(rw_counters.syncs(), 1);

    let (ro, ro_counters) = counting(Vec::new(), OpenFlags::empty(), DriverConfig::default());
    ro.close().unwrap();
    assert_eq!(ro_counters.syncs(), 0);
}

#[test]
fn test_same_medium_detection() {
    let (_tmp, dir) = setup_temp_dir();
    let a = dir.join("a.bin");
    let b = dir.join("b.bin");

    let first = StdioFile::open(&a, rw_create(), DriverConfig::default()).unwrap();
    let again = StdioFile::open(&a, OpenFlags::empty(), DriverConfig::default()).unwrap();
    let other = StdioFile::open(&b, rw_create(), DriverConfig::default()).unwrap();

    assert!(first.is_same_medium(&again));
    assert!(!first.is_same_medium(&other));
    assert_eq!(first.identity(), again.identity());
}

#[test]
fn test_data_survives_close_and_reopen() {
    let (_tmp, dir) = setup_temp_dir();
    let path = dir.join("persist.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let mut file = StdioFile::open(&path, rw_create(), DriverConfig::default()).unwrap();
    for (i, chunk) in payload.chunks(1000).enumerate() {
        file.write(Address::new(i as u64 * 1000), chunk).unwrap();
    }
    file.close().unwrap();

    let mut file = StdioFile::open(&path, OpenFlags::empty(), DriverConfig::default()).unwrap();
    let mut back = vec![0u8; payload.len()];
    file.read(Address::ZERO, &mut back).unwrap();
    assert_eq!(back, payload);
}
