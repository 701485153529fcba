//! In-memory collaborators for host tests.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::mm::{UserAddr, UserMemory};
use crate::syscall::{SyscallError, SyscallResult};
use crate::vfs::{OpenFlags, Vfs};

/// A single mapped window of user memory; everything else faults.
pub struct MockUserMemory {
    base: usize,
    bytes: Mutex<Vec<u8>>,
    accesses: AtomicUsize,
}

impl MockUserMemory {
    pub fn new(base: usize, size: usize) -> Self {
        Self {
            base,
            bytes: Mutex::new(vec![0; size]),
            accesses: AtomicUsize::new(0),
        }
    }

    /// Write test data directly into the window.
    pub fn poke(&self, addr: usize, data: &[u8]) {
        let start = addr - self.base;
        self.bytes.lock().unwrap()[start..start + data.len()].copy_from_slice(data);
    }

    /// Read test data directly from the window.
    pub fn peek(&self, addr: usize, len: usize) -> Vec<u8> {
        let start = addr - self.base;
        self.bytes.lock().unwrap()[start..start + len].to_vec()
    }

    /// Number of copy primitive calls so far.
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn window(&self, addr: UserAddr, len: usize) -> SyscallResult<core::ops::Range<usize>> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        let size = self.bytes.lock().unwrap().len();
        let start = addr
            .as_usize()
            .checked_sub(self.base)
            .ok_or(SyscallError::Efault)?;
        let end = start.checked_add(len).ok_or(SyscallError::Efault)?;
        if end > size {
            return Err(SyscallError::Efault);
        }
        Ok(start..end)
    }
}

impl UserMemory for MockUserMemory {
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> SyscallResult<()> {
        let range = self.window(src, dst.len())?;
        dst.copy_from_slice(&self.bytes.lock().unwrap()[range]);
        Ok(())
    }

    fn copy_out(&self, src: &[u8], dst: UserAddr) -> SyscallResult<()> {
        let range = self.window(dst, src.len())?;
        self.bytes.lock().unwrap()[range].copy_from_slice(src);
        Ok(())
    }
}

/// An open mock file. Deliberately not `Clone`, so ownership is tracked.
#[derive(Debug, PartialEq, Eq)]
pub struct MockFile {
    pub id: usize,
    pub path: String,
}

/// A flat namespace of files plus a configurable working directory.
pub struct MockVfs {
    cwd: Mutex<Vec<u8>>,
    names: Mutex<BTreeSet<String>>,
    live: Mutex<BTreeMap<usize, String>>,
    next_id: AtomicUsize,
    close_error: Mutex<Option<SyscallError>>,
    getcwd_error: Mutex<Option<SyscallError>>,
}

impl MockVfs {
    pub fn new() -> Self {
        Self {
            cwd: Mutex::new(b"emu0:/".to_vec()),
            names: Mutex::new(BTreeSet::new()),
            live: Mutex::new(BTreeMap::new()),
            next_id: AtomicUsize::new(1),
            close_error: Mutex::new(None),
            getcwd_error: Mutex::new(None),
        }
    }

    pub fn with_files(names: &[&str]) -> Self {
        let vfs = Self::new();
        vfs.names
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| n.to_string()));
        vfs
    }

    pub fn set_cwd(&self, cwd: &[u8]) {
        *self.cwd.lock().unwrap() = cwd.to_vec();
    }

    pub fn fail_close_with(&self, err: SyscallError) {
        *self.close_error.lock().unwrap() = Some(err);
    }

    pub fn fail_getcwd_with(&self, err: SyscallError) {
        *self.getcwd_error.lock().unwrap() = Some(err);
    }

    /// Number of files opened and not yet closed.
    pub fn open_files(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    /// Path of every open file, by id.
    pub fn open_paths(&self) -> Vec<String> {
        self.live.lock().unwrap().values().cloned().collect()
    }
}

impl Vfs for MockVfs {
    type File = MockFile;

    fn open(&self, path: &CStr, flags: OpenFlags, _mode: u32) -> SyscallResult<MockFile> {
        flags.access_mode()?;
        let path = path.to_str().map_err(|_| SyscallError::Einval)?.to_string();

        let mut names = self.names.lock().unwrap();
        if !names.contains(&path) {
            if !flags.contains(OpenFlags::O_CREAT) {
                return Err(SyscallError::Enoent);
            }
            names.insert(path.clone());
        } else if flags.contains(OpenFlags::O_CREAT | OpenFlags::O_EXCL) {
            return Err(SyscallError::Eexist);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(id, path.clone());
        Ok(MockFile { id, path })
    }

    fn close(&self, file: MockFile) -> SyscallResult<()> {
        let removed = self.live.lock().unwrap().remove(&file.id);
        assert!(removed.is_some(), "double close of {:?}", file);
        match *self.close_error.lock().unwrap() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn getcwd(&self, buf: &mut [u8]) -> SyscallResult<usize> {
        if let Some(err) = *self.getcwd_error.lock().unwrap() {
            return Err(err);
        }
        let cwd = self.cwd.lock().unwrap();
        let n = cwd.len().min(buf.len());
        buf[..n].copy_from_slice(&cwd[..n]);
        Ok(n)
    }
}
