//! File system calls: `__getcwd`, `open`, `close`
//!
//! Each handler validates and copies its arguments, calls the file layer
//! and the descriptor table, and produces a single outcome.

use alloc::vec::Vec;

use log::{debug, warn};

use crate::fd::Fd;
use crate::kernel::Kernel;
use crate::mm::{UserAddr, UserMemory};
use crate::vfs::{OpenFlags, Vfs};

use super::copy;
use super::error::{SyscallError, SyscallResult};

/// Longest path the kernel handles, excluding the terminator.
pub const PATH_MAX: usize = 1024;

/// Longest name accepted by `open`, excluding the terminator.
pub const NAME_MAX: usize = 255;

/// Copy the current directory path into `buf`.
///
/// Copies `min(path length, buflen)` bytes and returns that count. No
/// terminator is written.
pub fn sys_getcwd<V, M>(kernel: &Kernel<V, M>, buf: UserAddr, buflen: usize) -> SyscallResult<usize>
where
    V: Vfs,
    M: UserMemory,
{
    let mut path = Vec::new();
    path.try_reserve_exact(PATH_MAX + 1)
        .map_err(|_| SyscallError::Enomem)?;
    path.resize(PATH_MAX + 1, 0);

    let got = kernel
        .vfs()
        .getcwd(&mut path[..PATH_MAX])
        .inspect_err(|err| debug!("getcwd: lookup failed: {}", err))?;

    // The last byte is never written, so the path is always terminated.
    let written = &path[..got.min(PATH_MAX)];
    let len = written.iter().position(|&b| b == 0).unwrap_or(written.len());
    let count = len.min(buflen);

    copy::copy_out_bytes(kernel.user_memory(), &path[..count], buf)
        .inspect_err(|err| debug!("getcwd: copyout to {} failed: {}", buf, err))?;

    Ok(count)
}

/// Open the file named by the string at `path` and give it a descriptor.
pub fn sys_open<V, M>(
    kernel: &Kernel<V, M>,
    path: UserAddr,
    flags: OpenFlags,
    mode: u32,
) -> SyscallResult<Fd>
where
    V: Vfs,
    M: UserMemory,
{
    flags.access_mode()?;

    let name = copy::copy_in_string(kernel.user_memory(), path, NAME_MAX + 1)?;
    if name.is_truncated() {
        debug!("open: name at {} longer than {} bytes", path, NAME_MAX);
        return Err(SyscallError::Enametoolong);
    }

    let file = kernel
        .vfs()
        .open(name.as_c_str(), flags, mode)
        .inspect_err(|err| debug!("open: {:?}: {}", name, err))?;

    match kernel.files().allocate(file) {
        Ok(fd) => Ok(fd),
        Err((err, file)) => {
            debug!("open: {:?}: no descriptor: {}", name, err);
            if let Err(close_err) = kernel.vfs().close(file) {
                warn!("open: releasing {:?} failed: {}", name, close_err);
            }
            Err(err.into())
        }
    }
}

/// Close descriptor `fd` and release its file.
///
/// The descriptor is free once this returns, even if the release fails.
pub fn sys_close<V, M>(kernel: &Kernel<V, M>, fd: i32) -> SyscallResult<()>
where
    V: Vfs,
    M: UserMemory,
{
    if Fd::new(fd).is_none() {
        return Err(SyscallError::Ebadf);
    }

    let file = kernel.files().deallocate(fd)?;

    kernel
        .vfs()
        .close(file)
        .inspect_err(|err| debug!("close: releasing fd {} failed: {}", fd, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::{FD_MAX, FD_MIN, FD_SLOTS};
    use crate::mm::PAGE_SIZE;
    use crate::mock::{MockFile, MockUserMemory, MockVfs};

    const BASE: usize = 0x0040_0000;
    const PATH: usize = BASE;
    const OUT: usize = BASE + 0x800;

    type TestKernel = Kernel<MockVfs, MockUserMemory>;

    fn kernel_with(files: &[&str]) -> TestKernel {
        Kernel::new(
            MockVfs::with_files(files),
            MockUserMemory::new(BASE, 2 * PAGE_SIZE),
        )
    }

    fn open(kernel: &TestKernel, name: &str) -> SyscallResult<Fd> {
        let mut bytes = name.as_bytes().to_vec();
        bytes.push(0);
        kernel.user_memory().poke(PATH, &bytes);
        sys_open(kernel, UserAddr::new(PATH), OpenFlags::empty(), 0)
    }

    #[test]
    fn test_getcwd_short_buffer() {
        let kernel = kernel_with(&[]);
        kernel.vfs().set_cwd(b"emu0:/home/user");
        kernel.user_memory().poke(OUT, &[0xAA; 8]);

        assert_eq!(sys_getcwd(&kernel, UserAddr::new(OUT), 4), Ok(4));
        assert_eq!(kernel.user_memory().peek(OUT, 5), b"emu0\xAA");
    }

    #[test]
    fn test_getcwd_long_buffer() {
        let kernel = kernel_with(&[]);
        kernel.vfs().set_cwd(b"emu0:/bin");
        kernel.user_memory().poke(OUT, &[0xAA; 16]);

        assert_eq!(sys_getcwd(&kernel, UserAddr::new(OUT), 64), Ok(9));
        // No terminator is written after the path.
        assert_eq!(kernel.user_memory().peek(OUT, 10), b"emu0:/bin\xAA");
    }

    #[test]
    fn test_getcwd_length_stops_at_nul() {
        let kernel = kernel_with(&[]);
        kernel.vfs().set_cwd(b"emu0:\0junk");
        assert_eq!(sys_getcwd(&kernel, UserAddr::new(OUT), 64), Ok(5));
    }

    #[test]
    fn test_getcwd_clamped_to_path_max() {
        let kernel = Kernel::new(MockVfs::new(), MockUserMemory::new(BASE, 2 * PAGE_SIZE));
        kernel.vfs().set_cwd(&[b'a'; PATH_MAX + 50]);
        assert_eq!(sys_getcwd(&kernel, UserAddr::new(BASE), 4096), Ok(PATH_MAX));
    }

    #[test]
    fn test_getcwd_errors_pass_through() {
        let kernel = kernel_with(&[]);
        kernel.vfs().fail_getcwd_with(SyscallError::Enoent);
        assert_eq!(sys_getcwd(&kernel, UserAddr::new(OUT), 64), Err(SyscallError::Enoent));

        let kernel = kernel_with(&[]);
        assert_eq!(
            sys_getcwd(&kernel, UserAddr::new(0x8000_0000), 64),
            Err(SyscallError::Efault)
        );
    }

    #[test]
    fn test_getcwd_zero_length() {
        let kernel = kernel_with(&[]);
        assert_eq!(sys_getcwd(&kernel, UserAddr::NULL, 0), Ok(0));
    }

    #[test]
    fn test_open_close_roundtrip() {
        let kernel = kernel_with(&["a.txt"]);
        let fd = open(&kernel, "a.txt").unwrap();
        assert_eq!(fd.raw(), FD_MIN);
        assert_eq!(kernel.vfs().open_paths(), vec!["a.txt".to_string()]);

        assert_eq!(sys_close(&kernel, fd.raw()), Ok(()));
        assert_eq!(kernel.vfs().open_files(), 0);
        assert_eq!(sys_close(&kernel, fd.raw()), Err(SyscallError::Ebadf));
    }

    #[test]
    fn test_open_missing_creates_no_entry() {
        let kernel = kernel_with(&[]);
        assert_eq!(open(&kernel, "nope").unwrap_err(), SyscallError::Enoent);
        assert!(kernel.files().is_empty());
        assert_eq!(kernel.vfs().open_files(), 0);
    }

    #[test]
    fn test_open_exhausted_releases_file() {
        let kernel = kernel_with(&["f"]);
        for _ in 0..FD_SLOTS {
            open(&kernel, "f").unwrap();
        }
        assert_eq!(kernel.vfs().open_files(), FD_SLOTS);

        assert_eq!(open(&kernel, "f").unwrap_err(), SyscallError::Enfile);
        // The extra file was released, not leaked.
        assert_eq!(kernel.vfs().open_files(), FD_SLOTS);
        assert_eq!(kernel.files().len(), FD_SLOTS);
    }

    #[test]
    fn test_open_exhausted_with_failing_release() {
        let kernel = kernel_with(&["f"]);
        for _ in 0..FD_SLOTS {
            open(&kernel, "f").unwrap();
        }
        kernel.vfs().fail_close_with(SyscallError::Ebusy);
        // The allocation error wins over the release error.
        assert_eq!(open(&kernel, "f").unwrap_err(), SyscallError::Enfile);
    }

    #[test]
    fn test_open_name_too_long() {
        let kernel = kernel_with(&[]);
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(open(&kernel, &long).unwrap_err(), SyscallError::Enametoolong);

        let longest = "y".repeat(NAME_MAX);
        let kernel = kernel_with(&[longest.as_str()]);
        assert!(open(&kernel, &longest).is_ok());
    }

    #[test]
    fn test_open_bad_pointer() {
        let kernel = kernel_with(&[]);
        assert_eq!(
            sys_open(&kernel, UserAddr::NULL, OpenFlags::empty(), 0),
            Err(SyscallError::Efault)
        );
        assert_eq!(kernel.user_memory().accesses(), 0);
    }

    #[test]
    fn test_open_bad_access_mode() {
        let kernel = kernel_with(&["a"]);
        kernel.user_memory().poke(PATH, b"a\0");
        let flags = OpenFlags::O_WRONLY | OpenFlags::O_RDWR;
        assert_eq!(
            sys_open(&kernel, UserAddr::new(PATH), flags, 0),
            Err(SyscallError::Einval)
        );
        assert_eq!(kernel.vfs().open_files(), 0);
    }

    #[test]
    fn test_open_passes_flags() {
        let kernel = kernel_with(&[]);
        kernel.user_memory().poke(PATH, b"new\0");
        let fd = sys_open(
            &kernel,
            UserAddr::new(PATH),
            OpenFlags::O_WRONLY | OpenFlags::O_CREAT,
            0o644,
        )
        .unwrap();
        assert_eq!(fd.raw(), FD_MIN);
        assert_eq!(kernel.vfs().open_paths(), vec!["new".to_string()]);
    }

    #[test]
    fn test_close_out_of_range() {
        let kernel = kernel_with(&["a"]);
        open(&kernel, "a").unwrap();
        for fd in [-1, 0, 1, 2, FD_MAX + 1] {
            assert_eq!(sys_close(&kernel, fd), Err(SyscallError::Ebadf));
        }
        assert_eq!(kernel.files().len(), 1);
    }

    #[test]
    fn test_close_release_error_frees_handle() {
        let kernel = kernel_with(&["a"]);
        let fd = open(&kernel, "a").unwrap();
        kernel.vfs().fail_close_with(SyscallError::Ebusy);

        assert_eq!(sys_close(&kernel, fd.raw()), Err(SyscallError::Ebusy));
        assert!(!kernel.files().contains(fd.raw()));
        assert_eq!(kernel.vfs().open_files(), 0);
    }

    #[test]
    fn test_close_hands_back_same_file() {
        let kernel = kernel_with(&["a", "b"]);
        let a = open(&kernel, "a").unwrap();
        let b = open(&kernel, "b").unwrap();
        let file: MockFile = kernel.files().deallocate(b.raw()).unwrap();
        assert_eq!(file.path, "b");
        kernel.vfs().close(file).unwrap();
        assert_eq!(kernel.vfs().open_paths(), vec!["a".to_string()]);
        assert!(kernel.files().contains(a.raw()));
    }
}
