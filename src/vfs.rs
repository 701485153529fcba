//! File-object collaborator interface
//!
//! The syscall layer does not implement files. It opens, closes and asks
//! for the working directory through this trait, and treats the returned
//! file objects as opaque owned values.

use core::ffi::CStr;

use bitflags::bitflags;

use crate::syscall::{SyscallError, SyscallResult};

bitflags! {
    /// Flags passed to `open`, as encoded by the user-level library.
    ///
    /// Read-only access is the absence of both access bits. Unknown bits are
    /// kept and handed to the file layer unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const O_WRONLY = 1 << 0;
        const O_RDWR = 1 << 1;
        const O_CREAT = 1 << 2;
        const O_EXCL = 1 << 3;
        const O_TRUNC = 1 << 4;
        const O_APPEND = 1 << 5;
        const O_NOCTTY = 1 << 6;
    }
}

/// Mask selecting the access mode bits.
pub const O_ACCMODE: u32 = 3;

/// Requested access of an open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl OpenFlags {
    /// Decode the access mode; both access bits set is `Einval`.
    pub const fn access_mode(self) -> SyscallResult<AccessMode> {
        match self.bits() & O_ACCMODE {
            0 => Ok(AccessMode::ReadOnly),
            1 => Ok(AccessMode::WriteOnly),
            2 => Ok(AccessMode::ReadWrite),
            _ => Err(SyscallError::Einval),
        }
    }
}

/// The file-object layer.
///
/// Errors returned here reach the caller unchanged.
pub trait Vfs {
    /// An open file. Owned by whoever holds it; dropping it without
    /// `close` leaks the underlying reference.
    type File: Send;

    /// Open `path`.
    fn open(&self, path: &CStr, flags: OpenFlags, mode: u32) -> SyscallResult<Self::File>;

    /// Release a file obtained from `open`.
    fn close(&self, file: Self::File) -> SyscallResult<()>;

    /// Write the current directory path into `buf`, returning the number
    /// of bytes written.
    fn getcwd(&self, buf: &mut [u8]) -> SyscallResult<usize>;
}
