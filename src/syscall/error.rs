//! System Call Error Codes
//!
//! Numeric values follow the kernel's errno table. On error the code is
//! placed in the primary return register and the error flag is raised;
//! user-level stubs move it into `errno` and return -1.

use core::fmt;

use crate::fd::FdTableError;

/// System call error codes
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyscallError {
    /// Function not implemented (unknown call number)
    Enosys = 1,
    /// Out of memory
    Enomem = 3,
    /// Operation would block
    Eagain = 4,
    /// Interrupted system call
    Eintr = 5,
    /// Bad memory reference
    Efault = 6,
    /// String too long
    Enametoolong = 7,
    /// Invalid argument
    Einval = 8,
    /// Operation not permitted
    Eperm = 9,
    /// Permission denied
    Eacces = 10,
    /// Not a directory
    Enotdir = 17,
    /// Is a directory
    Eisdir = 18,
    /// No such file or directory
    Enoent = 19,
    /// Too many levels of symbolic links
    Eloop = 20,
    /// Directory not empty
    Enotempty = 21,
    /// File or object exists
    Eexist = 22,
    /// Too many hard links
    Emlink = 23,
    /// Cross-device link
    Exdev = 24,
    /// No such device
    Enodev = 25,
    /// Device not available
    Enxio = 26,
    /// Device or resource busy
    Ebusy = 27,
    /// Too many open files
    Emfile = 28,
    /// Too many open files in system
    Enfile = 29,
    /// Bad file number
    Ebadf = 30,
}

impl SyscallError {
    /// The value placed in the return register.
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enosys => "Function not implemented",
            Self::Enomem => "Out of memory",
            Self::Eagain => "Operation would block",
            Self::Eintr => "Interrupted system call",
            Self::Efault => "Bad memory reference",
            Self::Enametoolong => "String too long",
            Self::Einval => "Invalid argument",
            Self::Eperm => "Operation not permitted",
            Self::Eacces => "Permission denied",
            Self::Enotdir => "Not a directory",
            Self::Eisdir => "Is a directory",
            Self::Enoent => "No such file or directory",
            Self::Eloop => "Too many levels of symbolic links",
            Self::Enotempty => "Directory not empty",
            Self::Eexist => "File or object exists",
            Self::Emlink => "Too many hard links",
            Self::Exdev => "Cross-device link",
            Self::Enodev => "No such device",
            Self::Enxio => "Device not available",
            Self::Ebusy => "Device or resource busy",
            Self::Emfile => "Too many open files",
            Self::Enfile => "Too many open files in system",
            Self::Ebadf => "Bad file number",
        }
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

impl From<FdTableError> for SyscallError {
    fn from(err: FdTableError) -> Self {
        match err {
            FdTableError::BadHandle => Self::Ebadf,
            FdTableError::Exhausted => Self::Enfile,
            FdTableError::OutOfMemory => Self::Enomem,
        }
    }
}

/// Result type returned by every handler.
pub type SyscallResult<T> = Result<T, SyscallError>;
