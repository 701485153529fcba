//! System Call Input Validation
//!
//! Range checks for user-space addresses before any copy primitive runs.
//!
//! # Security Principles
//! - Validate ALL user ranges before use
//! - Fail-secure: anything not provably inside user space is `Efault`
//! - Prevent common vulnerabilities:
//!   - Kernel memory disclosure (ranges must end below `USERSPACE_TOP`)
//!   - Address wrap-around (checked arithmetic)
//!   - Null pointer dereference (explicit checks)

use crate::mm::{UserAddr, USERSPACE_TOP};

use super::error::{SyscallError, SyscallResult};

/// A validated user-space source range
///
/// This type guarantees that:
/// - The range lies entirely below `USERSPACE_TOP`
/// - The end address doesn't overflow
/// - The start is non-null unless the range is empty
///
/// It is only constructed after validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserBuffer {
    addr: UserAddr,
    len: usize,
}

impl UserBuffer {
    /// Start of the range.
    #[inline]
    pub const fn addr(&self) -> UserAddr {
        self.addr
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the range covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Validate a user-space range the kernel will read from
///
/// # Arguments
/// * `addr` - User-space start address
/// * `len` - Range length in bytes
///
/// # Returns
/// * `Ok(UserBuffer)` - Validated range
/// * `Err(SyscallError::Efault)` - Validation failed
///
/// # Security Checks
/// 1. Address is non-null
/// 2. Address is within user space
/// 3. Address + length doesn't overflow
/// 4. End address is within user space
pub fn validate_user_read(addr: UserAddr, len: usize) -> SyscallResult<UserBuffer> {
    // Zero-length ranges are valid
    if len == 0 {
        return Ok(UserBuffer { addr, len: 0 });
    }

    if addr.is_null() {
        return Err(SyscallError::Efault);
    }

    if !addr.is_user() {
        return Err(SyscallError::Efault);
    }

    let end = addr.checked_add(len).ok_or(SyscallError::Efault)?;

    if end.as_usize() > USERSPACE_TOP {
        return Err(SyscallError::Efault);
    }

    Ok(UserBuffer { addr, len })
}

/// Validate a user-space range the kernel will write to
///
/// Same checks as read validation; the distinct type keeps the direction
/// visible at the copy site.
pub fn validate_user_write(addr: UserAddr, len: usize) -> SyscallResult<UserBufferMut> {
    let range = validate_user_read(addr, len)?;

    Ok(UserBufferMut {
        addr: range.addr,
        len: range.len,
    })
}

/// A validated user-space destination range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserBufferMut {
    addr: UserAddr,
    len: usize,
}

impl UserBufferMut {
    /// Start of the range.
    #[inline]
    pub const fn addr(&self) -> UserAddr {
        self.addr
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the range covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
