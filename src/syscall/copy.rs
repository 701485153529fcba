//! Marshaling between user space and kernel buffers
//!
//! Every transfer validates the user range first and then goes through the
//! platform's `UserMemory` primitives.

use alloc::ffi::CString;
use alloc::vec::Vec;
use core::ffi::CStr;
use core::fmt;

use crate::mm::{UserAddr, UserMemory};

use super::error::{SyscallError, SyscallResult};
use super::validate;

/// A string copied in from user space.
///
/// Always NUL-terminated. If no terminator was found within the copy bound
/// the contents stop at the bound and the string is marked truncated.
pub struct KernelString {
    inner: CString,
    truncated: bool,
}

impl KernelString {
    /// The string as a C string.
    #[inline]
    pub fn as_c_str(&self) -> &CStr {
        &self.inner
    }

    /// The string bytes without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Length without the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the copy hit its bound before a terminator.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Debug for KernelString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner)?;
        if self.truncated {
            write!(f, "...")?;
        }
        Ok(())
    }
}

/// Copy a NUL-terminated string of at most `max_len` bytes from `src`.
///
/// Reads never cross a page boundary in one step, so a terminator early in
/// a page at the end of a mapping does not fault on the following page.
pub fn copy_in_string<M>(mem: &M, src: UserAddr, max_len: usize) -> SyscallResult<KernelString>
where
    M: UserMemory + ?Sized,
{
    let capacity = max_len.checked_add(1).ok_or(SyscallError::Einval)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| SyscallError::Enomem)?;

    let mut cursor = src;
    let mut terminated = false;

    while buf.len() < max_len {
        let chunk = (max_len - buf.len()).min(cursor.bytes_to_page_end());
        let range = validate::validate_user_read(cursor, chunk)?;

        let start = buf.len();
        buf.resize(start + chunk, 0);
        mem.copy_in(range.addr(), &mut buf[start..])?;

        if let Some(nul) = buf[start..].iter().position(|&b| b == 0) {
            buf.truncate(start + nul);
            terminated = true;
            break;
        }

        cursor = cursor.checked_add(chunk).ok_or(SyscallError::Efault)?;
    }

    buf.push(0);
    let inner = CString::from_vec_with_nul(buf).map_err(|_| SyscallError::Einval)?;

    Ok(KernelString {
        inner,
        truncated: !terminated,
    })
}

/// Copy exactly `dst.len()` bytes from user address `src`.
pub fn copy_in_bytes<M>(mem: &M, src: UserAddr, dst: &mut [u8]) -> SyscallResult<()>
where
    M: UserMemory + ?Sized,
{
    let range = validate::validate_user_read(src, dst.len())?;
    if range.is_empty() {
        return Ok(());
    }
    mem.copy_in(range.addr(), dst)
}

/// Copy all of `src` out to user address `dst`.
pub fn copy_out_bytes<M>(mem: &M, src: &[u8], dst: UserAddr) -> SyscallResult<()>
where
    M: UserMemory + ?Sized,
{
    let range = validate::validate_user_write(dst, src.len())?;
    if range.is_empty() {
        return Ok(());
    }
    mem.copy_out(src, range.addr())
}
