//! User Memory Capability
//!
//! The platform's copy primitives between a calling context's address space
//! and kernel buffers. Implementations report an inaccessible address as
//! `Efault`; beyond that no partial-copy guarantee is made.

use super::UserAddr;
use crate::syscall::SyscallResult;

/// Bounded access to the address space of the trapping context.
///
/// Callers validate ranges before invoking these; implementations must
/// still fail cleanly on unmapped pages.
pub trait UserMemory {
    /// Copy `dst.len()` bytes starting at user address `src`.
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> SyscallResult<()>;

    /// Copy all of `src` to user address `dst`.
    fn copy_out(&self, src: &[u8], dst: UserAddr) -> SyscallResult<()>;
}
