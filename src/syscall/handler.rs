//! System Call Handler
//!
//! Dispatches system calls to the individual handlers and writes the
//! outcome back into the trap context.
//!
//! # Security Considerations
//! - Unknown syscall numbers return ENOSYS and are never fatal
//! - Each handler validates its own arguments
//! - Every call advances the resume address exactly once

use log::warn;
#[cfg(feature = "syscall-trace")]
use log::trace;

use crate::fd::Fd;
use crate::kernel::Kernel;
use crate::mm::UserMemory;
use crate::trap::TrapContext;
use crate::vfs::{OpenFlags, Vfs};

use super::args::SyscallArgs;
use super::error::{SyscallError, SyscallResult};
use super::fs;

/// System call numbers
pub mod numbers {
    pub const SYS_OPEN: u32 = 45;
    pub const SYS_CLOSE: u32 = 49;
    pub const SYS___GETCWD: u32 = 76;
}

/// A successful syscall result as it goes back to user space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallValue {
    /// One return register.
    Word(u32),
    /// Two return registers, most significant word first.
    Pair(u64),
}

impl From<()> for SyscallValue {
    fn from(_: ()) -> Self {
        Self::Word(0)
    }
}

impl From<i32> for SyscallValue {
    fn from(value: i32) -> Self {
        Self::Word(value as u32)
    }
}

impl From<usize> for SyscallValue {
    fn from(value: usize) -> Self {
        Self::Word(value as u32)
    }
}

impl From<Fd> for SyscallValue {
    fn from(fd: Fd) -> Self {
        Self::from(fd.raw())
    }
}

impl From<u64> for SyscallValue {
    fn from(value: u64) -> Self {
        Self::Pair(value)
    }
}

/// Dispatch the system call held in `ctx`
///
/// Reads the call number and arguments, runs exactly one handler and
/// writes its outcome back with `complete`.
pub fn dispatch<T, V, M>(kernel: &Kernel<V, M>, ctx: &mut T)
where
    T: TrapContext + ?Sized,
    V: Vfs,
    M: UserMemory,
{
    let callno = ctx.call_number();

    #[cfg(feature = "syscall-trace")]
    trace!(
        "syscall: {} ({:#x}, {:#x}, {:#x}, {:#x})",
        callno,
        ctx.arg(0),
        ctx.arg(1),
        ctx.arg(2),
        ctx.arg(3)
    );

    let outcome = route(kernel, callno, ctx);

    #[cfg(feature = "syscall-trace")]
    trace!("syscall: {} -> {:?}", callno, outcome);

    complete(ctx, outcome);
}

fn route<T, V, M>(kernel: &Kernel<V, M>, callno: u32, ctx: &T) -> SyscallResult<SyscallValue>
where
    T: TrapContext + ?Sized,
    V: Vfs,
    M: UserMemory,
{
    let mut args = SyscallArgs::new(ctx, kernel.user_memory());

    match callno {
        numbers::SYS___GETCWD => {
            let buf = args.user_addr()?;
            let buflen = args.word()? as usize;
            fs::sys_getcwd(kernel, buf, buflen).map(SyscallValue::from)
        }
        numbers::SYS_OPEN => {
            let path = args.user_addr()?;
            let flags = OpenFlags::from_bits_retain(args.word()?);
            let mode = args.word()?;
            fs::sys_open(kernel, path, flags, mode).map(SyscallValue::from)
        }
        numbers::SYS_CLOSE => {
            let fd = args.int()?;
            fs::sys_close(kernel, fd).map(SyscallValue::from)
        }
        _ => {
            warn!("syscall: unknown call number {}", callno);
            Err(SyscallError::Enosys)
        }
    }
}

/// Write `outcome` into `ctx` and step past the trapping instruction.
///
/// On success the value goes to the return register(s) and the error flag
/// is cleared; on failure the error code goes to the return register and
/// the flag is set. The resume address advances either way.
pub fn complete<T>(ctx: &mut T, outcome: SyscallResult<SyscallValue>)
where
    T: TrapContext + ?Sized,
{
    match outcome {
        Ok(value) => ctx.set_return(value),
        Err(err) => ctx.set_error(err),
    }
    ctx.advance_pc();
}
