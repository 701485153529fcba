//! PantherOS System-Call Boundary
//!
//! Kernel-side entry point for system calls in a teaching kernel: a
//! dispatcher that turns a raw trap into a typed call into kernel services,
//! and a file-descriptor table shared by every thread that traps in.
//!
//! # Layout
//! - `trap`: exception cause decoding and the MIPS trap frame
//! - `syscall`: dispatcher, argument decoding, user copies, handlers
//! - `fd`: the descriptor table
//! - `mm`: typed user-space addresses and the user memory capability
//! - `vfs`: the file-object collaborator interface
//! - `kernel`: the context value that ties the pieces together
//! - `klog`: `log` backend for the kernel console
//!
//! # Security Features
//! - User pointers are never dereferenced; all access goes through bounded
//!   copy primitives after range validation
//! - Every syscall path yields exactly one of a value or an error code
//! - Descriptor ownership is tracked by the type system: closing a handle
//!   hands the file back to the caller, who must release it

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod fd;
pub mod kernel;
pub mod klog;
pub mod mm;
pub mod syscall;
pub mod trap;
pub mod vfs;

#[cfg(test)]
mod mock;

pub use fd::{Fd, FdTable, FdTableError};
pub use kernel::Kernel;
pub use mm::{UserAddr, UserMemory};
pub use syscall::{dispatch, SyscallError, SyscallResult, SyscallValue};
pub use trap::{handle_user_trap, TrapContext, TrapDisposition, TrapFrame};
pub use vfs::{OpenFlags, Vfs};
