//! System Call Interface
//!
//! Kernel side of the user/kernel boundary for system calls.
//!
//! # Security Model
//! - Whitelist approach: only explicitly implemented syscalls are routed
//! - All user ranges are validated before any copy
//! - Invalid inputs return errors, never panic
//! - Every call yields exactly one of a value or an error code
//!
//! # Current Syscalls
//! - 45: open(path, flags, mode) - open a file and return a descriptor
//! - 49: close(fd) - release a descriptor and its file
//! - 76: __getcwd(buf, buflen) - copy out the current directory path

pub mod args;
pub mod copy;
mod error;
pub mod fs;
mod handler;
pub mod validate;

pub use args::SyscallArgs;
pub use copy::{copy_in_bytes, copy_in_string, copy_out_bytes, KernelString};
pub use error::{SyscallError, SyscallResult};
pub use handler::{complete, dispatch, numbers, SyscallValue};
pub use validate::{UserBuffer, UserBufferMut};
