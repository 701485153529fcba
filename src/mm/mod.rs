//! Memory access for the syscall boundary
//!
//! Provides:
//! - Typed user-space addresses
//! - The user memory capability supplied by the platform
//!
//! # Security Principles
//! - User addresses are never dereferenced by the kernel
//! - All access to user memory goes through bounded copies

pub mod address;
pub mod user;

pub use address::{UserAddr, PAGE_SIZE, USERSPACE_TOP};
pub use user::UserMemory;
