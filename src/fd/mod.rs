//! File Descriptor Table
//!
//! Maps small integer handles to open file objects for every thread that
//! traps into the kernel.
//!
//! # Design
//! - Handles are drawn from the closed range `[FD_MIN, FD_MAX]`
//! - The lowest free handle is always handed out first
//! - The table owns each file while its handle is live; closing a handle
//!   returns the file to the caller for release
//!
//! # Security Properties
//! - Handles cannot be forged into bookkeeping: `Fd` is range-checked
//! - All mutations happen under a single lock

pub mod table;

pub use table::{Fd, FdTable, FdTableError, FD_MAX, FD_MIN, FD_SLOTS};
