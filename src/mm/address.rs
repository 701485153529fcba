//! User Address Type
//!
//! Type-safe wrapper for addresses that belong to the trapping context's
//! address space, so they cannot be mixed up with kernel pointers.
//!
//! # Security Properties
//! - User addresses have no conversion to a kernel pointer
//! - Range arithmetic is checked

use core::fmt;

/// Page size (4 KiB)
pub const PAGE_SIZE: usize = 4096;
/// Page size mask
pub const PAGE_MASK: usize = PAGE_SIZE - 1;

/// First address above user space (start of kseg0).
pub const USERSPACE_TOP: usize = 0x8000_0000;

/// An address in the trapping context's address space.
///
/// Only the copy primitives behind `UserMemory` may turn it into an access.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UserAddr(usize);

impl UserAddr {
    /// The null user address.
    pub const NULL: Self = Self(0);

    /// Create a user address.
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// Reinterpret an argument register as a user address.
    #[inline]
    pub const fn from_word(word: u32) -> Self {
        Self(word as usize)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Check if this is the null address.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Check if the address lies below the top of user space.
    #[inline]
    pub const fn is_user(self) -> bool {
        self.0 < USERSPACE_TOP
    }

    /// Get the page offset (lowest 12 bits).
    #[inline]
    pub const fn page_offset(self) -> usize {
        self.0 & PAGE_MASK
    }

    /// Number of bytes from this address to the end of its page.
    #[inline]
    pub const fn bytes_to_page_end(self) -> usize {
        PAGE_SIZE - self.page_offset()
    }

    /// Add an offset, returning None on overflow.
    #[inline]
    pub const fn checked_add(self, offset: usize) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }
}

impl fmt::Debug for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAddr({:#010x})", self.0)
    }
}

impl fmt::Display for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
