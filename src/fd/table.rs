//! Descriptor Table Storage
//!
//! An arena of slots indexed by `handle - FD_MIN`. Each slot is either
//! free or holds the file object that owns the handle.
//!
//! # Design
//! - Slot storage grows on demand, up to `FD_SLOTS` entries
//! - Growth uses fallible reservation, so storage exhaustion is an error
//!   value rather than an allocator abort
//! - Allocation scans for the first free slot in ascending order
//! - The table never closes a file itself

use alloc::vec::Vec;
use core::fmt;

use log::trace;
use spin::Mutex;

/// Lowest handle handed out. 0, 1 and 2 belong to the standard streams.
pub const FD_MIN: i32 = 3;

/// Highest handle handed out, so a handle always fits in a `char`.
pub const FD_MAX: i32 = 127;

/// Number of handles in `[FD_MIN, FD_MAX]`.
pub const FD_SLOTS: usize = (FD_MAX - FD_MIN + 1) as usize;

const _: () = assert!(FD_MIN <= FD_MAX && FD_MAX <= i8::MAX as i32);

/// A live-range file descriptor.
///
/// This is a newtype to prevent arbitrary integers from indexing the table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Fd(u8);

impl Fd {
    /// First handle available to open files.
    pub const FIRST: Self = Self(FD_MIN as u8);

    /// Last handle available to open files.
    pub const LAST: Self = Self(FD_MAX as u8);

    /// Create a handle from its raw value.
    ///
    /// Returns None if the value is outside `[FD_MIN, FD_MAX]`.
    #[inline]
    pub const fn new(raw: i32) -> Option<Self> {
        if raw >= FD_MIN && raw <= FD_MAX {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    /// Get the raw handle value as seen by user space.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    const fn slot(self) -> usize {
        (self.0 as i32 - FD_MIN) as usize
    }

    /// Build the handle that names `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is not a table slot. That can only happen through a
    /// bookkeeping bug inside this module.
    #[inline]
    fn from_slot(slot: usize) -> Self {
        assert!(slot < FD_SLOTS, "fd slot {} outside table", slot);
        Self((slot as i32 + FD_MIN) as u8)
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for descriptor table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdTableError {
    /// The handle is out of range or not live.
    BadHandle,
    /// Every handle in `[FD_MIN, FD_MAX]` is live.
    Exhausted,
    /// Slot storage could not be obtained.
    OutOfMemory,
}

impl fmt::Display for FdTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadHandle => write!(f, "bad file descriptor"),
            Self::Exhausted => write!(f, "file descriptor table full"),
            Self::OutOfMemory => write!(f, "out of memory for descriptor slot"),
        }
    }
}

/// The descriptor table.
///
/// Owns every file whose handle is live. Construct it once during kernel
/// initialization and share it by reference.
pub struct FdTable<F> {
    /// Slot `i` holds the file for handle `FD_MIN + i`.
    slots: Mutex<Vec<Option<F>>>,
}

impl<F> FdTable<F> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Store `file` under the lowest free handle.
    ///
    /// On failure no entry is created and the file comes back with the
    /// error; releasing it is the caller's job.
    pub fn allocate(&self, file: F) -> Result<Fd, (FdTableError, F)> {
        let mut slots = self.slots.lock();

        let slot = match slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if slots.len() < FD_SLOTS => {
                if slots.try_reserve(1).is_err() {
                    return Err((FdTableError::OutOfMemory, file));
                }
                slots.push(None);
                slots.len() - 1
            }
            None => return Err((FdTableError::Exhausted, file)),
        };

        slots[slot] = Some(file);
        drop(slots);

        let fd = Fd::from_slot(slot);
        trace!("fd: allocated {}", fd);
        Ok(fd)
    }

    /// Remove the entry for `raw` and hand its file back.
    ///
    /// The returned file is still open; the caller must release it.
    #[must_use = "the returned file must be released"]
    pub fn deallocate(&self, raw: i32) -> Result<F, FdTableError> {
        let fd = Fd::new(raw).ok_or(FdTableError::BadHandle)?;

        let file = self
            .slots
            .lock()
            .get_mut(fd.slot())
            .and_then(Option::take)
            .ok_or(FdTableError::BadHandle)?;

        trace!("fd: released {}", fd);
        Ok(file)
    }

    /// Check whether `raw` names a live entry.
    pub fn contains(&self, raw: i32) -> bool {
        match Fd::new(raw) {
            Some(fd) => matches!(self.slots.lock().get(fd.slot()), Some(Some(_))),
            None => false,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no handle is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry, returning the files in ascending handle order.
    #[must_use = "the returned files must be released"]
    pub fn drain(&self) -> Vec<(Fd, F)> {
        let taken = core::mem::take(&mut *self.slots.lock());

        taken
            .into_iter()
            .enumerate()
            .filter_map(|(slot, file)| file.map(|file| (Fd::from_slot(slot), file)))
            .collect()
    }
}

impl<F> Default for FdTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for FdTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock();
        f.debug_set()
            .entries(
                slots
                    .iter()
                    .enumerate()
                    .filter(|(_, file)| file.is_some())
                    .map(|(slot, _)| Fd::from_slot(slot)),
            )
            .finish()
    }
}
