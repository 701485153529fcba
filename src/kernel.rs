//! Kernel context for the syscall layer
//!
//! One value, built during kernel initialization before any thread can
//! trap, owns the descriptor table and the collaborators. Handlers receive
//! it by shared reference.

use log::{info, warn};

use crate::fd::{FdTable, FD_MAX, FD_MIN};
use crate::mm::UserMemory;
use crate::vfs::Vfs;

/// Everything a system call handler can reach.
pub struct Kernel<V: Vfs, M> {
    vfs: V,
    memory: M,
    files: FdTable<V::File>,
}

impl<V, M> Kernel<V, M>
where
    V: Vfs,
    M: UserMemory,
{
    /// Build the context with an empty descriptor table.
    pub fn new(vfs: V, memory: M) -> Self {
        info!("syscall: descriptor table ready, fds {}..={}", FD_MIN, FD_MAX);
        Self {
            vfs,
            memory,
            files: FdTable::new(),
        }
    }

    /// The file-object layer.
    #[inline]
    pub fn vfs(&self) -> &V {
        &self.vfs
    }

    /// Access to the trapping context's memory.
    #[inline]
    pub fn user_memory(&self) -> &M {
        &self.memory
    }

    /// The descriptor table.
    #[inline]
    pub fn files(&self) -> &FdTable<V::File> {
        &self.files
    }

    /// Close every open descriptor, releasing its file.
    ///
    /// Returns the number of descriptors closed. Release failures are
    /// logged; the descriptor is gone either way.
    pub fn close_all(&self) -> usize {
        let open = self.files.drain();
        let count = open.len();

        for (fd, file) in open {
            if let Err(err) = self.vfs.close(file) {
                warn!("syscall: releasing fd {} failed: {}", fd, err);
            }
        }

        count
    }
}
