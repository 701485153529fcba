//! MIPS Trap Handling
//!
//! Decodes the exception cause of a trap from user mode and routes system
//! calls to the dispatcher.
//!
//! # Trap Frame
//! The entry code saves every general purpose register plus the CP0 state
//! into a `TrapFrame` on the kernel stack and passes a pointer to it.
//!
//! # System Call Convention
//! - v0: call number on entry; return value (or error code) on exit
//! - v1: second return word for 64-bit results
//! - a0-a3: first four argument words; further words on the user stack
//! - a3: on exit, 0 for success and 1 for failure
//! - epc: must be advanced past the `syscall` instruction

use log::warn;

use crate::kernel::Kernel;
use crate::mm::{UserAddr, UserMemory};
use crate::syscall::{self, SyscallError, SyscallValue};
use crate::vfs::Vfs;

/// Number of argument words passed in registers.
pub const ARG_REGISTERS: usize = 4;

/// Width of the trapping instruction.
pub const INSN_WIDTH: u32 = 4;

/// The register-level view of a trap needed by the syscall layer.
pub trait TrapContext {
    /// Call number requested by the caller.
    fn call_number(&self) -> u32;

    /// Argument register `index`, where `index < ARG_REGISTERS`.
    fn arg(&self, index: usize) -> u32;

    /// Caller's stack pointer, for arguments beyond the registers.
    fn stack_pointer(&self) -> UserAddr;

    /// Store a successful result and clear the error flag.
    fn set_return(&mut self, value: SyscallValue);

    /// Store an error code and raise the error flag.
    fn set_error(&mut self, err: SyscallError);

    /// Move the resume address past the trapping instruction.
    fn advance_pc(&mut self);
}

/// Register state saved on trap entry
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    /// Coprocessor 0 vaddr register
    pub vaddr: u32,
    /// Coprocessor 0 status register
    pub status: u32,
    /// Coprocessor 0 cause register
    pub cause: u32,
    pub lo: u32,
    pub hi: u32,
    /// Saved register 31
    pub ra: u32,
    /// Saved register 1 (AT)
    pub at: u32,
    /// Saved register 2 (v0)
    pub v0: u32,
    /// Saved register 3 (v1)
    pub v1: u32,
    /// Saved registers 4-7 (a0-a3)
    pub a0: u32,
    pub a1: u32,
    pub a2: u32,
    pub a3: u32,
    /// Saved registers 8-15 (t0-t7)
    pub t: [u32; 8],
    /// Saved registers 16-23 (s0-s7)
    pub s: [u32; 8],
    pub t8: u32,
    pub t9: u32,
    /// Kernel temporaries; not restored on return
    pub k0: u32,
    pub k1: u32,
    pub gp: u32,
    pub sp: u32,
    /// Saved register 30 (s8 / frame pointer)
    pub s8: u32,
    /// Coprocessor 0 exception PC
    pub epc: u32,
}

impl TrapContext for TrapFrame {
    #[inline]
    fn call_number(&self) -> u32 {
        self.v0
    }

    fn arg(&self, index: usize) -> u32 {
        match index {
            0 => self.a0,
            1 => self.a1,
            2 => self.a2,
            3 => self.a3,
            _ => panic!("argument register {} out of range", index),
        }
    }

    #[inline]
    fn stack_pointer(&self) -> UserAddr {
        UserAddr::from_word(self.sp)
    }

    fn set_return(&mut self, value: SyscallValue) {
        match value {
            SyscallValue::Word(word) => self.v0 = word,
            SyscallValue::Pair(pair) => {
                self.v0 = (pair >> 32) as u32;
                self.v1 = pair as u32;
            }
        }
        self.a3 = 0;
    }

    fn set_error(&mut self, err: SyscallError) {
        self.v0 = err.code();
        self.a3 = 1;
    }

    #[inline]
    fn advance_pc(&mut self) {
        self.epc = self.epc.wrapping_add(INSN_WIDTH);
    }
}

/// Exception code extracted from the cause register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExceptionCode {
    Interrupt = 0,
    TlbModify = 1,
    TlbLoad = 2,
    TlbStore = 3,
    AddressLoad = 4,
    AddressStore = 5,
    BusInstruction = 6,
    BusData = 7,
    Syscall = 8,
    Breakpoint = 9,
    ReservedInstruction = 10,
    CoprocessorUnusable = 11,
    Overflow = 12,
    Other = 0xFF,
}

impl From<u32> for ExceptionCode {
    fn from(cause: u32) -> Self {
        match (cause >> 2) & 0x1F {
            0 => Self::Interrupt,
            1 => Self::TlbModify,
            2 => Self::TlbLoad,
            3 => Self::TlbStore,
            4 => Self::AddressLoad,
            5 => Self::AddressStore,
            6 => Self::BusInstruction,
            7 => Self::BusData,
            8 => Self::Syscall,
            9 => Self::Breakpoint,
            10 => Self::ReservedInstruction,
            11 => Self::CoprocessorUnusable,
            12 => Self::Overflow,
            _ => Self::Other,
        }
    }
}

/// What the trap entry code should do after `handle_user_trap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapDisposition {
    /// The frame is ready; return to user mode.
    Resume,
    /// Not a system call. The frame is untouched and the platform decides
    /// the fate of the thread.
    Unhandled(ExceptionCode),
}

/// Handle a synchronous trap from user mode
///
/// This is the main entry point for syscalls (`syscall` instruction).
pub fn handle_user_trap<V, M>(kernel: &Kernel<V, M>, tf: &mut TrapFrame) -> TrapDisposition
where
    V: Vfs,
    M: UserMemory,
{
    match ExceptionCode::from(tf.cause) {
        ExceptionCode::Syscall => {
            syscall::dispatch(kernel, tf);
            TrapDisposition::Resume
        }
        code => {
            warn!(
                "trap: unhandled {:?} from user mode at epc {:#010x}, vaddr {:#010x}",
                code, tf.epc, tf.vaddr
            );
            TrapDisposition::Unhandled(code)
        }
    }
}
