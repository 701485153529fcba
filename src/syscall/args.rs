//! Syscall argument decoding
//!
//! Arguments are laid out like ordinary function-call arguments: one word
//! per slot, the first `ARG_REGISTERS` slots in a0-a3. A 64-bit argument
//! takes an aligned pair of slots (a0/a1 or a2/a3), most significant word
//! first, skipping a slot when needed. Slots past the registers live on the
//! caller's stack starting at `sp + STACK_ARG_OFFSET`.

use crate::mm::{UserAddr, UserMemory};
use crate::trap::{TrapContext, ARG_REGISTERS};

use super::copy;
use super::error::{SyscallError, SyscallResult};

/// Offset of the first stack slot; the caller reserves space below it for
/// the register arguments.
pub const STACK_ARG_OFFSET: usize = 16;

const WORD_SIZE: usize = core::mem::size_of::<u32>();

/// Sequential reader over a trap's argument slots.
pub struct SyscallArgs<'a, T: ?Sized, M: ?Sized> {
    ctx: &'a T,
    mem: &'a M,
    next: usize,
}

impl<'a, T, M> SyscallArgs<'a, T, M>
where
    T: TrapContext + ?Sized,
    M: UserMemory + ?Sized,
{
    pub fn new(ctx: &'a T, mem: &'a M) -> Self {
        Self { ctx, mem, next: 0 }
    }

    fn slot(&self, index: usize) -> SyscallResult<u32> {
        if index < ARG_REGISTERS {
            return Ok(self.ctx.arg(index));
        }

        let offset = STACK_ARG_OFFSET + (index - ARG_REGISTERS) * WORD_SIZE;
        let addr = self
            .ctx
            .stack_pointer()
            .checked_add(offset)
            .ok_or(SyscallError::Efault)?;

        let mut word = [0u8; WORD_SIZE];
        copy::copy_in_bytes(self.mem, addr, &mut word)?;
        Ok(u32::from_ne_bytes(word))
    }

    /// Next 32-bit argument.
    pub fn word(&mut self) -> SyscallResult<u32> {
        let value = self.slot(self.next)?;
        self.next += 1;
        Ok(value)
    }

    /// Next 32-bit argument as a signed integer.
    pub fn int(&mut self) -> SyscallResult<i32> {
        self.word().map(|w| w as i32)
    }

    /// Next argument as a user pointer.
    pub fn user_addr(&mut self) -> SyscallResult<UserAddr> {
        self.word().map(UserAddr::from_word)
    }

    /// Next 64-bit argument, from an aligned pair of slots.
    pub fn dword(&mut self) -> SyscallResult<u64> {
        if self.next % 2 == 1 {
            self.next += 1;
        }
        let high = self.slot(self.next)?;
        let low = self.slot(self.next + 1)?;
        self.next += 2;
        Ok((u64::from(high) << 32) | u64::from(low))
    }
}
