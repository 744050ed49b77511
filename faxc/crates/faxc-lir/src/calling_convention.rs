//! Windows x64 calling convention.
//!
//! Replaces the System V AMD64 convention (`rdi`/`rsi`/`rdx`/`rcx`/`r8`/`r9`,
//! no shadow space) with the Microsoft x64 convention the target NASM/gcc
//! toolchain links against: integer/pointer arguments in `rcx`/`rdx`/`r8`/
//! `r9`, a mandatory 32-byte shadow space reserved by the caller even when
//! all arguments fit in registers.

use crate::lir::PhysicalRegister;

pub struct WindowsX64Abi;

impl WindowsX64Abi {
    pub const ARG_REGS: [PhysicalRegister; 4] = [
        PhysicalRegister::RCX,
        PhysicalRegister::RDX,
        PhysicalRegister::R8,
        PhysicalRegister::R9,
    ];

    pub const RET_REG: PhysicalRegister = PhysicalRegister::RAX;

    /// Shadow space the caller must reserve below the return address,
    /// regardless of how many arguments are actually passed in registers.
    pub const SHADOW_SPACE: u32 = 32;

    pub fn get_arg_register(index: usize) -> Option<PhysicalRegister> {
        Self::ARG_REGS.get(index).copied()
    }

    pub fn is_stack_arg(index: usize) -> bool {
        index >= 4
    }

    /// Offset from `rbp` for a stack-passed argument beyond the first four,
    /// counting from +16 (past saved rbp and the return address) plus the
    /// shadow space already reserved for the first four.
    pub fn get_stack_arg_offset(index: usize) -> i32 {
        16 + Self::SHADOW_SPACE as i32 + ((index - 4) as i32 * 8)
    }

    /// Round `size` up to 16-byte alignment and add the shadow space, the
    /// final step of function-lowering step 5.
    pub fn aligned_frame_size(locals_size: u32) -> u32 {
        let aligned = (locals_size + 15) & !15;
        aligned + Self::SHADOW_SPACE
    }
}
