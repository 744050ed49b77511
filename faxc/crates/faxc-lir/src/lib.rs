//! faxc-lir - Low-level vocabulary: registers, Windows x64 ABI, stack frames
//!
//! Supplies the reusable low-level pieces `faxc-mir`'s `IrGenerator` lowers
//! into: the register-size-family table, the Windows x64 calling convention,
//! and `StackInfo`/`StackEntry`. Owns no instruction or segment model of its
//! own - that belongs to `faxc-mir`.

pub mod calling_convention;
pub mod lir;
pub mod stack_frame;

pub use calling_convention::WindowsX64Abi;
pub use lir::{Address, Operand, PhysicalRegister, RegisterWidth};
pub use stack_frame::{StackEntry, StackFrameError, StackFrameResult, StackInfo};
