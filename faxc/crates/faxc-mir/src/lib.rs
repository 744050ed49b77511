//! faxc-mir - Segmented IR and the AST-to-IR generator
//!
//! Owns the flat `Segments`/`Declaration`/`Entry`/`Instruction` model that
//! `faxc-gen` renders directly to NASM text, the djb2 name/data mangling
//! scheme, and the `IrGenerator` that walks a parsed program into it.

pub mod ir_gen;
pub mod mir;

pub use ir_gen::{IrError, IrGenerator, IrResult};
pub use mir::{djb2, mangle_data, mangle_function, Declaration, Entry, Instruction, Segments};
