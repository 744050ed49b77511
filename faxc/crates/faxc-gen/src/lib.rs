//! faxc-gen - NASM text emission and the assemble/link pipeline
//!
//! Renders a `faxc_mir::Segments` value to NASM-syntax text and drives the
//! external `nasm`/`gcc` toolchain over it. Owns no instruction selection -
//! the mapping from IR instruction to mnemonic is one-to-one.

pub mod asm;
pub mod error;
pub mod linker;

pub use asm::{write_and_assemble, AsmGenerator};
pub use error::{CodeGenError, Result};
pub use linker::{assemble, Linker};
