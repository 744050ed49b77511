//! NASM text emitter.
//!
//! Renders a [`Segments`] value to the literal NASM-syntax text file the
//! driver hands to `nasm`/`gcc`. No instruction selection happens here - the
//! mapping from `Instruction` variant to mnemonic is one-to-one, matching
//! what `faxc-mir::IrGenerator` already decided.

use crate::error::{CodeGenError, Result};
use faxc_lir::{Address, Operand, PhysicalRegister, RegisterWidth};
use faxc_mir::{Declaration, Instruction, Segments};
use std::fmt::Write as _;
use std::path::Path;

pub struct AsmGenerator {
    output: String,
}

impl AsmGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Renders `segments` to a complete `.asm` text file.
    pub fn generate(segments: &Segments) -> String {
        let mut gen = Self::new();
        gen.emit_header(segments);
        gen.emit_data(segments);
        gen.emit_bss(segments);
        gen.emit_text(segments);
        gen.output
    }

    fn emit_header(&mut self, segments: &Segments) {
        writeln!(self.output, "bits 64").unwrap();
        writeln!(self.output, "default rel").unwrap();
        for lib in &segments.ext_libs {
            writeln!(self.output, "extern {lib}").unwrap();
        }
    }

    fn emit_data(&mut self, segments: &Segments) {
        if segments.data.is_empty() {
            return;
        }
        writeln!(self.output, "segment .data").unwrap();
        for decl in &segments.data {
            if let Declaration::Db {
                id,
                value,
                terminator,
            } = decl
            {
                writeln!(self.output, "{id} db {value}, {terminator}").unwrap();
            }
        }
    }

    fn emit_bss(&mut self, segments: &Segments) {
        if segments.bss.is_empty() {
            return;
        }
        writeln!(self.output, "segment .bss").unwrap();
        for decl in &segments.bss {
            match decl {
                Declaration::Resb { id, count } => {
                    writeln!(self.output, "{id} resb {count}").unwrap()
                }
                Declaration::Resw { id, count } => {
                    writeln!(self.output, "{id} resw {count}").unwrap()
                }
                Declaration::Resd { id, count } => {
                    writeln!(self.output, "{id} resd {count}").unwrap()
                }
                Declaration::Resq { id, count } => {
                    writeln!(self.output, "{id} resq {count}").unwrap()
                }
                Declaration::Db { .. } => {}
            }
        }
    }

    fn emit_text(&mut self, segments: &Segments) {
        writeln!(self.output, "segment .text").unwrap();
        for entry in &segments.text {
            writeln!(self.output, "global {}", entry.id).unwrap();
        }

        writeln!(self.output, "exit:").unwrap();
        writeln!(self.output, "\tleave").unwrap();
        writeln!(self.output, "\tret").unwrap();

        for entry in &segments.text {
            writeln!(self.output, "{}:", entry.id).unwrap();
            for instr in &entry.instructions {
                self.emit_instruction(instr);
            }
        }
        for block in &segments.labels {
            writeln!(self.output, "{}:", block.id).unwrap();
            for instr in &block.instructions {
                self.emit_instruction(instr);
            }
        }
    }

    fn emit_instruction(&mut self, instr: &Instruction) {
        match instr {
            Instruction::Push(a) => self.line1("push", a),
            Instruction::Mov(a, b) => self.line2("mov", a, b),
            Instruction::Movsx(a, b) => self.line2("movsx", a, b),
            Instruction::Lea(a, b) => self.line2("lea", a, b),
            Instruction::Neg(a) => self.line1("neg", a),
            Instruction::Imul(a, b) => self.line2("imul", a, b),
            Instruction::Idiv(a) => self.line1("idiv", a),
            Instruction::Add(a, b) => self.line2("add", a, b),
            Instruction::Sub(a, b) => self.line2("sub", a, b),
            Instruction::Cmp(a, b) => self.line2("cmp", a, b),
            Instruction::Sete(a) => self.line1("sete", a),
            Instruction::Setne(a) => self.line1("setne", a),
            Instruction::Setg(a) => self.line1("setg", a),
            Instruction::Setge(a) => self.line1("setge", a),
            Instruction::Setl(a) => self.line1("setl", a),
            Instruction::Setle(a) => self.line1("setle", a),
            Instruction::Cmove(a, b) => self.line2("cmove", a, b),
            Instruction::Xor(a, b) => self.line2("xor", a, b),
            Instruction::Label(id) => {
                writeln!(self.output, "{id}:").unwrap();
            }
            Instruction::Jmp(l) => {
                writeln!(self.output, "\tjmp {l}").unwrap();
            }
            Instruction::Je(l) => {
                writeln!(self.output, "\tje {l}").unwrap();
            }
            Instruction::Jne(l) => {
                writeln!(self.output, "\tjne {l}").unwrap();
            }
            Instruction::Leave => {
                writeln!(self.output, "\tleave").unwrap();
            }
            Instruction::Ret => {
                writeln!(self.output, "\tret").unwrap();
            }
            Instruction::Call(id) => {
                writeln!(self.output, "\tcall {id}").unwrap();
            }
        }
    }

    fn line1(&mut self, mnemonic: &str, a: &Operand) {
        writeln!(self.output, "\t{mnemonic} {}", render_operand(a, None)).unwrap();
    }

    fn line2(&mut self, mnemonic: &str, a: &Operand, b: &Operand) {
        let width = operand_width(a).or_else(|| operand_width(b));
        writeln!(
            self.output,
            "\t{mnemonic} {}, {}",
            render_operand(a, width),
            render_operand(b, width)
        )
        .unwrap();
    }
}

impl Default for AsmGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders `segments` and writes the result to `asm_path`, then invokes
/// `nasm` via [`crate::linker::assemble`] and deletes the `.asm` on success.
pub fn write_and_assemble(segments: &Segments, asm_path: &Path) -> Result<std::path::PathBuf> {
    let text = AsmGenerator::generate(segments);
    std::fs::write(asm_path, text).map_err(|source| CodeGenError::Write {
        path: asm_path.display().to_string(),
        source,
    })?;
    crate::linker::assemble(asm_path)
}

fn operand_width(op: &Operand) -> Option<RegisterWidth> {
    match op {
        Operand::Reg(_, w) => Some(*w),
        _ => None,
    }
}

/// Memory operands need an explicit NASM size directive whenever neither
/// side of the instruction is itself a sized register (e.g. `mov dword
/// [rbp-4], 5`); `width` carries that hint down from whichever sibling
/// operand supplied it.
fn render_operand(op: &Operand, width: Option<RegisterWidth>) -> String {
    match op {
        Operand::Reg(r, w) => r.rendered_at(*w).to_string(),
        Operand::Imm(v) => v.to_string(),
        Operand::Label(l) => l.clone(),
        Operand::Mem(addr) => {
            let inner = match addr {
                Address::StackRelative { offset } => render_rbp_offset(*offset),
                Address::CallArg { offset } => render_rsp_offset(*offset),
                Address::Global(sym) => sym.as_str().to_string(),
            };
            match width {
                Some(w) => format!("{} [{inner}]", w.nasm_size_directive()),
                None => format!("[{inner}]"),
            }
        }
    }
}

fn render_rbp_offset(offset: i32) -> String {
    match offset.cmp(&0) {
        std::cmp::Ordering::Greater => format!("rbp+{offset}"),
        std::cmp::Ordering::Less => format!("rbp{offset}"),
        std::cmp::Ordering::Equal => "rbp".to_string(),
    }
}

fn render_rsp_offset(offset: i32) -> String {
    match offset.cmp(&0) {
        std::cmp::Ordering::Greater => format!("rsp+{offset}"),
        std::cmp::Ordering::Less => format!("rsp{offset}"),
        std::cmp::Ordering::Equal => "rsp".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lir::StackInfo;
    use faxc_mir::Entry;

    #[test]
    fn header_lists_extern_symbols_before_segments() {
        let mut segments = Segments::new();
        segments.push_ext_lib("printf");
        let text = AsmGenerator::generate(&segments);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "bits 64");
        assert_eq!(lines[1], "default rel");
        assert_eq!(lines[2], "extern printf");
    }

    #[test]
    fn data_declarations_render_as_db() {
        let mut segments = Segments::new();
        segments.push_unique_data("c1".into(), "\"hi\"".into(), "0".into());
        let text = AsmGenerator::generate(&segments);
        assert!(text.contains("c1 db \"hi\", 0"));
    }

    #[test]
    fn every_entry_gets_a_global_directive_and_shared_exit() {
        let mut segments = Segments::new();
        let mut entry = Entry::new("main", "int32", StackInfo::new());
        entry.instructions.push(Instruction::Jmp("exit".to_string()));
        segments.text.push(entry);
        let text = AsmGenerator::generate(&segments);
        assert!(text.contains("global main"));
        assert!(text.contains("exit:\n\tleave\n\tret"));
        assert!(text.contains("main:\n\tjmp exit"));
    }

    #[test]
    fn stack_relative_memory_operand_gets_size_directive_from_register_sibling() {
        let instr = Instruction::Mov(
            Operand::Mem(Address::StackRelative { offset: -4 }),
            Operand::Reg(PhysicalRegister::RAX, RegisterWidth::W32),
        );
        let mut segments = Segments::new();
        let mut entry = Entry::new("main", "int32", StackInfo::new());
        entry.instructions.push(instr);
        segments.text.push(entry);
        let text = AsmGenerator::generate(&segments);
        assert!(text.contains("mov dword [rbp-4], eax"));
    }

    #[test]
    fn call_arg_renders_as_rsp_relative() {
        let instr = Instruction::Mov(
            Operand::Mem(Address::CallArg { offset: 8 }),
            Operand::Reg(PhysicalRegister::RSI, RegisterWidth::W64),
        );
        let mut segments = Segments::new();
        let mut entry = Entry::new("main", "int32", StackInfo::new());
        entry.instructions.push(instr);
        segments.text.push(entry);
        let text = AsmGenerator::generate(&segments);
        assert!(text.contains("mov qword [rsp+8], rsi"));
    }
}
