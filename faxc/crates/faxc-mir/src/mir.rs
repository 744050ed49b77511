//! Segmented IR: `Declaration`, `Instruction`, `Entry`, `Segments`.
//!
//! This is the model `faxc-gen` renders directly to NASM text - no basic
//! blocks, no CFG, no optimization hooks. A program is a handful of flat
//! lists, each deduplicated by its own identity rule.

use faxc_lir::{Operand, StackInfo};

/// A data/bss declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `<id> db <value>, <terminator>`
    Db {
        id: String,
        value: String,
        terminator: String,
    },
    Resb { id: String, count: u32 },
    Resw { id: String, count: u32 },
    Resd { id: String, count: u32 },
    Resq { id: String, count: u32 },
}

impl Declaration {
    fn bss_id(&self) -> Option<&str> {
        match self {
            Declaration::Resb { id, .. }
            | Declaration::Resw { id, .. }
            | Declaration::Resd { id, .. }
            | Declaration::Resq { id, .. } => Some(id),
            Declaration::Db { .. } => None,
        }
    }
}

/// Instruction vocabulary the emitter maps 1:1 to NASM mnemonics.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Push(Operand),
    Mov(Operand, Operand),
    Movsx(Operand, Operand),
    Lea(Operand, Operand),
    Neg(Operand),
    Imul(Operand, Operand),
    Idiv(Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Cmp(Operand, Operand),
    Sete(Operand),
    Setne(Operand),
    Setg(Operand),
    Setge(Operand),
    Setl(Operand),
    Setle(Operand),
    Cmove(Operand, Operand),
    Xor(Operand, Operand),
    Label(String),
    Jmp(String),
    Je(String),
    Jne(String),
    Leave,
    Ret,
    Call(String),
}

/// One function (or, within `labels`, one control-flow block) of text.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub return_type: String,
    pub args_stack: StackInfo,
    pub instructions: Vec<Instruction>,
}

impl Entry {
    pub fn new(id: impl Into<String>, return_type: impl Into<String>, args_stack: StackInfo) -> Self {
        Self {
            id: id.into(),
            return_type: return_type.into(),
            args_stack,
            instructions: Vec::new(),
        }
    }
}

/// The whole program's IR, pre-emission.
#[derive(Debug, Clone, Default)]
pub struct Segments {
    pub data: Vec<Declaration>,
    pub bss: Vec<Declaration>,
    pub text: Vec<Entry>,
    pub labels: Vec<Entry>,
    pub ext_libs: Vec<String>,
}

impl Segments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data entries are deduplicated by `(id, terminator)`.
    pub fn push_unique_data(&mut self, id: String, value: String, terminator: String) {
        let exists = self.data.iter().any(|d| match d {
            Declaration::Db { id: i, terminator: t, .. } => *i == id && *t == terminator,
            _ => false,
        });
        if !exists {
            self.data.push(Declaration::Db { id, value, terminator });
        }
    }

    /// BSS entries are deduplicated by `id`.
    pub fn push_unique_bss(&mut self, decl: Declaration) {
        let id = decl.bss_id().map(|s| s.to_string());
        if let Some(id) = id {
            if self.bss.iter().any(|d| d.bss_id() == Some(id.as_str())) {
                return;
            }
        }
        self.bss.push(decl);
    }

    /// External symbols are deduplicated by string equality.
    pub fn push_ext_lib(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.ext_libs.contains(&name) {
            self.ext_libs.push(name);
        }
    }
}

/// djb2: `h = 5381; h = h * 33 + c` over each byte.
pub fn djb2(input: &str) -> u64 {
    let mut hash: u64 = 5381;
    for byte in input.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    hash
}

/// Mangles a function identifier with its argument type names. `main` is
/// never mangled; everything else becomes `f<hex djb2>`.
pub fn mangle_function(id: &str, arg_type_names: &[String]) -> String {
    if id == "main" {
        return "main".to_string();
    }
    let mut key = id.to_string();
    for t in arg_type_names {
        key.push_str(t);
    }
    format!("f{:x}", djb2(&key))
}

/// Content-addressed data label: `c<hex djb2(value + terminator)>`.
pub fn mangle_data(value: &str, terminator: &str) -> String {
    let mut key = value.to_string();
    key.push_str(terminator);
    format!("c{:x}", djb2(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_is_never_mangled() {
        assert_eq!(mangle_function("main", &[]), "main");
    }

    #[test]
    fn same_identifier_and_args_mangle_identically() {
        let a = mangle_function("add", &["int32".to_string(), "int32".to_string()]);
        let b = mangle_function("add", &["int32".to_string(), "int32".to_string()]);
        assert_eq!(a, b);
        assert!(a.starts_with('f'));
    }

    #[test]
    fn different_arg_types_mangle_differently() {
        let a = mangle_function("add", &["int32".to_string(), "int32".to_string()]);
        let b = mangle_function("add", &["int64".to_string(), "int64".to_string()]);
        assert_ne!(a, b);
    }

    #[test]
    fn data_labels_are_content_addressed() {
        let a = mangle_data("hello", "0");
        let b = mangle_data("hello", "0");
        let c = mangle_data("world", "0");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with('c'));
    }

    #[test]
    fn push_unique_data_deduplicates_by_id_and_terminator() {
        let mut segments = Segments::new();
        segments.push_unique_data("c1".into(), "hello".into(), "0".into());
        segments.push_unique_data("c1".into(), "hello".into(), "0".into());
        assert_eq!(segments.data.len(), 1);
    }

    #[test]
    fn push_unique_bss_deduplicates_by_id() {
        let mut segments = Segments::new();
        segments.push_unique_bss(Declaration::Resb { id: "x".into(), count: 1 });
        segments.push_unique_bss(Declaration::Resb { id: "x".into(), count: 1 });
        assert_eq!(segments.bss.len(), 1);
    }

    #[test]
    fn push_ext_lib_deduplicates_by_equality() {
        let mut segments = Segments::new();
        segments.push_ext_lib("printf");
        segments.push_ext_lib("printf");
        assert_eq!(segments.ext_libs.len(), 1);
    }
}
