//! Stack frame layout: `StackEntry` / `StackInfo`.
//!
//! A `StackInfo` tracks one function's (or scope's) local variables as an
//! insertion-ordered map from name to `StackEntry`. The **bottom** of the
//! stack is the offset past the last-pushed entry; pushing always appends
//! at the current bottom, so entries are never reordered or reused.

use faxc_sem::TypeInfo;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StackFrameError {
    #[error("'{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String },
}

pub type StackFrameResult<T> = Result<T, StackFrameError>;

#[derive(Debug, Clone)]
pub struct StackEntry {
    pub ty: TypeInfo,
    pub offset: i32,
}

#[derive(Debug, Clone, Default)]
pub struct StackInfo {
    pub size: i32,
    pub entries: IndexMap<String, StackEntry>,
}

impl StackInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The offset one past the last-pushed entry, or 0 if empty.
    pub fn bottom(&self) -> i32 {
        self.entries
            .last()
            .map(|(_, entry)| entry.offset + entry.ty.size_bytes as i32)
            .unwrap_or(0)
    }

    /// Appends a new entry at the current bottom. Rejects re-declaration of
    /// a name already present in *this* `StackInfo` - callers construct a
    /// fresh `StackInfo` per scope so shadowing across nested scopes is
    /// unaffected.
    pub fn push(&mut self, name: &str, ty: TypeInfo) -> StackFrameResult<i32> {
        if self.entries.contains_key(name) {
            return Err(StackFrameError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        let offset = self.bottom();
        self.entries.insert(
            name.to_string(),
            StackEntry {
                ty,
                offset,
            },
        );
        self.size = self.bottom();
        Ok(offset)
    }

    pub fn get(&self, name: &str) -> Option<&StackEntry> {
        self.entries.get(name)
    }

    /// Seeds an argument frame starting at +16 (past saved rbp and the
    /// return address), per function-lowering step 3.
    pub fn seed_args(arg_names: &[String], arg_types: &[TypeInfo]) -> StackInfo {
        let mut frame = StackInfo::new();
        let mut offset = 16;
        for (name, ty) in arg_names.iter().zip(arg_types.iter()) {
            frame.entries.insert(
                name.clone(),
                StackEntry {
                    ty: ty.clone(),
                    offset,
                },
            );
            offset += ty.size_bytes as i32;
        }
        frame.size = offset - 16;
        frame
    }

    /// A child scope's frame starts as a copy of the outer frame so lookups
    /// resolve outer locals, but pushes within the child never leak back.
    pub fn child(&self) -> StackInfo {
        self.clone()
    }
}
