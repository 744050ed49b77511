//! faxc-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation shared by every stage of the faxc
//! pipeline: string interning (`symbol`), diagnostic reporting
//! (`diagnostic`), source location tracking (`span`), typed vectors
//! (`index_vec`), and definition identity (`def_id`).
//!
//! Downstream crates depend on this crate alone for these concerns rather
//! than rolling their own - a lexer, parser, or code generator that needs
//! to report an error always goes through [`diagnostic::Handler`].

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{
    ColorConfig, Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, LabelStyle, Level,
    SourceSnippet,
};
pub use error::{
    DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError,
    SourceMapResult, SymbolError, SymbolResult,
};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{Symbol, SymbolPretty};

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
