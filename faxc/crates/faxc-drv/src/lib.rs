//! faxc-drv - Compiler driver
//!
//! Drives the pipeline stages in order (read source -> lex -> parse -> sema
//! -> IR generation -> emit -> assemble -> link), short-circuiting on the
//! first stage that fails. `Session` owns the diagnostic `Handler` and
//! `SourceMap` for the whole invocation; each file is otherwise a pure
//! function of its own token vector, leaving the door open for a
//! `rayon`-parallel multi-file driver without requiring one.

use faxc_gen::CodeGenError;
use faxc_lex::{LexError, Lexer};
use faxc_mir::{IrError, IrGenerator};
use faxc_par::{ParseError, Parser};
use faxc_sem::{check_items, SemaError};
use faxc_util::diagnostic::{Handler, Span};
use faxc_util::span::SourceMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("semantic error: {0}")]
    Sema(#[from] SemaError),
    #[error("codegen error: {0}")]
    Ir(#[from] IrError),
    #[error("emission error: {0}")]
    CodeGen(#[from] CodeGenError),
    #[error("linked binary exited with status {0}")]
    RunFailed(i32),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// What a successful [`Session::compile`] run produces.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub object: PathBuf,
}

/// One invocation of the compiler over a single source file.
///
/// The teacher's `faxc-drv` supported many source files per session; the
/// `fax` language has no module-spanning link step (every file compiles to
/// its own `main`), so a `Session` is scoped to one source -> one object.
pub struct Session {
    pub source_path: PathBuf,
    pub out_dir: PathBuf,
    pub handler: Handler,
    pub sources: SourceMap,
}

impl Session {
    pub fn new(source_path: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            out_dir: out_dir.into(),
            handler: Handler::new(),
            sources: SourceMap::new(),
        }
    }

    /// Runs every stage through assembly + object emission. Does not link;
    /// the caller (typically `faxt`) collects objects across files and
    /// invokes [`faxc_gen::Linker::link`] once.
    pub fn compile(&mut self) -> CompileResult<CompileOutput> {
        let text = std::fs::read_to_string(&self.source_path).map_err(|source| {
            CompileError::Io {
                path: self.source_path.display().to_string(),
                source,
            }
        })?;

        tracing::debug!(path = %self.source_path.display(), "lexing");
        let tokens = Lexer::new(&text, &self.handler).tokenize()?;

        tracing::debug!("parsing");
        let items = Parser::new(tokens, &self.handler).parse()?;

        tracing::debug!("checking scopes");
        check_items(&items)?;

        tracing::debug!("generating IR");
        let segments = IrGenerator::generate(&items)?;

        std::fs::create_dir_all(&self.out_dir).map_err(|source| CompileError::Io {
            path: self.out_dir.display().to_string(),
            source,
        })?;
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let asm_path = self.out_dir.join(format!("{stem}.asm"));

        tracing::debug!(path = %asm_path.display(), "emitting assembly");
        let object = faxc_gen::write_and_assemble(&segments, &asm_path)?;

        Ok(CompileOutput { object })
    }

    /// Links `objects` into `exe_path` and, if `run` is set, executes it,
    /// streaming its stdout/stderr through and surfacing a non-zero exit as
    /// [`CompileError::RunFailed`].
    pub fn link_and_maybe_run(
        objects: &[PathBuf],
        exe_path: &Path,
        run: bool,
    ) -> CompileResult<()> {
        faxc_gen::Linker::link(objects, exe_path)?;
        if run {
            tracing::debug!(path = %exe_path.display(), "running");
            let status = std::process::Command::new(exe_path)
                .status()
                .map_err(|source| CompileError::Io {
                    path: exe_path.display().to_string(),
                    source,
                })?;
            if !status.success() {
                return Err(CompileError::RunFailed(status.code().unwrap_or(-1)));
            }
        }
        Ok(())
    }
}

/// Reports every diagnostic accumulated in `handler` to stderr via
/// `tracing`, at `error`/`warning` level matching each diagnostic's own
/// severity.
pub fn report_diagnostics(handler: &Handler) {
    for diag in handler.diagnostics() {
        match diag.level {
            faxc_util::diagnostic::Level::Error => tracing::error!("{}", diag.message),
            faxc_util::diagnostic::Level::Warning => tracing::warn!("{}", diag.message),
            _ => tracing::info!("{}", diag.message),
        }
    }
}

pub const DUMMY_SPAN: Span = Span::DUMMY;
