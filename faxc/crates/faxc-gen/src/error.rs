//! Error types for assembly emission and the assemble/link pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("failed to write assembly file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit from `nasm` or `gcc`, with the captured stderr.
    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
