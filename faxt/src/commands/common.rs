//! Common types and utilities for faxt commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use std::path::{Path, PathBuf};

use crate::error::{FaxtError, Result};

// ============================================================================
// Path Utilities
// ============================================================================

/// Sanitize a user-provided path to prevent path traversal attacks.
///
/// Ensures the resolved path is within the current working directory
/// or an allowed base directory.
///
/// # Arguments
/// * `path` - The user-provided path to sanitize
/// * `base_dir` - The allowed base directory (defaults to current dir)
///
/// # Returns
/// * `Result<PathBuf>` - The sanitized path or an error if traversal detected
#[allow(dead_code)]
pub fn sanitize_path(path: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(|| Path::new("."));
    let base_canonical = base
        .canonicalize()
        .map_err(|e| FaxtError::Validation(format!("Invalid base directory: {}", e)))?;

    let path_canonical = path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, resolve relative to base
        base.join(path).to_path_buf()
    });

    // Ensure the path is within the base directory
    if !path_canonical.starts_with(&base_canonical) {
        return Err(FaxtError::Validation(
            "Path traversal detected: path must be within current directory".to_string(),
        ));
    }

    Ok(path_canonical)
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
///
/// These constants provide consistent output messages across all commands.
pub mod output_messages {
    /// Generic info message format.
    pub const INFO: &str = "ℹ️";

    /// Generic warning message format.
    pub const WARNING: &str = "⚠️";

    /// Message when a directory is created.
    pub const CREATED_DIR: &str = "✅ Created directory:";

    /// Message when a file is created.
    pub const CREATED_FILE: &str = "✅ Created file:";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_path_rejects_traversal_outside_base() {
        let base = TempDir::new().unwrap();
        let outside = Path::new("../../etc/passwd");
        let result = sanitize_path(outside, Some(base.path()));
        assert!(result.is_err() || result.unwrap().starts_with(base.path()));
    }

    #[test]
    fn sanitize_path_accepts_path_within_base() {
        let base = TempDir::new().unwrap();
        std::fs::write(base.path().join("inside.txt"), "content").unwrap();
        let result = sanitize_path(Path::new("inside.txt"), Some(base.path()));
        assert!(result.is_ok());
    }
}
