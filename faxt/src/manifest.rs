//! Project manifest handling.
//!
//! A fax project is described by a `project.json` file in the project root,
//! naming the executable to produce and the source/output directories. The
//! field layout (`project.id`, `detail.src`, `detail.out`) mirrors the
//! manifest the original `los` toolchain reads via `Utils::read_json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FaxtError, Result};

pub const MANIFEST_FILE_NAME: &str = "project.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub project: ProjectSection,
    pub detail: DetailSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSection {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailSection {
    pub src: String,
    pub out: String,
}

impl Manifest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            project: ProjectSection { id: id.into() },
            detail: DetailSection {
                src: "src".to_string(),
                out: "out".to_string(),
            },
        }
    }

    /// Loads `project.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_from_path(&dir.join(MANIFEST_FILE_NAME))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FaxtError::Config(format!(
                "manifest not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolves `detail.src`/`detail.out` relative to the directory the
    /// manifest was loaded from.
    pub fn src_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.detail.src)
    }

    pub fn out_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.detail.out)
    }
}

/// Recursively walks `src_dir` for `*.fax` files, returning each one's path
/// together with its dotted module id (`a/b.fax` -> `a.b`), the way
/// `Utils::get_sources` enumerates `.los` files.
pub fn collect_sources(src_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut sources = Vec::new();
    walk(src_dir, src_dir, &mut sources)?;
    sources.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(sources)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, PathBuf)>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("fax") {
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .with_extension("");
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(".");
            out.push((id, path));
        }
    }
    Ok(())
}
