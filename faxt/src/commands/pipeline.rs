//! Shared compile pipeline used by the `build` and `run` commands.
//!
//! Enumerates every `*.fax` source named by the project manifest, compiles
//! each through [`faxc_drv::Session`], then hands the resulting object files
//! back to the caller to link (and, for `run`, execute).

use std::path::{Path, PathBuf};

use faxc_drv::Session;

use crate::commands::common::output_messages;
use crate::error::{FaxtError, Result};
use crate::manifest::{self, Manifest};

pub struct CompiledProject {
    pub objects: Vec<PathBuf>,
    pub exe_path: PathBuf,
}

pub fn compile_project(project_root: &Path, verbose: bool) -> Result<CompiledProject> {
    let manifest = Manifest::load(project_root)?;
    let src_dir = manifest.src_dir(project_root);
    let out_dir = manifest.out_dir(project_root);

    let sources = manifest::collect_sources(&src_dir)?;
    if sources.is_empty() {
        return Err(FaxtError::Validation(format!(
            "no .fax sources found under {}",
            src_dir.display()
        )));
    }

    let mut objects = Vec::with_capacity(sources.len());
    for (id, path) in &sources {
        if verbose {
            eprintln!("{} compiling {}", output_messages::INFO, id);
        }
        let mut session = Session::new(path.clone(), out_dir.clone());
        let output = session.compile()?;
        objects.push(output.object);
    }

    let exe_path = out_dir.join(&manifest.project.id);
    Ok(CompiledProject { objects, exe_path })
}
