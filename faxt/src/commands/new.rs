//! New command implementation.
//!
//! Scaffolds a fresh fax project: a `project.json` manifest plus a
//! `src/main.fax` entry point, the minimal shape `build`/`run` expect.

use std::path::{Path, PathBuf};

use crate::commands::common::output_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::error::{FaxtError, Result};
use crate::manifest::Manifest;

const MAIN_FAX_TEMPLATE: &str = "int32 main() {\n    println(\"hello, world\");\n    return 0;\n}\n";

/// Arguments for the new command.
#[derive(Debug, Clone)]
pub struct NewArgs {
    /// Project id; also becomes the produced executable's name.
    pub id: String,
    /// Directory to create the project in (default: `./<id>`).
    pub path: Option<PathBuf>,
    /// Overwrite an existing, non-empty directory.
    pub force: bool,
    /// Enable verbose output.
    pub verbose: bool,
}

/// New command handler.
pub struct NewCommand {
    args: NewArgs,
}

impl NewCommand {
    pub fn new(args: NewArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let root = self.target_dir();
        self.validate_directory(&root)?;

        let src_dir = root.join("src");
        std::fs::create_dir_all(&src_dir)?;

        let manifest = Manifest::new(self.args.id.clone());
        manifest.save_to_path(&root.join("project.json"))?;

        let main_path = src_dir.join("main.fax");
        if !main_path.exists() {
            std::fs::write(&main_path, MAIN_FAX_TEMPLATE)?;
        }

        if self.args.verbose {
            eprintln!(
                "{} {}",
                output_messages::CREATED_DIR,
                root.display()
            );
            eprintln!(
                "{} {}",
                output_messages::CREATED_FILE,
                main_path.display()
            );
        }

        Ok(())
    }

    fn target_dir(&self) -> PathBuf {
        self.args
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.args.id))
    }

    fn validate_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        if !path.is_dir() {
            return Err(FaxtError::Validation(format!(
                "target path is not a directory: {}",
                path.display()
            )));
        }

        let is_empty = std::fs::read_dir(path)?.next().is_none();
        if !is_empty && !self.args.force {
            return Err(FaxtError::Validation(format!(
                "directory is not empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Command for NewCommand {
    type Args = NewArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "new"
    }
}

impl CommandDescription for NewCommand {
    fn description() -> &'static str {
        "Scaffold a new fax project"
    }

    fn help() -> &'static str {
        "Creates a project.json manifest and a src/main.fax entry point \
         in the target directory."
    }
}

/// Run the new command.
pub fn run_new(args: NewArgs) -> Result<()> {
    let command = NewCommand::new(args);
    command.run()
}
