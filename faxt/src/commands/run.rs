//! Run command implementation.
//!
//! Compiles and links the project like `build`, then executes the linked
//! binary, streaming its stdout/stderr and propagating a non-zero exit as
//! a command failure.

use std::path::PathBuf;
use std::time::Instant;

use faxc_drv::Session;

use crate::commands::pipeline::compile_project;
use crate::commands::traits::{Command, CommandDescription};
use crate::error::Result;

/// Arguments for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Project root directory (default: current directory).
    pub project: Option<PathBuf>,
}

impl RunArgs {
    fn project_dir(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Run command handler.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let project_dir = self.args.project_dir();

        let compiled = compile_project(&project_dir, self.args.verbose)?;
        Session::link_and_maybe_run(&compiled.objects, &compiled.exe_path, true)?;

        if self.args.verbose {
            eprintln!(
                "✅ Finished in {:.2}s",
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(())
    }
}

impl Command for RunCommand {
    type Args = RunArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "run"
    }
}

impl CommandDescription for RunCommand {
    fn description() -> &'static str {
        "Build and run the project"
    }

    fn help() -> &'static str {
        "Compiles and links the project, then executes the resulting binary."
    }
}

/// Run the run command.
pub fn run_run(args: RunArgs) -> Result<()> {
    let command = RunCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_default() {
        let args = RunArgs::default();
        assert!(!args.verbose);
        assert!(args.project.is_none());
    }

    #[test]
    fn test_run_command_name() {
        assert_eq!(<RunCommand as Command>::name(), "run");
    }

    #[test]
    fn test_run_missing_manifest_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let args = RunArgs {
            verbose: false,
            project: Some(temp_dir.path().to_path_buf()),
        };
        let command = RunCommand::new(args);
        assert!(command.run().is_err());
    }
}
