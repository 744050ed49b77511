//! Build command implementation.
//!
//! Compiles every source named by the project manifest and links the
//! resulting objects into an executable, without running it.

use std::path::PathBuf;
use std::time::Instant;

use faxc_drv::Session;

use crate::commands::pipeline::compile_project;
use crate::commands::traits::{Command, CommandDescription};
use crate::error::Result;

/// Arguments for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Project root directory (default: current directory).
    pub project: Option<PathBuf>,
}

impl BuildArgs {
    fn project_dir(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Build command handler.
pub struct BuildCommand {
    args: BuildArgs,
}

impl BuildCommand {
    pub fn new(args: BuildArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let project_dir = self.args.project_dir();

        let compiled = compile_project(&project_dir, self.args.verbose)?;
        Session::link_and_maybe_run(&compiled.objects, &compiled.exe_path, false)?;

        if self.args.verbose {
            eprintln!(
                "✅ Build completed in {:.2}s -> {}",
                start_time.elapsed().as_secs_f64(),
                compiled.exe_path.display()
            );
        }

        Ok(())
    }
}

impl Command for BuildCommand {
    type Args = BuildArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "build"
    }
}

impl CommandDescription for BuildCommand {
    fn description() -> &'static str {
        "Compile and link the project"
    }

    fn help() -> &'static str {
        "Compiles every .fax source named by project.json and links the \
         resulting objects into an executable."
    }
}

/// Run the build command.
pub fn run_build(args: BuildArgs) -> Result<()> {
    let command = BuildCommand::new(args);
    command.run()
}
