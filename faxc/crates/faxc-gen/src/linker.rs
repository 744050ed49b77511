//! Invokes the external `nasm` assembler and `gcc` linker.

use crate::error::{CodeGenError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Assembles `asm_path` (a `.asm` file already written to disk) into a
/// `.o` object next to it via `nasm`, then deletes the `.asm` source.
pub fn assemble(asm_path: &Path) -> Result<PathBuf> {
    let obj_path = asm_path.with_extension("o");
    let args = [
        "-f",
        "win64",
        "-g",
        "-o",
        obj_path.to_str().unwrap_or_default(),
        asm_path.to_str().unwrap_or_default(),
    ];
    tracing::debug!(tool = "nasm", ?args, "assembling");

    let output = Command::new("nasm")
        .args(args)
        .output()
        .map_err(|source| CodeGenError::Spawn {
            tool: "nasm".to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(CodeGenError::ToolFailed {
            tool: "nasm".to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let _ = std::fs::remove_file(asm_path);
    Ok(obj_path)
}

pub struct Linker;

impl Linker {
    /// Links `objects` into `output` via `gcc -m64 -g <objs> -o <output>`.
    pub fn link(objects: &[PathBuf], output: &Path) -> Result<()> {
        let mut args: Vec<String> = vec!["-m64".to_string(), "-g".to_string()];
        for obj in objects {
            args.push(obj.to_string_lossy().into_owned());
        }
        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());

        tracing::debug!(tool = "gcc", ?args, "linking");

        let cmd_output = Command::new("gcc")
            .args(&args)
            .output()
            .map_err(|source| CodeGenError::Spawn {
                tool: "gcc".to_string(),
                source,
            })?;

        if !cmd_output.status.success() {
            return Err(CodeGenError::ToolFailed {
                tool: "gcc".to_string(),
                status: cmd_output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&cmd_output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
