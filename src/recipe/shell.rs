use super::{exit_code, join_paths, Recipe};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// A script run by the platform shell.
///
/// The script sees its context through the environment variables
/// `CAPE_TARGET`, `CAPE_PREREQUISITES` and `CAPE_OUTPUTS`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ShellOptions {
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
    pub script: String,
}

pub struct ShellRecipe {
    target_name: String,
    script: String,
    prerequisites: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
}

impl ShellRecipe {
    pub fn new(target_name: &str, options: ShellOptions, prerequisites: &[PathBuf]) -> Self {
        Self {
            target_name: target_name.to_string(),
            script: options.script,
            prerequisites: prerequisites.to_vec(),
            outputs: options.outputs,
        }
    }
}

impl Recipe for ShellRecipe {
    fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    fn run(&self) -> Result<i32> {
        let (program, run_arg) = shell();
        let program_name = program.to_string_lossy().into_owned();

        let output = duct::cmd(program, &[run_arg, self.script.as_str()])
            .env("CAPE_TARGET", &self.target_name)
            .env("CAPE_PREREQUISITES", join_paths(&self.prerequisites))
            .env("CAPE_OUTPUTS", join_paths(&self.outputs))
            .unchecked()
            .run()
            .with_context(|| format!("Failed to run script with {}", program_name))?;

        exit_code(&program_name, output.status)
    }
}

fn shell() -> (OsString, &'static str) {
    if cfg!(windows) {
        let comspec = std::env::var_os("COMSPEC").unwrap_or_else(|| "cmd.exe".into());
        (comspec, "/C")
    } else {
        ("/bin/sh".into(), "-ce")
    }
}
