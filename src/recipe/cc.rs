use super::{exit_code, Recipe};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;

const COMPILER: &str = "cc";

/// Options of a C compiler invocation.
///
/// Every resolved prerequisite of the target is passed to the compiler as an input.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CcOptions {
    /// File produced by the compiler (`-o`).
    pub output: PathBuf,
    /// Compile without linking (`-c`).
    #[serde(default)]
    pub compile_only: bool,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub library_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Emit debug symbols (`-g`).
    #[serde(default)]
    pub symbols: bool,
}

pub struct CcRecipe {
    options: CcOptions,
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
}

impl CcRecipe {
    pub fn new(options: CcOptions, prerequisites: &[PathBuf]) -> Self {
        let outputs = vec![options.output.clone()];
        Self {
            options,
            inputs: prerequisites.to_vec(),
            outputs,
        }
    }

    fn args(&self) -> Vec<OsString> {
        let options = &self.options;
        let mut args: Vec<OsString> = Vec::new();

        if options.compile_only {
            args.push("-c".into());
        }
        args.extend(self.inputs.iter().map(OsString::from));
        for define in &options.defines {
            args.push("-D".into());
            args.push(define.into());
        }
        for dir in &options.include_dirs {
            args.push("-I".into());
            args.push(dir.into());
        }
        for dir in &options.library_dirs {
            args.push("-L".into());
            args.push(dir.into());
        }
        args.extend(
            options
                .libraries
                .iter()
                .map(|library| OsString::from(format!("-l{}", library))),
        );
        if options.symbols {
            args.push("-g".into());
        }
        args.push("-o".into());
        args.push(options.output.clone().into());

        args
    }
}

impl Recipe for CcRecipe {
    fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    fn run(&self) -> Result<i32> {
        if !cfg!(unix) {
            return Err(anyhow::anyhow!(
                "The {} recipe is only supported on POSIX platforms",
                COMPILER
            ));
        }

        let args = self.args();
        log::debug!(
            "Running {} {}",
            COMPILER,
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = duct::cmd(COMPILER, args)
            .unchecked()
            .run()
            .with_context(|| format!("Failed to run {}", COMPILER))?;

        exit_code(COMPILER, output.status)
    }
}
