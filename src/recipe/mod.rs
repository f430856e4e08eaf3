mod cc;
mod shell;

use anyhow::Result;
pub use cc::{CcOptions, CcRecipe};
use serde::Deserialize;
pub use shell::{ShellOptions, ShellRecipe};
use std::path::PathBuf;
use std::process::ExitStatus;

/// The action producing a target's outputs.
pub trait Recipe {
    fn outputs(&self) -> &[PathBuf];

    /// Runs to completion and returns the exit status.
    fn run(&self) -> Result<i32>;
}

/// Builds the recipe of a target once its prerequisites are resolved.
pub trait RecipeFactory {
    fn make_recipe(&self, target_name: &str, prerequisites: &[PathBuf]) -> Box<dyn Recipe>;
}

impl<F> RecipeFactory for F
where
    F: Fn(&str, &[PathBuf]) -> Box<dyn Recipe>,
{
    fn make_recipe(&self, target_name: &str, prerequisites: &[PathBuf]) -> Box<dyn Recipe> {
        self(target_name, prerequisites)
    }
}

/// Recipe kinds available from a build file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RecipeConfig {
    Cc(CcOptions),
    Shell(ShellOptions),
}

impl RecipeFactory for RecipeConfig {
    fn make_recipe(&self, target_name: &str, prerequisites: &[PathBuf]) -> Box<dyn Recipe> {
        match self {
            RecipeConfig::Cc(options) => Box::new(CcRecipe::new(options.clone(), prerequisites)),
            RecipeConfig::Shell(options) => Box::new(ShellRecipe::new(
                target_name,
                options.clone(),
                prerequisites,
            )),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn exit_code(program: &str, status: ExitStatus) -> Result<i32> {
    status
        .code()
        .ok_or_else(|| anyhow::anyhow!("{} was terminated by a signal", program))
}
