use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("malformed wildcard pattern {pattern} (expected 1 or 2 '*', found {asterisks})")]
    MalformedPattern { pattern: String, asterisks: usize },

    #[error("invalid prerequisite type {kind} in target '{target}'")]
    InvalidPrerequisite { target: String, kind: &'static str },

    #[error("attempted to report a build failure of '{target}' with success exit code 0")]
    InvalidErrorConstruction { target: String },

    /// `status` is `None` when the caller knows the recipe failed but not its
    /// exit code. The bundled recipes always report a code, and a recipe killed
    /// by a signal surfaces as [`BuildError::Recipe`].
    #[error("*** building '{target}' failed{}", exit_code_suffix(.status))]
    RecipeFailed { target: String, status: Option<i32> },

    #[error("*** building '{target}' failed")]
    Recipe {
        target: String,
        source: anyhow::Error,
    },

    #[error("failed to read modification time of {}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("target '{name}' is declared more than once")]
    DuplicateTarget { name: String },

    #[error("target '{target}' references '{reference}', which is not declared before it")]
    UnknownTarget { target: String, reference: String },

    #[error("invalid targets: {}", .names.join(", "))]
    UnknownTargets { names: Vec<String> },
}

impl BuildError {
    /// Reports a recipe failure.
    ///
    /// A zero status is a success and cannot describe a failure: it yields
    /// [`BuildError::InvalidErrorConstruction`] instead.
    pub fn recipe_failed(target: &str, status: Option<i32>) -> Self {
        match status {
            Some(0) => BuildError::InvalidErrorConstruction {
                target: target.to_string(),
            },
            status => BuildError::RecipeFailed {
                target: target.to_string(),
                status,
            },
        }
    }
}

fn exit_code_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}
