use crate::error::BuildError;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Whether the outputs of a target are current relative to its prerequisites.
///
/// Outputs are stale when one of them is missing, or when any prerequisite was
/// modified strictly after any output. Without prerequisites, existing
/// outputs are always current.
pub fn is_up_to_date<P, O>(prerequisites: &[P], outputs: &[O]) -> Result<bool, BuildError>
where
    P: AsRef<Path>,
    O: AsRef<Path>,
{
    if let Some(missing_output) = outputs.iter().find(|output| !output.as_ref().exists()) {
        log::trace!("Output {} is missing", missing_output.as_ref().display());
        return Ok(false);
    }

    let output_mtimes = outputs
        .iter()
        .map(|output| modified(output.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    for prerequisite in prerequisites {
        let prerequisite = prerequisite.as_ref();
        let prerequisite_mtime = modified(prerequisite)?;

        if output_mtimes
            .iter()
            .any(|&output_mtime| prerequisite_mtime > output_mtime)
        {
            log::trace!("Prerequisite {} is newer than outputs", prerequisite.display());
            return Ok(false);
        }
    }

    Ok(true)
}

fn modified(path: &Path) -> Result<SystemTime, BuildError> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|source| BuildError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}
