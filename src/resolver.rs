use crate::domain::{Prerequisite, TargetId};
use crate::error::BuildError;
use crate::wildcard;
use std::path::PathBuf;

/// Expands declared prerequisites into concrete paths, in declaration order.
///
/// Target references are handed to `build_target`, which must build (or
/// confirm) the referenced target before its outputs are spliced in. The
/// next prerequisite is only resolved once that call has returned.
pub fn resolve<F>(
    prerequisites: &[Prerequisite],
    mut build_target: F,
) -> Result<Vec<PathBuf>, BuildError>
where
    F: FnMut(TargetId) -> Result<Vec<PathBuf>, BuildError>,
{
    let mut paths = Vec::with_capacity(prerequisites.len());

    for prerequisite in prerequisites {
        match prerequisite {
            Prerequisite::Path(path) => paths.push(path.clone()),
            Prerequisite::Wildcard(pattern) => paths.extend(wildcard::expand(pattern)?),
            Prerequisite::Target(target_id) => paths.extend(build_target(*target_id)?),
        }
    }

    Ok(paths)
}
