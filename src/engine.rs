use crate::domain::{TargetId, TargetRegistry};
use crate::error::BuildError;
use crate::{resolver, staleness};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Builds registered targets, one at a time.
///
/// Outputs are memoized for the lifetime of the engine: a target reachable
/// through several prerequisite chains is checked and built only once.
pub struct Engine {
    registry: TargetRegistry,
    built_outputs: HashMap<TargetId, Vec<PathBuf>>,
}

impl Engine {
    pub fn new(registry: TargetRegistry) -> Self {
        Self {
            registry,
            built_outputs: HashMap::new(),
        }
    }

    /// Builds every target in declaration order.
    pub fn build_all(&mut self) -> Result<(), BuildError> {
        for target_id in self.registry.ids() {
            self.build(target_id)?;
        }

        Ok(())
    }

    /// Builds the requested targets in the requested order.
    pub fn build_requested(&mut self, requested_targets: &[String]) -> Result<(), BuildError> {
        let unknown_targets: Vec<String> = requested_targets
            .iter()
            .filter(|&requested_target| self.registry.find(requested_target).is_none())
            .cloned()
            .collect();
        if !unknown_targets.is_empty() {
            return Err(BuildError::UnknownTargets {
                names: unknown_targets,
            });
        }

        let target_ids: Vec<TargetId> = requested_targets
            .iter()
            .filter_map(|requested_target| self.registry.find(requested_target))
            .collect();
        for target_id in target_ids {
            self.build(target_id)?;
        }

        Ok(())
    }

    /// Brings a target up to date and returns its outputs.
    ///
    /// Prerequisite targets are built first, depth first. A recipe exiting with
    /// a nonzero status aborts the build of this target and of every target
    /// depending on it.
    pub fn build(&mut self, target_id: TargetId) -> Result<Vec<PathBuf>, BuildError> {
        if let Some(outputs) = self.built_outputs.get(&target_id) {
            log::trace!("{} - Already built", self.registry.get(target_id));
            return Ok(outputs.clone());
        }

        let prerequisites = self.registry.get(target_id).prerequisites.clone();
        log::debug!("{} - Resolving prerequisites", self.registry.get(target_id));
        let resolved = resolver::resolve(&prerequisites, |dependency_id| self.build(dependency_id))?;

        let target = self.registry.get(target_id);
        let recipe = target.recipe.make_recipe(&target.name, &resolved);

        log::trace!("{} - Checking staleness", target.name);
        if staleness::is_up_to_date(&resolved, recipe.outputs())? {
            log::info!("'{}' is up to date.", target.name);
        } else {
            let target_start = Instant::now();
            log::debug!("{} - Running recipe", target.name);

            let status = recipe.run().map_err(|source| BuildError::Recipe {
                target: target.name.clone(),
                source,
            })?;
            if status != 0 {
                return Err(BuildError::recipe_failed(&target.name, Some(status)));
            }

            log::debug!(
                "{} - Built (took: {}ms)",
                target.name,
                target_start.elapsed().as_millis()
            );
        }

        let outputs = recipe.outputs().to_vec();
        self.built_outputs.insert(target_id, outputs.clone());
        Ok(outputs)
    }
}
