use crate::error::BuildError;
use crate::recipe::RecipeFactory;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub type TargetId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prerequisite {
    Path(PathBuf),
    Wildcard(String),
    Target(TargetId),
}

impl Prerequisite {
    /// Classifies a path string: any `*` makes it a wildcard pattern.
    pub fn from_path_str(path: &str) -> Self {
        if path.contains('*') {
            Prerequisite::Wildcard(path.to_string())
        } else {
            Prerequisite::Path(PathBuf::from(path))
        }
    }
}

pub struct Target {
    pub id: TargetId,
    pub name: String,
    pub prerequisites: Vec<Prerequisite>,
    pub recipe: Box<dyn RecipeFactory>,
}

impl fmt::Display for Target {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.name)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Target")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("prerequisites", &self.prerequisites)
            .finish()
    }
}

/// Targets in declaration order.
///
/// A target may only reference targets registered before it, which keeps the
/// prerequisite graph acyclic.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    ids: HashMap<String, TargetId>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        prerequisites: Vec<Prerequisite>,
        recipe: Box<dyn RecipeFactory>,
    ) -> Result<TargetId, BuildError> {
        if self.ids.contains_key(name) {
            return Err(BuildError::DuplicateTarget {
                name: name.to_string(),
            });
        }

        let declared = self.targets.len();
        if let Some(unknown_id) = prerequisites.iter().find_map(|prerequisite| match prerequisite {
            Prerequisite::Target(id) if *id >= declared => Some(*id),
            _ => None,
        }) {
            return Err(BuildError::UnknownTarget {
                target: name.to_string(),
                reference: format!("target #{}", unknown_id),
            });
        }

        let id = self.targets.len();
        self.ids.insert(name.to_string(), id);
        self.targets.push(Target {
            id,
            name: name.to_string(),
            prerequisites,
            recipe,
        });

        Ok(id)
    }

    /// Looks up a reference from `target` to a previously declared target.
    pub fn reference(&self, target: &str, reference: &str) -> Result<Prerequisite, BuildError> {
        self.find(reference)
            .map(Prerequisite::Target)
            .ok_or_else(|| BuildError::UnknownTarget {
                target: target.to_string(),
                reference: reference.to_string(),
            })
    }

    pub fn find(&self, name: &str) -> Option<TargetId> {
        self.ids.get(name).copied()
    }

    pub fn get(&self, id: TargetId) -> &Target {
        &self.targets[id]
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TargetId> {
        0..self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Prerequisite, TargetRegistry};
    use crate::error::BuildError;
    use crate::recipe::tests::NoopRecipeFactory;
    use std::path::PathBuf;

    #[test]
    fn test_from_path_str() {
        assert_eq!(
            Prerequisite::from_path_str("src/main.c"),
            Prerequisite::Path(PathBuf::from("src/main.c"))
        );
        assert_eq!(
            Prerequisite::from_path_str("src/*.c"),
            Prerequisite::Wildcard("src/*.c".to_string())
        );
        assert_eq!(
            Prerequisite::from_path_str("src/***"),
            Prerequisite::Wildcard("src/***".to_string()),
            "Malformed patterns are still wildcards, rejected on expansion"
        );
    }

    #[test]
    fn test_register_assigns_ids_in_declaration_order() {
        let mut registry = TargetRegistry::new();
        let objects = registry
            .register("objects", vec![], Box::new(NoopRecipeFactory))
            .unwrap();
        let app = registry
            .register(
                "app",
                vec![Prerequisite::Target(objects)],
                Box::new(NoopRecipeFactory),
            )
            .unwrap();

        assert_eq!((objects, app), (0, 1));
        assert_eq!(registry.find("app"), Some(app));
        assert_eq!(registry.get(app).name, "app");
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let mut registry = TargetRegistry::new();
        registry
            .register("app", vec![], Box::new(NoopRecipeFactory))
            .unwrap();

        let error = registry
            .register("app", vec![], Box::new(NoopRecipeFactory))
            .expect_err("Duplicate target names should be rejected");
        assert!(matches!(error, BuildError::DuplicateTarget { ref name } if name == "app"));
        assert_eq!(registry.ids().count(), 1);
    }

    #[test]
    fn test_register_rejects_forward_references() {
        let mut registry = TargetRegistry::new();
        let error = registry
            .register("app", vec![Prerequisite::Target(0)], Box::new(NoopRecipeFactory))
            .expect_err("A target cannot reference itself or a later target");
        assert_eq!(
            error.to_string(),
            "target 'app' references 'target #0', which is not declared before it"
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reference_to_undeclared_target() {
        let registry = TargetRegistry::new();
        let error = registry.reference("app", "objects").unwrap_err();
        assert_eq!(
            error.to_string(),
            "target 'app' references 'objects', which is not declared before it"
        );
    }
}
