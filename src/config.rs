use crate::domain::{Prerequisite, TargetRegistry};
use crate::error::BuildError;
use crate::recipe::RecipeConfig;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs::File;
use std::path::Path;

/// Schema of a build file (`cape.yml` by default).
///
/// __Example__
///
/// ```yaml
/// targets:
///   - name: objects
///     prerequisites: ["src/*.c", "include/**.h"]
///     recipe:
///       shell:
///         outputs: [build/objects.stamp]
///         script: cc -c $CAPE_PREREQUISITES && touch build/objects.stamp
///
///   - name: app
///     prerequisites: [{ target: objects }, "src/**.c"]
///     recipe:
///       cc:
///         output: app
///         include_dirs: [include]
/// ```
///
/// Targets are built in the order they are declared, and may only reference
/// targets declared above them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    /// Literal paths, wildcard patterns (paths containing `*`),
    /// or references to other targets (`{ target: <name> }`).
    #[serde(default)]
    pub prerequisites: Vec<Value>,
    /// `recipe: { <kind>: <options> }`, a single-key mapping.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub recipe: RecipeConfig,
}

impl Config {
    pub fn load(config_file_path: &Path) -> Result<Self> {
        let config_file = File::open(config_file_path).with_context(|| {
            format!("Failed to open build file {}", config_file_path.display())
        })?;
        let config: Config = serde_yaml::from_reader(config_file)
            .with_context(|| format!("Invalid format for {}", config_file_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(invalid_target) = self
            .targets
            .iter()
            .find(|&target| !is_valid_target_name(&target.name))
        {
            return Err(anyhow::anyhow!(
                "{} is not a valid target name",
                invalid_target.name
            ));
        }

        Ok(())
    }

    pub fn list_target_names(&self) -> Vec<String> {
        self.targets
            .iter()
            .map(|target| target.name.clone())
            .collect()
    }

    /// Registers the targets in declaration order.
    pub fn into_registry(self) -> Result<TargetRegistry, BuildError> {
        let mut registry = TargetRegistry::new();

        for TargetConfig {
            name,
            prerequisites,
            recipe,
        } in self.targets
        {
            let prerequisites = prerequisites
                .iter()
                .map(|value| parse_prerequisite(&registry, &name, value))
                .collect::<Result<Vec<_>, _>>()?;
            registry.register(&name, prerequisites, Box::new(recipe))?;
        }

        Ok(registry)
    }
}

fn parse_prerequisite(
    registry: &TargetRegistry,
    target_name: &str,
    value: &Value,
) -> Result<Prerequisite, BuildError> {
    match value {
        Value::String(path) => Ok(Prerequisite::from_path_str(path)),
        Value::Mapping(mapping) if mapping.len() == 1 => match mapping.get("target") {
            Some(Value::String(reference)) => registry.reference(target_name, reference),
            _ => Err(invalid_prerequisite(target_name, value)),
        },
        _ => Err(invalid_prerequisite(target_name, value)),
    }
}

fn invalid_prerequisite(target_name: &str, value: &Value) -> BuildError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    };

    BuildError::InvalidPrerequisite {
        target: target_name.to_string(),
        kind,
    }
}

pub fn is_valid_target_name(target_name: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\w[-\w]*$").unwrap();
    }
    RE.is_match(target_name)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_target_name, Config};
    use crate::domain::Prerequisite;
    use crate::error::BuildError;
    use crate::recipe::{RecipeConfig, ShellOptions};
    use std::fs;
    use std::path::PathBuf;

    fn parse(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).expect("Build file should be well formed")
    }

    #[test]
    fn test_is_valid_target_name() {
        assert!(
            is_valid_target_name("my-target"),
            "A target name can contain letters and hyphens"
        );
        assert!(
            is_valid_target_name("007"),
            "A target name can contain numbers"
        );
        assert!(
            is_valid_target_name("_hidden_target"),
            "A target name can start with underscore"
        );

        assert!(
            !is_valid_target_name("-"),
            "A target name cannot start with an hyphen"
        );
        assert!(!is_valid_target_name(""), "A target name cannot be empty");
    }

    #[test]
    fn test_parse_recipes() {
        let config = parse(
            r#"
targets:
  - name: objects
    recipe:
      cc:
        output: main.o
        compile_only: true
        defines: [NDEBUG]
  - name: app
    recipe:
      shell:
        outputs: [app]
        script: cc -o app $CAPE_PREREQUISITES
"#,
        );

        assert_eq!(config.list_target_names(), vec!["objects", "app"]);
        match &config.targets[0].recipe {
            RecipeConfig::Cc(options) => {
                assert_eq!(options.output, PathBuf::from("main.o"));
                assert!(options.compile_only);
                assert!(!options.symbols);
                assert_eq!(options.defines, vec!["NDEBUG"]);
                assert!(options.libraries.is_empty());
            }
            other => panic!("Unexpected recipe {:?}", other),
        }
        assert_eq!(
            config.targets[1].recipe,
            RecipeConfig::Shell(ShellOptions {
                outputs: vec![PathBuf::from("app")],
                script: "cc -o app $CAPE_PREREQUISITES".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_recipe_options() {
        let result = serde_yaml::from_str::<Config>(
            r#"
targets:
  - name: app
    recipe:
      shell:
        script: "true"
        timeout: 10
"#,
        );

        assert!(result.is_err(), "Unknown recipe options should be rejected");
    }

    #[test]
    fn test_into_registry_classifies_prerequisites() {
        let registry = parse(
            r#"
targets:
  - name: objects
    recipe:
      shell: { script: "true" }
  - name: app
    prerequisites: [main.c, "src/*.c", { target: objects }]
    recipe:
      shell: { script: "true" }
"#,
        )
        .into_registry()
        .unwrap();

        let app = registry.get(registry.find("app").unwrap());
        assert_eq!(
            app.prerequisites,
            vec![
                Prerequisite::Path(PathBuf::from("main.c")),
                Prerequisite::Wildcard("src/*.c".to_string()),
                Prerequisite::Target(0),
            ]
        );
    }

    #[test]
    fn test_into_registry_rejects_invalid_prerequisite_types() {
        for (prerequisite, kind) in &[
            ("42", "number"),
            ("true", "boolean"),
            ("[a.c]", "sequence"),
            ("{ path: a.c }", "mapping"),
            ("null", "null"),
        ] {
            let yaml = format!(
                "targets:\n  - name: app\n    prerequisites: [{}]\n    recipe:\n      shell: {{ script: \"true\" }}\n",
                prerequisite
            );

            let error = parse(&yaml).into_registry().unwrap_err();
            assert!(
                matches!(error, BuildError::InvalidPrerequisite { kind: actual, .. } if actual == *kind),
                "Unexpected error for {}: {}",
                prerequisite,
                error
            );
        }
    }

    #[test]
    fn test_into_registry_rejects_references_to_later_targets() {
        let error = parse(
            r#"
targets:
  - name: app
    prerequisites: [{ target: objects }]
    recipe:
      shell: { script: "true" }
  - name: objects
    recipe:
      shell: { script: "true" }
"#,
        )
        .into_registry()
        .unwrap_err();

        assert!(matches!(
            error,
            BuildError::UnknownTarget { ref target, ref reference } if target == "app" && reference == "objects"
        ));
    }

    #[test]
    fn test_into_registry_rejects_duplicate_targets() {
        let error = parse(
            r#"
targets:
  - name: app
    recipe:
      shell: { script: "true" }
  - name: app
    recipe:
      shell: { script: "false" }
"#,
        )
        .into_registry()
        .unwrap_err();

        assert!(matches!(error, BuildError::DuplicateTarget { ref name } if name == "app"));
    }

    #[test]
    fn test_load_rejects_invalid_target_names() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("cape.yml");
        fs::write(
            &config_file,
            "targets:\n  - name: \"-bad\"\n    recipe:\n      shell: { script: \"true\" }\n",
        )
        .unwrap();

        let error = Config::load(&config_file).unwrap_err();
        assert_eq!(error.to_string(), "-bad is not a valid target name");
    }

    #[test]
    fn test_load_reads_recipe_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("cape.yml");
        fs::write(
            &config_file,
            r#"
targets:
  - name: objects
    recipe: { cc: { output: main.o, compile_only: true } }
  - name: app
    prerequisites: [{ target: objects }]
    recipe:
      shell:
        outputs: [app]
        script: cc -o app main.o
"#,
        )
        .unwrap();

        let config = Config::load(&config_file).unwrap();
        assert!(matches!(config.targets[0].recipe, RecipeConfig::Cc(_)));
        assert!(matches!(config.targets[1].recipe, RecipeConfig::Shell(_)));

        let registry = config.into_registry().unwrap();
        assert_eq!(
            registry.get(registry.find("app").unwrap()).prerequisites,
            vec![Prerequisite::Target(0)]
        );
    }

    #[test]
    fn test_load_reports_missing_build_file() {
        let dir = tempfile::tempdir().unwrap();

        let error = Config::load(&dir.path().join("cape.yml")).unwrap_err();
        assert!(error.to_string().starts_with("Failed to open build file"));
    }
}
