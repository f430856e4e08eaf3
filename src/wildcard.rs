use crate::error::BuildError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name template of a wildcard pattern.
#[derive(Debug, PartialEq)]
enum Template<'a> {
    /// `prefix*suffix`, matched directly inside the base directory.
    Flat { prefix: &'a str, suffix: &'a str },
    /// `prefix*middle*suffix`, matched anywhere below the base directory.
    Recursive {
        prefix: &'a str,
        middle: &'a str,
        suffix: &'a str,
    },
}

impl<'a> Template<'a> {
    fn parse(pattern: &str, template: &'a str) -> Result<Self, BuildError> {
        let asterisks = template.matches('*').count();
        match asterisks {
            1 => {
                let (prefix, suffix) = template.split_once('*').unwrap_or((template, ""));
                Ok(Template::Flat { prefix, suffix })
            }
            2 => {
                let first = template.find('*').unwrap_or(0);
                let last = template.rfind('*').unwrap_or(0);
                Ok(Template::Recursive {
                    prefix: &template[..first],
                    middle: &template[first + 1..last],
                    suffix: &template[last + 1..],
                })
            }
            _ => Err(BuildError::MalformedPattern {
                pattern: pattern.to_string(),
                asterisks,
            }),
        }
    }

    fn max_depth(&self) -> usize {
        match self {
            Template::Flat { .. } => 1,
            Template::Recursive { .. } => usize::MAX,
        }
    }

    fn matches(&self, file_name: &str) -> bool {
        match *self {
            Template::Flat { prefix, suffix } => {
                file_name.starts_with(prefix) && file_name.ends_with(suffix)
            }
            Template::Recursive {
                prefix,
                middle,
                suffix,
            } => {
                file_name.starts_with(prefix)
                    && file_name.contains(middle)
                    && file_name.ends_with(suffix)
            }
        }
    }
}

/// Splits a pattern into its base directory and its file name template.
fn split_pattern(pattern: &str) -> (&str, &str) {
    match pattern.rfind('/') {
        Some(0) => ("/", &pattern[1..]),
        Some(last_slash) => (&pattern[..last_slash], &pattern[last_slash + 1..]),
        None => ("", pattern),
    }
}

/// Lists the files matching a wildcard pattern, sorted by walk order.
///
/// With one `*`, only files directly inside the base directory are considered.
/// With two, the whole subtree is. The pattern is validated before the
/// filesystem is touched.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>, BuildError> {
    let (base_dir, template) = split_pattern(pattern);
    let template = Template::parse(pattern, template)?;

    let walk_root = if base_dir.is_empty() {
        Path::new(".")
    } else {
        Path::new(base_dir)
    };

    let files = WalkDir::new(walk_root)
        .min_depth(1)
        .max_depth(template.max_depth())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Err(e) => {
                log::debug!("Failed to walk dir: {}", e);
                None
            }
            Ok(entry) => Some(entry),
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(false, |file_name| template.matches(file_name))
        })
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .map(|path| {
            if base_dir.is_empty() {
                path.strip_prefix(walk_root)
                    .map(Path::to_path_buf)
                    .unwrap_or(path)
            } else {
                path
            }
        })
        .collect();

    Ok(files)
}
