//! Decides which source files belong to the traced workspace
//!
//! Files outside the workspace root, inside library install areas, or with no
//! real path are out of scope. Malformed paths are never an error; they are
//! simply not traced.
//!
//! `file!()` paths are relative to the directory cargo ran the compiler in,
//! not to the workspace root, so relative paths are resolved against a
//! separate source base (the startup directory by default).

use crate::config::{self, TracerConfig};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocationFilter {
    workspace_root: PathBuf,
    source_base: PathBuf,
    library_markers: Vec<Vec<String>>,
}

impl LocationFilter {
    /// Create a filter for `workspace_root`.
    ///
    /// Relative source paths, and a relative root, are resolved against the
    /// startup directory when it can be read.
    pub fn new(workspace_root: impl AsRef<Path>, library_markers: &[String]) -> Self {
        let root = workspace_root.as_ref();
        let base = config::startup_dir().unwrap_or_else(|_| root.to_path_buf());
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            base.join(root)
        };

        Self {
            workspace_root: normalize(&root),
            source_base: normalize(&base),
            library_markers: library_markers
                .iter()
                .map(|marker| component_names(Path::new(marker)))
                .filter(|components| !components.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &TracerConfig) -> Self {
        Self::new(&config.workspace_root, &config.library_markers)
            .with_source_base(&config.source_base)
    }

    /// Resolve relative source paths against `base` instead.
    pub fn with_source_base(mut self, base: impl AsRef<Path>) -> Self {
        self.source_base = normalize(base.as_ref());
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn is_in_scope(&self, file: &str) -> bool {
        self.relative_path(file).is_some()
    }

    /// The workspace-relative path of `file` (with `/` separators), or `None`
    /// when the file is out of scope.
    pub fn relative_path(&self, file: &str) -> Option<String> {
        if is_synthetic(file) {
            return None;
        }

        let path = Path::new(file);
        let resolved = if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.source_base.join(path))
        };

        let relative = resolved.strip_prefix(&self.workspace_root).ok()?;
        let parts = component_names(relative);
        // Markers only apply below the root.
        if parts.is_empty() || self.is_library_path(&parts) {
            return None;
        }
        Some(parts.join("/"))
    }

    fn is_library_path(&self, components: &[String]) -> bool {
        self.library_markers
            .iter()
            .any(|marker| components.windows(marker.len()).any(|window| window == marker.as_slice()))
    }
}

fn is_synthetic(file: &str) -> bool {
    let file = file.trim();
    file.is_empty() || file.starts_with('<')
}

/// Lexically resolve `.` and `..` without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn component_names(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LIBRARY_MARKERS;

    fn filter(root: &str) -> LocationFilter {
        let markers: Vec<String> = DEFAULT_LIBRARY_MARKERS.iter().map(|m| m.to_string()).collect();
        LocationFilter::new(root, &markers).with_source_base(root)
    }

    #[test]
    fn test_relative_workspace_file_in_scope() {
        let filter = filter("/work/app");
        assert!(filter.is_in_scope("src/main.rs"));
        assert_eq!(filter.relative_path("src/main.rs").as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn test_absolute_workspace_file_in_scope() {
        let filter = filter("/work/app");
        assert_eq!(
            filter.relative_path("/work/app/demos/quicksort.rs").as_deref(),
            Some("demos/quicksort.rs")
        );
    }

    #[test]
    fn test_empty_and_synthetic_paths_rejected() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope(""));
        assert!(!filter.is_in_scope("   "));
        assert!(!filter.is_in_scope("<anon>"));
        assert!(!filter.is_in_scope("<frozen importlib._bootstrap>"));
    }

    #[test]
    fn test_registry_sources_rejected() {
        let filter = filter("/home/dev");
        assert!(!filter.is_in_scope(
            "/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.200/src/de/mod.rs"
        ));
        assert!(!filter.is_in_scope("/home/dev/.cargo/git/checkouts/foo-1234/src/lib.rs"));
    }

    #[test]
    fn test_std_sources_rejected() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope("/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/core/src/iter/range.rs"));
    }

    #[test]
    fn test_vendored_sources_rejected() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope("vendor/regex/src/lib.rs"));
    }

    #[test]
    fn test_outside_workspace_rejected() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope("/other/src/main.rs"));
        assert!(!filter.is_in_scope("../sibling/src/lib.rs"));
    }

    #[test]
    fn test_prefix_sibling_directory_rejected() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope("/work/app2/src/main.rs"));
    }

    #[test]
    fn test_dot_segments_normalized() {
        let filter = filter("/work/app");
        assert_eq!(
            filter.relative_path("./src/../src/lib.rs").as_deref(),
            Some("src/lib.rs")
        );
    }

    #[test]
    fn test_root_itself_is_not_a_file() {
        let filter = filter("/work/app");
        assert!(!filter.is_in_scope("/work/app"));
    }

    #[test]
    fn test_marker_in_root_does_not_reject() {
        let filter = filter("/home/dev/vendor/app");
        assert!(filter.is_in_scope("src/lib.rs"));
    }

    #[test]
    fn test_custom_marker() {
        let markers = vec!["third_party".to_string()];
        let filter = LocationFilter::new("/work/app", &markers).with_source_base("/work/app");
        assert!(!filter.is_in_scope("third_party/zlib/src/lib.rs"));
        assert!(filter.is_in_scope("vendor/regex/src/lib.rs"));
    }

    #[test]
    fn test_relative_file_resolved_against_source_base() {
        let filter = filter("/work/app/crates/core").with_source_base("/work/app");
        assert!(!filter.is_in_scope("src/main.rs"));
        assert!(!filter.is_in_scope("crates/cli/src/main.rs"));
        assert_eq!(
            filter.relative_path("crates/core/src/lib.rs").as_deref(),
            Some("src/lib.rs")
        );
    }

    #[test]
    fn test_root_outside_source_base_rejects_relative_files() {
        let filter = filter("/tmp/elsewhere").with_source_base("/work/app");
        assert!(!filter.is_in_scope("src/main.rs"));
        assert!(!filter.is_in_scope("demos/quicksort.rs"));
    }

    #[test]
    fn test_from_config_uses_source_base() {
        let config = TracerConfig::new("/work/app").with_source_base("/work");
        let filter = LocationFilter::from_config(&config);
        assert!(filter.is_in_scope("app/src/lib.rs"));
        assert!(!filter.is_in_scope("src/lib.rs"));
    }
}
