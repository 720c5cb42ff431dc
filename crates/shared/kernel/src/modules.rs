//! Module map: the cached mapping from synthetic keys (`m1`, `m2`, ...) to
//! discovered module directories.
//!
//! Read from the fixed-name JSON cache when present, otherwise reconstructed
//! from the directory layout. Keys are stable only within one construction
//! pass; nothing writes the reconstruction back to disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ModuleMapError {
    #[error("failed to read module map at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed module map at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("application directory not found at {path}")]
    MissingRoot { path: PathBuf },
}

/// `{"modules": {"m<N>": "<relative-path>"}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMap {
    modules: BTreeMap<String, String>,
}

impl ModuleMap {
    /// Loads the cache file.
    ///
    /// # Errors
    /// [`ModuleMapError::Read`] / [`ModuleMapError::Parse`] on an unreadable
    /// or malformed file; the caller decides whether to reconstruct instead.
    pub fn load(path: &Path) -> Result<Self, ModuleMapError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ModuleMapError::Read { path: path.to_owned(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| ModuleMapError::Parse { path: path.to_owned(), source })
    }

    /// Reconstructs the map from the directory layout: each subdirectory of
    /// the services folder becomes a `<services>/<name>` entry, and the main
    /// folder (first segment of the configured main path) becomes its own
    /// entry. Hidden directories and build output are skipped.
    ///
    /// # Errors
    /// [`ModuleMapError::MissingRoot`] when `root` does not exist.
    pub fn reconstruct(
        root: &Path,
        services_folder: &str,
        main_path: &str,
    ) -> Result<Self, ModuleMapError> {
        if !root.exists() {
            return Err(ModuleMapError::MissingRoot { path: root.to_owned() });
        }
        let main_folder = main_path.split(['/', '\\']).next().unwrap_or(main_path);

        let mut modules = BTreeMap::new();
        let mut key_index = 1;
        for entry in top_level_dirs(root) {
            if entry == services_folder {
                for service in top_level_dirs(&root.join(&entry)) {
                    modules.insert(format!("m{key_index}"), format!("{services_folder}/{service}"));
                    key_index += 1;
                }
            } else if entry == main_folder {
                modules.insert(format!("m{key_index}"), entry);
                key_index += 1;
            }
        }
        Ok(Self { modules })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.modules.get(key).map(String::as_str)
    }

    /// `(key, relative path)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().map(|(key, path)| (key.as_str(), path.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Integrity check: returns the entries whose mapped directory is absent
    /// from disk. An empty result means every module checks out.
    #[must_use]
    pub fn verify(&self, root: &Path) -> Vec<(String, String)> {
        self.modules
            .iter()
            .filter(|(_, rel)| !root.join(rel).exists())
            .map(|(key, rel)| (key.clone(), rel.clone()))
            .collect()
    }
}

fn top_level_dirs(path: &Path) -> Vec<String> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
        .filter(|name| !name.starts_with('.') && name != "target")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn layout(dirs: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().expect("tempdir");
        for dir in dirs {
            fs::create_dir_all(tmp.path().join(dir)).expect("create layout dir");
        }
        tmp
    }

    #[test]
    fn reconstruct_maps_services_and_main() {
        let tmp = layout(&["services/billing", "services/reports", "main/src", ".git", "target"]);
        let map = ModuleMap::reconstruct(tmp.path(), "services", "main/src").expect("reconstruct");

        let entries: Vec<(&str, &str)> = map.entries().collect();
        assert_eq!(
            entries,
            [
                ("m1", "main"),
                ("m2", "services/billing"),
                ("m3", "services/reports"),
            ]
        );
    }

    #[test]
    fn reconstruct_fails_without_root() {
        let error = ModuleMap::reconstruct(Path::new("/nonexistent/app"), "services", "main/src")
            .expect_err("missing root");
        assert!(matches!(error, ModuleMapError::MissingRoot { .. }));
    }

    #[test]
    fn cache_file_round_trips() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("modules.json");
        fs::write(&path, r#"{"modules": {"m1": "services/billing", "m2": "main"}}"#)
            .expect("write cache");

        let map = ModuleMap::load(&path).expect("load");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("m1"), Some("services/billing"));
    }

    #[test]
    fn malformed_cache_is_reported() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("modules.json");
        fs::write(&path, "{not json").expect("write cache");
        assert!(matches!(ModuleMap::load(&path), Err(ModuleMapError::Parse { .. })));
    }

    #[test]
    fn verify_reports_missing_directories() {
        let tmp = layout(&["services/billing"]);
        let map = ModuleMap::reconstruct(tmp.path(), "services", "main/src").expect("reconstruct");
        assert!(map.verify(tmp.path()).is_empty());

        fs::remove_dir_all(tmp.path().join("services/billing")).expect("remove module dir");
        let missing = map.verify(tmp.path());
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].1, "services/billing");
    }
}
