//! Resource management: resolving declared resources to filesystem paths and
//! loading them at startup.
//!
//! Resolution is pure and idempotent: the same config and filesystem layout
//! always produce the same map. Loading isolates failures per resource.

use crate::context::SharedContext;
use config::{Config, File, FileFormat};
use dynast_domain::resource::{ResourceDecl, ResourceFormat};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SERVICE_PREFIX: &str = "services.";

/// Where a declared resource lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub path: PathBuf,
    pub resource_dir: String,
    pub format: ResourceFormat,
}

/// Resource name to resolved location.
pub type ResourceMap = BTreeMap<String, ResourceLocation>;

/// The resolved map together with the data that actually loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadedResources {
    pub map: ResourceMap,
    pub data: BTreeMap<String, Value>,
}

/// Resolves declared resources against the layout roots.
///
/// A `services.`-prefixed name resolves under the services root plus the
/// remaining segment; any other name resolves under the application root. A
/// dot-separated `path` appends subdirectories, and the file name is
/// `<resource>.<format>`.
#[must_use]
pub fn resolve_map(
    decls: &BTreeMap<String, ResourceDecl>,
    services_root: &Path,
    application_root: &Path,
) -> ResourceMap {
    let mut map = ResourceMap::new();
    for decl in decls.values() {
        let mut base = match decl.name.strip_prefix(SERVICE_PREFIX) {
            Some(rest) => services_root.join(rest),
            None => application_root.join(&decl.name),
        };
        if let Some(path) = &decl.path {
            for segment in path.split('.') {
                base.push(segment);
            }
        }
        let file_name = format!("{}.{}", decl.resource, decl.format.extension());
        map.insert(
            decl.name.clone(),
            ResourceLocation {
                path: base.join(file_name),
                resource_dir: decl.resource.clone(),
                format: decl.format,
            },
        );
    }
    map
}

/// Loads every resolved resource, skipping entries that fail to read or parse.
#[must_use]
pub fn load_map(map: &ResourceMap) -> BTreeMap<String, Value> {
    let mut data = BTreeMap::new();
    for (name, location) in map {
        let format = match location.format {
            ResourceFormat::Json => FileFormat::Json,
            ResourceFormat::Yaml | ResourceFormat::Yml => FileFormat::Yaml,
        };
        let loaded = Config::builder()
            .add_source(File::from(location.path.as_path()).format(format).required(true))
            .build()
            .and_then(Config::try_deserialize::<Value>);
        match loaded {
            Ok(value) => {
                info!(resource = name.as_str(), path = %location.path.display(), "Loaded resource");
                data.insert(name.clone(), value);
            }
            Err(error) => {
                warn!(resource = name.as_str(), path = %location.path.display(), %error, "Failed to load resource, skipping");
            }
        }
    }
    data
}

/// The resource-management phase: resolve, load, and publish to the context.
#[derive(Debug)]
pub struct ResourceManager {
    context: SharedContext,
}

impl ResourceManager {
    #[must_use]
    pub fn new(context: SharedContext) -> Self {
        Self { context }
    }

    /// Runs the phase and returns how many resources loaded. A missing
    /// `resources` section skips the phase with a warning; it is never fatal.
    pub fn perform(&self) -> usize {
        let config = self.context.config();
        let Some(decls) = config.resources.as_ref() else {
            warn!("No resources information provided, skipping resources scanning");
            return 0;
        };

        let map =
            resolve_map(decls, &self.context.services_root(), &self.context.application_root());
        let data = load_map(&map);
        let loaded = data.len();
        self.context.set_resources(LoadedResources { map, data });
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn decl(name: &str, format: ResourceFormat, path: Option<&str>) -> ResourceDecl {
        serde_json::from_value(json!({
            "name": name,
            "format": match format {
                ResourceFormat::Json => "json",
                ResourceFormat::Yaml => "yaml",
                ResourceFormat::Yml => "yml",
            },
            "path": path,
        }))
        .expect("valid declaration")
    }

    #[test]
    fn service_scoped_names_resolve_under_the_services_root() {
        let decls =
            BTreeMap::from([("r1".to_owned(), decl("services.billing", ResourceFormat::Yaml, Some("v2")))]);
        let map = resolve_map(&decls, Path::new("/srv/app/services"), Path::new("/srv/app"));

        let location = &map["services.billing"];
        assert_eq!(
            location.path.parent(),
            Some(Path::new("/srv/app/services/billing/v2")),
        );
        assert_eq!(location.path.file_name().and_then(|n| n.to_str()), Some("resources.yaml"));
    }

    #[test]
    fn application_scoped_names_resolve_under_the_application_root() {
        let decls = BTreeMap::from([("r1".to_owned(), decl("reports", ResourceFormat::Json, None))]);
        let map = resolve_map(&decls, Path::new("/srv/app/services"), Path::new("/srv/app"));

        let location = &map["reports"];
        assert_eq!(location.path.parent(), Some(Path::new("/srv/app/reports")));
        assert_eq!(location.path.file_name().and_then(|n| n.to_str()), Some("resources.json"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let decls =
            BTreeMap::from([("r1".to_owned(), decl("services.billing", ResourceFormat::Yml, Some("a.b")))]);
        let first = resolve_map(&decls, Path::new("/x/services"), Path::new("/x"));
        let second = resolve_map(&decls, Path::new("/x/services"), Path::new("/x"));
        assert_eq!(first, second);
    }

    #[test]
    fn loading_isolates_failures_per_resource() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let good_dir = tmp.path().join("good");
        fs::create_dir_all(&good_dir).expect("create resource dir");
        fs::write(good_dir.join("resources.json"), r#"{"limit": 5}"#).expect("write resource");

        let decls = BTreeMap::from([
            ("a".to_owned(), decl("good", ResourceFormat::Json, None)),
            ("b".to_owned(), decl("missing", ResourceFormat::Json, None)),
        ]);
        let map = resolve_map(&decls, &tmp.path().join("services"), tmp.path());
        let data = load_map(&map);

        assert_eq!(data.len(), 1);
        assert_eq!(data["good"]["limit"], 5);
    }

    #[test]
    fn manager_skips_without_resource_config() {
        let context = SharedContext::new("test", "/tmp");
        let manager = ResourceManager::new(context.clone());
        assert_eq!(manager.perform(), 0);
        assert!(context.resources().is_none());
    }
}
