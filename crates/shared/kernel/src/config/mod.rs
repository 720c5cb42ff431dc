use config::{Config, Environment, File};
use dynast_domain::config::AppConfig;
use dynast_domain::constants::{APP_CONFIG_FILE, CONFIG_SECTIONS, ENV_PREFIX, OVERRIDE_CONFIG_FILE};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Errors produced while loading or merging configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The fixed-name configuration file is absent from the root path. Fatal;
    /// the orchestrator aborts startup.
    #[error("config file {file} not found in the root path {root}")]
    FileNotFound { file: &'static str, root: PathBuf },

    /// A merge attempted to introduce a key outside the fixed section skeleton.
    #[error("unknown config key '{key}' (known sections: {})", CONFIG_SECTIONS.join(", "))]
    UnknownKey { key: String },

    /// The file/env collaborator failed to read or parse a source.
    #[error("config source error: {source}")]
    Source {
        #[from]
        source: config::ConfigError,
    },

    /// The merged document does not fit the typed configuration shape.
    #[error("config shape error: {source}")]
    Shape {
        #[from]
        source: serde_json::Error,
    },
}

/// A fixed-schema configuration document.
///
/// The key set is decided at construction and never changes: merging a mapping
/// that names a key outside [`CONFIG_SECTIONS`] fails with
/// [`ConfigError::UnknownKey`] before any section is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    sections: Map<String, Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::skeleton()
    }
}

impl ConfigDocument {
    /// The empty skeleton: every known section present and null.
    #[must_use]
    pub fn skeleton() -> Self {
        let sections =
            CONFIG_SECTIONS.iter().map(|key| ((*key).to_owned(), Value::Null)).collect();
        Self { sections }
    }

    /// Merges `overrides` into the document.
    ///
    /// Top-level keys must already exist in the skeleton. Section values are
    /// merged key-by-key when both sides are mappings and replaced otherwise,
    /// so an override file can adjust a single sub-key without restating the
    /// section.
    ///
    /// # Errors
    /// [`ConfigError::UnknownKey`] if `overrides` names an unknown section;
    /// the document is left untouched in that case.
    pub fn merge(&mut self, overrides: Map<String, Value>) -> Result<(), ConfigError> {
        if let Some(key) = overrides.keys().find(|key| !self.sections.contains_key(*key)) {
            return Err(ConfigError::UnknownKey { key: key.clone() });
        }
        for (key, value) in overrides {
            if let Some(slot) = self.sections.get_mut(&key) {
                merge_value(slot, value);
            }
        }
        Ok(())
    }

    /// The fixed key set, in skeleton order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name).filter(|value| !value.is_null())
    }

    /// Deserializes the document into the typed configuration. Null sections
    /// fall back to their typed defaults.
    ///
    /// # Errors
    /// [`ConfigError::Shape`] if a populated section does not match its
    /// declared shape.
    pub fn into_typed(self) -> Result<AppConfig, ConfigError> {
        let populated: Map<String, Value> =
            self.sections.into_iter().filter(|(_, value)| !value.is_null()).collect();
        Ok(serde_json::from_value(Value::Object(populated))?)
    }
}

fn merge_value(slot: &mut Value, incoming: Value) {
    match (slot, incoming) {
        (Value::Object(existing), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_value(existing.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Loads the merged, typed configuration from the root path.
///
/// # Errors
/// See [`load_document`]; additionally fails with [`ConfigError::Shape`] when
/// the merged document does not deserialize.
pub fn load(root: &Path) -> Result<AppConfig, ConfigError> {
    load_document(root)?.into_typed()
}

/// Loads the base file, layers environment overrides and the optional
/// application override file, and returns the merged document.
///
/// The base file is required; the override pass is best-effort: an absent or
/// unreadable override file is logged and skipped, but an override that names
/// an unknown section still fails at the offending write.
///
/// # Errors
/// [`ConfigError::FileNotFound`] when the base file is absent,
/// [`ConfigError::Source`] on parse failure, [`ConfigError::UnknownKey`] when
/// any layer steps outside the fixed skeleton.
pub fn load_document(root: &Path) -> Result<ConfigDocument, ConfigError> {
    let base_path = root.join(APP_CONFIG_FILE);
    if !base_path.exists() {
        return Err(ConfigError::FileNotFound { file: APP_CONFIG_FILE, root: root.to_owned() });
    }

    info!("Loading config from {}", base_path.display());
    let base = read_source(&base_path, true)?;

    let mut document = ConfigDocument::skeleton();
    document.merge(base)?;

    let override_path = root.join(OVERRIDE_CONFIG_FILE);
    if override_path.exists() {
        match read_source(&override_path, false) {
            Ok(overrides) => {
                info!("Merging override config from {}", override_path.display());
                document.merge(overrides)?;
            }
            Err(error) => {
                warn!(path = %override_path.display(), %error, "Skipping unreadable override config");
            }
        }
    }

    Ok(document)
}

fn read_source(path: &Path, with_env: bool) -> Result<Map<String, Value>, ConfigError> {
    let mut builder = Config::builder().add_source(File::from(path).required(true));
    if with_env {
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake), // Env var overrides (e.g., DYNAST__APPLICATION__PORT)
        );
    }
    Ok(builder.build()?.try_deserialize::<Map<String, Value>>()?)
}
