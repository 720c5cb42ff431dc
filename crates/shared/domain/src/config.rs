use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::resource::ResourceDecl;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Scan-path configuration: service name to the list of module paths whose
/// registration hooks should run.
pub type DynastNodesConfig = BTreeMap<String, Vec<String>>;

/// Top-level application configuration, one field per fixed document section.
///
/// The section set is closed: the document merge in the kernel rejects keys
/// outside {application, services, logs, dynastnodes, security, database,
/// resources}, and on the typed form an unknown section is unrepresentable.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub application: ApplicationConfig,
    pub services: ServicesConfig,
    pub logs: LogsConfig,
    pub dynastnodes: Option<DynastNodesConfig>,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub resources: Option<BTreeMap<String, ResourceDecl>>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// The `application` section: server endpoint plus lifecycle toggles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub port: u16,
    pub host: String,
    pub debug: bool,
    pub transaction_profile: TransactionProfile,
    pub manage_resources: bool,
    pub compile_files: bool,
    pub monitor_change: bool,
    pub watch_files: Vec<PathBuf>,
}

/// Transaction bookkeeping profile. Only `keep` wires the request hooks;
/// any other value deserializes to `Off`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionProfile {
    #[default]
    Keep,
    #[serde(other)]
    Off,
}

impl TransactionProfile {
    #[must_use]
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// The `services` section: layout roots used by module discovery and
/// service-scoped resource resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub root: String,
    pub main: String,
}

/// The `logs` section, consumed by the log-subsystem-init phase.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub level: String,
    pub console: bool,
    pub path: Option<PathBuf>,
}

/// The `security` section. Addon knobs only; the core never enforces policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub cors_max_age_secs: u64,
}

/// The `database` section. Carried through the fixed schema for embedding
/// applications; the orchestration core does not open connections itself.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

// --- Default ---

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_owned(),
            debug: false,
            transaction_profile: TransactionProfile::Keep,
            manage_resources: false,
            compile_files: false,
            monitor_change: false,
            watch_files: Vec::new(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self { root: "services".to_owned(), main: "main/src".to_owned() }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, path: None }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { cors_max_age_secs: 60_000 }
    }
}
