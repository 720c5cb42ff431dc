/// Fixed name of the startup configuration file, resolved against the root path.
pub const APP_CONFIG_FILE: &str = "app_config.yml";
/// Fixed name of the optional application override file, merged over the base.
pub const OVERRIDE_CONFIG_FILE: &str = "app_config.override.yml";
/// Fixed name of the module map cache file.
pub const MODULES_FILE: &str = "modules.json";

/// Environment variable prefix for configuration overrides (`DYNAST__SECTION__KEY`).
pub const ENV_PREFIX: &str = "DYNAST";

/// The closed set of top-level configuration sections. Merges naming any other
/// key are rejected.
pub const CONFIG_SECTIONS: [&str; 7] =
    ["application", "services", "logs", "dynastnodes", "security", "database", "resources"];

/// Response header carrying the per-request transaction identifier.
pub const TRANSACTION_HEADER: &str = "x-transaction-id";

/// Framework identity, announced once at startup.
pub const FRAMEWORK_NAME: &str = "dynast";
pub const FRAMEWORK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide endpoint defaults, overridable per application.
pub const DEFAULT_PORT: u16 = 8971;
pub const DEFAULT_HOST: &str = "127.0.0.1";
