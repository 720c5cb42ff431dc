//! Resource declaration schema (the `resources` config section).

use serde::Deserialize;

/// Supported on-disk formats for declared resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    Json,
    Yaml,
    Yml,
}

impl ResourceFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
        }
    }

    #[must_use]
    pub const fn is_yaml(self) -> bool {
        matches!(self, Self::Yaml | Self::Yml)
    }
}

/// One declared resource.
///
/// `name` drives directory resolution: a `services.`-prefixed name resolves
/// under the services root, anything else under the application root.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDecl {
    pub name: String,
    #[serde(default = "default_resource_dir")]
    pub resource: String,
    pub format: ResourceFormat,
    #[serde(default)]
    pub path: Option<String>,
}

fn default_resource_dir() -> String {
    "resources".to_owned()
}
