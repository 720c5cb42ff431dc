//! Module discovery.
//!
//! Discovery is explicit: the embedding application hands the scanner a set of
//! module providers, each a dotted module path plus a registration entry
//! point. The `dynastnodes` config section selects which providers run; a
//! configured path also covers every provider registered beneath it. Without
//! that section, discovery is skipped entirely — there is no implicit
//! whole-tree scan.

use super::{HandlerError, NodeDescriptor, NodeError};
use crate::context::SharedContext;
use dynast_domain::config::DynastNodesConfig;
use std::collections::HashSet;
use std::fmt;
use tracing::{error, info};

/// Registration facade handed to module entry points.
///
/// Each bind is a single registry write under the shared context's lock.
#[derive(Debug)]
pub struct NodeBinder<'a> {
    context: &'a SharedContext,
}

impl NodeBinder<'_> {
    /// Registers a node built by the calling module.
    ///
    /// # Errors
    /// Propagates [`NodeError::InvalidNode`] and [`NodeError::DuplicateNode`].
    pub fn bind(&self, node: NodeDescriptor) -> Result<(), NodeError> {
        self.context.register_node(node)
    }
}

type RegisterFn = Box<dyn Fn(&NodeBinder<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// A discoverable module: a dotted path and its registration entry point.
pub struct ModuleProvider {
    path: String,
    register: RegisterFn,
}

impl ModuleProvider {
    pub fn new<F>(path: impl Into<String>, register: F) -> Self
    where
        F: Fn(&NodeBinder<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self { path: path.into(), register: Box::new(register) }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn covered_by(&self, configured: &str) -> bool {
        self.path == configured
            || (self.path.len() > configured.len()
                && self.path.starts_with(configured)
                && self.path.as_bytes()[configured.len()] == b'.')
    }
}

impl fmt::Debug for ModuleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleProvider").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Runs the registration entry points selected by configuration.
#[derive(Debug, Default)]
pub struct NodeScanner {
    providers: Vec<ModuleProvider>,
}

impl NodeScanner {
    #[must_use]
    pub fn new(providers: Vec<ModuleProvider>) -> Self {
        Self { providers }
    }

    pub fn add(&mut self, provider: ModuleProvider) {
        self.providers.push(provider);
    }

    /// Executes the scan pass and returns how many modules registered
    /// successfully.
    ///
    /// Failures are isolated per module: an entry point that errors, and a
    /// configured path with no matching provider, are logged and the scan
    /// continues with the remaining modules.
    pub fn scan(&self, config: Option<&DynastNodesConfig>, context: &SharedContext) -> usize {
        let Some(config) = config else {
            info!("No module-scan paths configured, skipping node discovery");
            return 0;
        };

        let paths: Vec<&str> = config
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|path| !path.is_empty() && !path.eq_ignore_ascii_case("none"))
            .collect();

        let binder = NodeBinder { context };
        let mut visited: HashSet<usize> = HashSet::new();
        let mut bound = 0;

        for configured in paths {
            info!(path = configured, "Scanning nodes");
            let mut matched = false;
            for (index, provider) in self.providers.iter().enumerate() {
                if !provider.covered_by(configured) {
                    continue;
                }
                matched = true;
                if !visited.insert(index) {
                    continue;
                }
                match (provider.register)(&binder) {
                    Ok(()) => bound += 1,
                    Err(source) => {
                        error!(module = provider.path(), %source, "Error importing module, continuing scan");
                    }
                }
            }
            if !matched {
                error!(module = configured, "No module found for configured scan path");
            }
        }

        bound
    }
}
