//! Ergonomic re-exports for embedding applications.

pub use crate::config::{ConfigDocument, ConfigError};
pub use crate::context::SharedContext;
pub use crate::modules::ModuleMap;
pub use crate::nodes::{
    ModuleProvider, NodeBinder, NodeDescriptor, NodeError, NodeHandler, NodeRegistry, NodeResolver,
    NodeScanner, Resolution,
};
pub use crate::resources::{LoadedResources, ResourceManager, ResourceMap};
pub use crate::server::AppAssembly;
pub use dynast_domain::config::AppConfig;
pub use dynast_domain::node::{NodeInfo, NodeKind, TransactionContext};
