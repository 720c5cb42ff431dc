//! Facade crate for the Dynast orchestration layer.
//! Re-exports domain/kernel primitives and the application-facing API.
//! Keep this crate thin: it should compose other crates, not implement
//! orchestration logic.
//!
//! ## Usage
//! - Depend on `dynast` and register nodes through [`nodes`] (an Entry node
//!   for single-controller applications, Dynast nodes plus a `dynastnodes`
//!   config section for per-module isolation).
//! - `dynast-server` drives the lifecycle and hands the assembled server to
//!   whichever node wins resolution.

pub use dynast_domain as domain;
pub use dynast_kernel as kernel;

use dynast_domain::constants::{FRAMEWORK_NAME, FRAMEWORK_VERSION};

/// The application-facing registration surface.
pub mod nodes {
    pub use dynast_kernel::nodes::{
        HandlerError, ModuleProvider, NodeBinder, NodeDescriptor, NodeDescriptorBuilder,
        NodeError, NodeHandler, NodeRegistry, NodeResolver, NodeScanner, Resolution,
    };
    pub use dynast_kernel::server::AppAssembly;
    pub use dynast_domain::node::{NodeInfo, NodeKind};
}

pub mod server {
    pub mod router {
        pub use dynast_kernel::server::router::system_router;
    }
    pub use dynast_kernel::server::addons;
    pub use dynast_kernel::server::errors::{bad_request, internal_server_error};
}

/// Framework identity for runtime introspection.
pub mod framework {
    use super::{FRAMEWORK_NAME, FRAMEWORK_VERSION};

    #[must_use]
    pub const fn name() -> &'static str {
        FRAMEWORK_NAME
    }

    #[must_use]
    pub const fn version() -> &'static str {
        FRAMEWORK_VERSION
    }

    /// The badge announced once at startup.
    #[must_use]
    pub fn banner() -> String {
        format!("{}::{}", FRAMEWORK_NAME, FRAMEWORK_VERSION)
    }
}
