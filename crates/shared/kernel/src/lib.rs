//! Kernel utilities shared across the orchestration core.
//! Keep this crate lightweight; it holds the shared context, configuration
//! loading/merging, node registration and resolution, and the server-facing
//! plumbing (system routes, transaction tracking, addons).
//!
//! ## Config loading
//! ```rust,ignore
//! let cfg = dynast_kernel::config::load(std::path::Path::new("/srv/app"))?;
//! ```
//!
//! ## Node registration
//! ```rust,ignore
//! use dynast_kernel::nodes::NodeDescriptor;
//!
//! let node = NodeDescriptor::dynast("billing")
//!     .description("billing controllers")
//!     .handler_fn(|assembly| {
//!         assembly.route("/billing", axum::routing::get(|| async { "ok" }));
//!         Ok(())
//!     })
//!     .build()?;
//! ```

pub mod config;
pub mod context;
pub mod id;
pub mod modules;
pub mod nodes;
pub mod prelude;
pub mod resources;
pub mod server;

pub use dynast_domain as domain;
