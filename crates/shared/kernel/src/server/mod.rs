//! Server-facing kernel pieces: the assembly handed to nodes, system routes,
//! transaction tracking, and addon helpers.

pub mod addons;
pub mod assembly;
pub mod errors;
mod health;
pub mod router;
pub mod transaction;

pub use assembly::AppAssembly;
