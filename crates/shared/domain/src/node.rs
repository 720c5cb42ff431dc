//! Node metadata shared between the registry and the resolver.
//! This stays pure data; handler wiring lives in the kernel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Priority class of a registered node. `Entry` always wins over `Dynast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Entry,
    Dynast,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry_node",
            Self::Dynast => "dynast_node",
        }
    }
}

/// Descriptive metadata attached to a registered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub author: String,
    pub description: String,
    pub cors_origins: BTreeSet<String>,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: String::new(),
            description: String::new(),
            cors_origins: BTreeSet::new(),
        }
    }
}

/// Bookkeeping window around one inbound request.
///
/// Created at request start, carried through the request as a context value,
/// dropped at request end. Never shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    pub id: String,
    pub method: String,
    pub client_address: String,
}
