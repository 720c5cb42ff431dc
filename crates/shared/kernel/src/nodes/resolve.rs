//! Node resolution: the priority pass deciding who receives the server.
//!
//! Entry always wins over Dynast components and is checked first,
//! unconditionally. Without an Entry, every Dynast handler runs in
//! registration order with per-component failure isolation. Resolution is
//! one-shot per process and never re-run once the server is serving.

use super::{NodeError, NodeScanner};
use crate::context::SharedContext;
use crate::server::assembly::AppAssembly;
use tracing::{error, info, warn};

/// Outcome of a completed resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The Entry handler received the server.
    Entry,
    /// This many Dynast handlers were invoked (failures included).
    Dynasts(usize),
    /// Nothing was registered; the server starts with only system routes.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolutionState {
    Unresolved,
    Scanning,
    Resolved(Resolution),
}

/// Drives the scan pass and hands the server to the winning node(s).
#[derive(Debug)]
pub struct NodeResolver {
    scanner: NodeScanner,
    state: ResolutionState,
}

impl NodeResolver {
    #[must_use]
    pub fn new(scanner: NodeScanner) -> Self {
        Self { scanner, state: ResolutionState::Unresolved }
    }

    /// The resolution outcome, if the pass has completed.
    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        match self.state {
            ResolutionState::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Runs the scan pass, then resolves priority and invokes handlers.
    ///
    /// # Errors
    /// [`NodeError::AlreadyResolved`] when called a second time;
    /// [`NodeError::Initialization`] when the Entry handler fails (fatal —
    /// there is no per-component catch on the Entry path).
    pub fn resolve(
        &mut self,
        context: &SharedContext,
        assembly: &mut AppAssembly,
    ) -> Result<Resolution, NodeError> {
        if matches!(self.state, ResolutionState::Resolved(_) | ResolutionState::Scanning) {
            return Err(NodeError::AlreadyResolved);
        }
        self.state = ResolutionState::Scanning;

        let config = context.config();
        let bound = self.scanner.scan(config.dynastnodes.as_ref(), context);
        if bound > 0 {
            info!(modules = bound, "Module scan complete");
        }

        let resolution = self.dispatch(context, assembly)?;
        self.state = ResolutionState::Resolved(resolution);
        Ok(resolution)
    }

    fn dispatch(
        &self,
        context: &SharedContext,
        assembly: &mut AppAssembly,
    ) -> Result<Resolution, NodeError> {
        info!("Checking for Entry node");
        if let Some(entry) = context.entry_node() {
            info!(name = entry.name(), "Entry node detected, it assumes full wiring responsibility");
            entry.handler().mount(assembly).map_err(|source| NodeError::Initialization {
                name: entry.name().to_owned(),
                source,
            })?;
            return Ok(Resolution::Entry);
        }

        let dynasts = context.dynast_nodes();
        if dynasts.is_empty() {
            warn!("No Entry node and no Dynast nodes registered, starting with system routes only");
            return Ok(Resolution::None);
        }

        info!(count = dynasts.len(), "Initializing Dynast nodes");
        for dynast in &dynasts {
            if let Err(source) = dynast.handler().mount(assembly) {
                // One failing component never prevents the next from initializing.
                error!(name = dynast.name(), %source, "Error initializing Dynast node");
            }
        }
        Ok(Resolution::Dynasts(dynasts.len()))
    }
}
