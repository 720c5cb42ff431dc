//! The live server assembly handed to node handlers.

use crate::context::SharedContext;
use axum::Router;
use axum::routing::MethodRouter;

/// The router being built, plus the shared context, as one unit.
///
/// An Entry handler receives this and assumes full wiring responsibility;
/// Dynast handlers each contribute their subset. Handlers mutate the assembly
/// in place; the orchestrator turns it into the served router afterwards.
#[derive(Debug)]
pub struct AppAssembly {
    context: SharedContext,
    router: Router<SharedContext>,
}

impl AppAssembly {
    #[must_use]
    pub fn new(context: SharedContext) -> Self {
        Self { context, router: Router::new() }
    }

    #[must_use]
    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Merges a sub-router into the assembly.
    pub fn merge(&mut self, router: Router<SharedContext>) {
        self.router = std::mem::take(&mut self.router).merge(router);
    }

    /// Nests a sub-router under a path prefix.
    pub fn nest(&mut self, path: &str, router: Router<SharedContext>) {
        self.router = std::mem::take(&mut self.router).nest(path, router);
    }

    /// Adds a single route.
    pub fn route(&mut self, path: &str, method_router: MethodRouter<SharedContext>) {
        self.router = std::mem::take(&mut self.router).route(path, method_router);
    }

    /// Finalizes the assembly into the router to be served.
    #[must_use]
    pub fn into_router(self) -> Router<SharedContext> {
        self.router
    }
}
