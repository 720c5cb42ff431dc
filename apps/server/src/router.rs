use axum::Router;
use axum::middleware::from_fn_with_state;
use dynast::kernel::prelude::{AppAssembly, SharedContext};
use dynast::kernel::server::transaction;
use dynast::server::router::system_router;
use tower_http::trace::TraceLayer;

/// Finalizes the assembled router: system routes, request tracing, and the
/// transaction hook pair when the configured profile requests it.
#[allow(unreachable_pub)]
pub fn init(assembly: AppAssembly, context: &SharedContext) -> Router {
    let cfg = context.config();

    let mut router = assembly.into_router().merge(system_router::<SharedContext>());
    router = router.layer(TraceLayer::new_for_http());

    if cfg.application.transaction_profile.is_keep() {
        router = router.layer(from_fn_with_state(context.clone(), transaction::track));
    }

    router.with_state(context.clone())
}
