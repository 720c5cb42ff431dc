use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::from_fn_with_state;
use dynast_kernel::context::SharedContext;
use dynast_kernel::server::router::system_router;
use dynast_kernel::server::transaction;
use tower::ServiceExt;
use uuid::Uuid;

fn app(context: &SharedContext) -> Router {
    system_router::<SharedContext>()
        .layer(from_fn_with_state(context.clone(), transaction::track))
        .with_state(context.clone())
}

fn transaction_id(response: &axum::response::Response) -> String {
    let raw = response
        .headers()
        .get("x-transaction-id")
        .expect("response must carry the transaction header")
        .to_str()
        .expect("header must be ascii");
    Uuid::parse_str(raw).expect("transaction id must be a valid UUID");
    raw.to_owned()
}

#[tokio::test]
async fn responses_carry_a_fresh_transaction_id() {
    let context = SharedContext::new("test-app", "/tmp/app");
    let app = app(&context);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let first = transaction_id(&response);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let second = transaction_id(&response);

    assert_ne!(first, second, "each request must receive its own identifier");
}

#[tokio::test]
async fn concurrent_requests_receive_distinct_ids() {
    let context = SharedContext::new("test-app", "/tmp/app");
    let app = app(&context);

    let (left, right) = tokio::join!(
        app.clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request")),
        app.clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request")),
    );

    let left = transaction_id(&left.expect("response"));
    let right = transaction_id(&right.expect("response"));
    assert_ne!(left, right);
}

#[tokio::test]
async fn last_transaction_mirror_tracks_requests() {
    let context = SharedContext::new("test-app", "/tmp/app");
    let app = app(&context);
    assert!(context.last_transaction().is_none());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let id = transaction_id(&response);

    let mirrored = context.last_transaction().expect("mirror populated");
    assert_eq!(mirrored.id, id);
    assert_eq!(mirrored.method, "GET");
}
