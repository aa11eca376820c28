use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::routing::get;
use axum::Json;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use dog_axum::{ScopedSession, TenancyState, Tenant, TenantRouter};
use dog_blob::{BlobError, BucketOutcome, BucketStore, MemoryBucketStore};
use dog_tenancy::{MemoryCatalog, MemorySession};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn token_for(payload: Value) -> String {
    format!("Bearer h.{}.s", STANDARD_NO_PAD.encode(payload.to_string()))
}

async fn whoami(Tenant(ctx): Tenant, session: ScopedSession<MemorySession>) -> Json<Value> {
    let active = session
        .lock()
        .await
        .active_tenant()
        .map(|t| t.to_string());
    Json(json!({"tenant": ctx.tenant_id.as_str(), "active": active}))
}

fn router<B: BucketStore + 'static>(catalog: MemoryCatalog, buckets: B) -> axum::Router {
    TenantRouter::new(TenancyState::new(catalog, buckets))
        .route("/whoami", get(whoami))
        .open_route("/health", get(|| async { "ok" }))
        .into_router()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct BrokenBuckets;

#[async_trait]
impl BucketStore for BrokenBuckets {
    async fn create_bucket(&self, _bucket: &str) -> BucketOutcome {
        BucketOutcome::Failed(BlobError::backend_with_code(
            "AccessDenied",
            std::io::Error::other("secret-host:9000 refused"),
        ))
    }
}

#[tokio::test]
async fn missing_token_returns_not_authenticated() {
    let catalog = MemoryCatalog::new();
    let res = router(catalog.clone(), MemoryBucketStore::new())
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotAuthenticated");
    assert_eq!(body["code"], 401);
    assert_eq!(body["className"], "not-authenticated");
    assert_eq!(body["message"], "No authorization token has been supplied");
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn valid_token_reaches_handler_on_tenant_schema() {
    let catalog = MemoryCatalog::new();
    let res = router(catalog.clone(), MemoryBucketStore::new())
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", token_for(json!({"service": "acme"})))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body, json!({"tenant": "acme", "active": "acme"}));
    assert!(catalog.has_schema("acme"));
    assert_eq!(catalog.migrations_run("acme"), 1);
}

#[tokio::test]
async fn token_without_tenant_is_rejected() {
    let res = router(MemoryCatalog::new(), MemoryBucketStore::new())
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", token_for(json!({"sub": "someone"})))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn storage_failure_is_a_sanitized_500() {
    let res = router(MemoryCatalog::new(), BrokenBuckets)
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", token_for(json!({"service": "acme"})))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["name"], "GeneralError");
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn open_routes_skip_tenant_resolution() {
    let catalog = MemoryCatalog::new();
    let res = router(catalog.clone(), MemoryBucketStore::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let provided = HeaderValue::from_static("req-test-123");
    let res = router(MemoryCatalog::new(), MemoryBucketStore::new())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", provided.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}
