use axum::body::Body;
use axum::http::Request;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dog_axum::TenancyState;
use dog_blob::MemoryBucketStore;
use dog_core::DogConfig;
use dog_tenancy::MemoryCatalog;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tenant_gateway::{build, tenant_routes};
use tower::ServiceExt;

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(catalog: &MemoryCatalog, buckets: MemoryBucketStore) -> axum::Router {
    tenant_routes(TenancyState::new(catalog.clone(), buckets)).into_router()
}

#[tokio::test]
async fn health_ok() {
    let res = app(&MemoryCatalog::new(), MemoryBucketStore::new())
        .oneshot(Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "ok");
}

#[tokio::test]
async fn whoami_provisions_issuer_tenant() {
    let catalog = MemoryCatalog::new();
    let payload = URL_SAFE_NO_PAD.encode(json!({"iss": "https://sso.example.com/realms/globex"}).to_string());

    let res = app(&catalog, MemoryBucketStore::new())
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", format!("JWT hdr.{payload}.sig"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        json_body(res).await,
        json!({"tenant": "globex", "schema": "globex", "bucket": "globex"})
    );
    assert!(catalog.has_schema("globex"));
}

#[tokio::test]
async fn whoami_without_token_is_401() {
    let res = app(&MemoryCatalog::new(), MemoryBucketStore::new())
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
    assert_eq!(json_body(res).await["name"], "NotAuthenticated");
}

#[tokio::test]
async fn build_requires_a_database_url() {
    let err = build(&DogConfig::new().snapshot()).await.err().unwrap();
    assert!(err.to_string().contains("postgres.url"));
}
