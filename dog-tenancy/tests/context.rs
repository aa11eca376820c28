mod common;

use common::{auth_headers, token_for, Scripted, ScriptedBuckets};
use dog_auth::TokenError;
use dog_blob::{validate_bucket_name, MemoryBucketStore};
use dog_core::{DogError, ErrorKind};
use dog_tenancy::{init_tenant_context, MemoryCatalog, TenancyError, TenantContext, TenantResolver};
use serde_json::json;
use std::collections::HashMap;

#[tokio::test]
async fn service_token_provisions_and_returns_tenant() {
    let catalog = MemoryCatalog::new();
    let buckets = MemoryBucketStore::new();
    let headers = auth_headers(&token_for(&json!({"service": "acme"})));

    let ctx = init_tenant_context(&headers, &mut catalog.session(), &buckets)
        .await
        .unwrap();

    assert_eq!(ctx.tenant_id.as_str(), "acme");
    assert!(catalog.has_schema("acme"));
    assert!(buckets.contains("acme").await);
}

#[tokio::test]
async fn issuer_token_resolves_last_path_segment() {
    let catalog = MemoryCatalog::new();
    let buckets = MemoryBucketStore::new();
    let headers = auth_headers(&format!(
        "Bearer {}",
        token_for(&json!({"iss": "https://issuer.example/auth/realms/tenant-x"}))
    ));

    let ctx = init_tenant_context(&headers, &mut catalog.session(), &buckets)
        .await
        .unwrap();
    assert_eq!(ctx.schema_name(), "tenant-x");
}

#[tokio::test]
async fn missing_header_fails_before_any_provisioning() {
    let catalog = MemoryCatalog::new();
    let buckets = ScriptedBuckets::new(Scripted::Create);

    let err = init_tenant_context(&http::HeaderMap::new(), &mut catalog.session(), &buckets)
        .await
        .unwrap_err();

    assert!(matches!(err, TenancyError::NotAuthenticated));
    assert!(catalog.calls().is_empty());
    assert_eq!(buckets.calls(), 0);

    let dog: DogError = err.into();
    assert_eq!(dog.kind, ErrorKind::NotAuthenticated);
    assert_eq!(dog.code(), 401);
}

#[tokio::test]
async fn bad_tokens_are_authentication_failures() {
    let catalog = MemoryCatalog::new();
    let buckets = ScriptedBuckets::new(Scripted::Create);

    // "bm90LWpzb24" is base64 for "not-json".
    for token in ["   ", "JWT", "abc", "a.bm90LWpzb24.sig"] {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), token.to_string());

        let err = init_tenant_context(&headers, &mut catalog.session(), &buckets)
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::InvalidToken(_)), "{token:?}: {err:?}");
        assert!(err.is_authentication_failure());
    }

    assert!(catalog.calls().is_empty());
    assert_eq!(buckets.calls(), 0);
}

#[test]
fn blank_header_is_an_empty_token() {
    let headers = auth_headers("Bearer");
    let err = TenantResolver::new().resolve(&headers).unwrap_err();
    assert!(matches!(err, TenancyError::InvalidToken(TokenError::Empty)));
}

#[test]
fn token_without_tenant_is_rejected() {
    let headers = auth_headers(&token_for(&json!({"foo": "bar"})));
    let err = TenantResolver::new().resolve(&headers).unwrap_err();
    assert!(matches!(err, TenancyError::NoTenantClaim));
}

#[test]
fn unsafe_tenant_claims_are_rejected() {
    for claim in ["../etc", "Acme", "acme\"; drop schema public; --"] {
        let headers = auth_headers(&token_for(&json!({ "service": claim })));
        let err = TenantResolver::new().resolve(&headers).unwrap_err();
        assert!(matches!(err, TenancyError::InvalidTenant(_)), "{claim}: {err:?}");
    }
}

#[test]
fn custom_header_is_honoured() {
    let mut headers = http::HeaderMap::new();
    headers.insert("x-tenant-token", token_for(&json!({"service": "acme"})).parse().unwrap());

    let ctx = TenantResolver::new()
        .with_header("x-tenant-token")
        .resolve(&headers)
        .unwrap();
    assert_eq!(ctx.tenant_id.as_str(), "acme");

    let err = TenantResolver::new().resolve(&headers).unwrap_err();
    assert!(matches!(err, TenancyError::NotAuthenticated));
}

#[tokio::test]
async fn storage_failures_map_to_server_errors() {
    let catalog = MemoryCatalog::new();
    let buckets = ScriptedBuckets::new(Scripted::AccessDenied);
    let headers = auth_headers(&token_for(&json!({"service": "acme"})));

    let err = init_tenant_context(&headers, &mut catalog.session(), &buckets)
        .await
        .unwrap_err();
    assert!(!err.is_authentication_failure());

    let dog: DogError = err.into();
    assert_eq!(dog.code(), 500);
}

#[tokio::test]
async fn unprovisionable_tenant_is_refused_before_storage() {
    let catalog = MemoryCatalog::new();
    let buckets = ScriptedBuckets::new(Scripted::Create);

    for payload in [
        json!({"service": "tenant_x"}),
        json!({"iss": "https://issuer.example/tenantX"}),
    ] {
        let headers = auth_headers(&token_for(&payload));
        let err = init_tenant_context(&headers, &mut catalog.session(), &buckets)
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::InvalidTenant(_)), "{payload}: {err:?}");

        let dog: DogError = err.into();
        assert_eq!(dog.code(), 401);
    }

    assert!(catalog.calls().is_empty());
    assert_eq!(buckets.calls(), 0);
    assert!(!catalog.has_schema("tenant_x"));
}

#[test]
fn every_accepted_tenant_is_a_valid_bucket_name() {
    let longest = "a".repeat(63);
    for id in ["acme", "tenant-x", "a1b", "0rg", longest.as_str()] {
        let ctx = TenantContext::parse(id).unwrap();
        assert!(validate_bucket_name(ctx.bucket_name()).is_ok(), "{id}");
    }
}
