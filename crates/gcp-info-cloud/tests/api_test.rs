//! REST source tests against a wiremock server.

use gcp_info_cloud::api::{ApiClient, ApiError, Endpoints, StaticToken, TokenSource};
use gcp_info_cloud::resolver::Resolver;
use gcp_info_cloud::source::{MetadataSource, SourceError};
use gcp_info_core::ProjectId;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project() -> ProjectId {
    ProjectId::parse("proj-1").unwrap()
}

async fn client_for(server: &MockServer) -> ApiClient<StaticToken> {
    ApiClient::with_tokens(StaticToken::new("test-token"))
        .unwrap()
        .with_endpoints(Endpoints::single(&server.uri()))
}

// ── Resource Manager ──

#[tokio::test]
async fn project_metadata_from_resource_manager() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/proj-1"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectNumber": "123456",
            "projectId": "proj-1",
            "lifecycleState": "ACTIVE",
            "labels": {"cloud.googleapis.com/location": "us-east4"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let meta = client.project_metadata(&project()).await.unwrap();

    assert_eq!(meta.number, 123456);
    assert_eq!(meta.label("cloud.googleapis.com/location"), Some("us-east4"));
}

#[tokio::test]
async fn forbidden_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/proj-1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The caller does not have permission"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.project_metadata(&project()).await.unwrap_err();

    match err {
        SourceError::Api(api) => {
            assert_eq!(api.status(), Some(403));
            assert!(api.to_string().contains("does not have permission"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

// ── Compute Engine ──

#[tokio::test]
async fn running_instance_zone_from_aggregated_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/aggregated/instances"))
        .and(query_param("filter", "status = \"RUNNING\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {
                "zones/asia-east1-a": {
                    "warning": {"code": "NO_RESULTS_ON_PAGE"}
                },
                "zones/us-central1-a": {
                    "instances": [{
                        "name": "vm-1",
                        "status": "RUNNING",
                        "zone": "https://www.googleapis.com/compute/v1/projects/proj-1/zones/us-central1-a"
                    }]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let zone = client.running_instance_zone(&project()).await.unwrap();

    assert_eq!(
        zone.as_deref(),
        Some("https://www.googleapis.com/compute/v1/projects/proj-1/zones/us-central1-a")
    );
}

#[tokio::test]
async fn running_instance_zone_follows_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/aggregated/instances"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {
                "zones/europe-west4-b": {
                    "instances": [{"name": "vm-2", "status": "RUNNING", "zone": "europe-west4-b"}]
                }
            }
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/aggregated/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {
                "zones/us-central1-a": {
                    "instances": [{"name": "vm-1", "status": "TERMINATED", "zone": "us-central1-a"}]
                }
            },
            "nextPageToken": "page-2"
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let zone = client.running_instance_zone(&project()).await.unwrap();

    assert_eq!(zone.as_deref(), Some("europe-west4-b"));
}

#[tokio::test]
async fn running_instance_zone_none_when_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/aggregated/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": {}})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.running_instance_zone(&project()).await.unwrap(), None);
}

#[tokio::test]
async fn metadata_value_from_compute_project() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "proj-1",
            "commonInstanceMetadata": {
                "items": [{"key": "google-compute-default-region", "value": "australia-southeast1"}]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .metadata_value(&project(), "google-compute-default-region")
        .await
        .unwrap();

    assert_eq!(value.as_deref(), Some("australia-southeast1"));
}

#[tokio::test]
async fn first_zone_from_zone_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/zones"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "us-east1-b", "status": "UP"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let zone = client.first_zone(&project()).await.unwrap();

    assert_eq!(zone.as_deref(), Some("us-east1-b"));
}

#[tokio::test]
async fn malformed_zone_list_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.first_zone(&project()).await.unwrap_err();

    assert!(matches!(err, SourceError::Api(ApiError::Decode { what: "zone list", .. })));
}

#[tokio::test]
async fn static_token_has_no_local_defaults() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    assert_eq!(client.default_project().await.unwrap(), None);
    assert_eq!(client.local_default_region().await.unwrap(), None);
}

// ── Scopes ──

/// Hands out the requested scope as the token so the server can check it.
struct ScopeEchoTokens;

impl TokenSource for ScopeEchoTokens {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, ApiError> {
        Ok(scopes.join(" "))
    }

    async fn default_project(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

#[tokio::test]
async fn each_api_gets_a_token_with_its_scope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/proj-1"))
        .and(bearer_token(
            "https://www.googleapis.com/auth/cloud-platform.read-only",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"projectNumber": "42"})),
        )
        .mount(&server)
        .await;

    for compute_path in [
        "/compute/v1/projects/proj-1/aggregated/instances",
        "/compute/v1/projects/proj-1",
    ] {
        Mock::given(method("GET"))
            .and(path(compute_path))
            .and(bearer_token("https://www.googleapis.com/auth/compute.readonly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/zones"))
        .and(bearer_token("https://www.googleapis.com/auth/compute.readonly"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [{"name": "europe-west4-b"}]})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::with_tokens(ScopeEchoTokens)
        .unwrap()
        .with_endpoints(Endpoints::single(&server.uri()));
    let record = Resolver::new(client).resolve(&project()).await;

    assert_eq!(record.project_number, "42");
    assert_eq!(record.region, "europe-west4");
}

// ── End to end through the resolver ──

#[tokio::test]
async fn resolves_record_from_apis() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/proj-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"projectNumber": "123456"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/proj-1/aggregated/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {
                "zones/us-central1-a": {
                    "instances": [{
                        "status": "RUNNING",
                        "zone": "https://www.googleapis.com/compute/v1/projects/proj-1/zones/us-central1-a"
                    }]
                }
            }
        })))
        .mount(&server)
        .await;

    let resolver = Resolver::new(client_for(&server).await);
    let record = resolver.resolve(&project()).await;

    assert_eq!(record.project_number, "123456");
    assert_eq!(record.region, "us-central1");
}

#[tokio::test]
async fn server_errors_degrade_to_sentinels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = Resolver::new(client_for(&server).await);
    let record = resolver.resolve(&project()).await;

    assert_eq!(record.project_id, "proj-1");
    assert_eq!(record.project_number, "N/A");
    assert_eq!(record.region, "N/A");
}

#[tokio::test]
async fn slow_api_hits_overall_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"projectNumber": "1"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let resolver =
        Resolver::new(client_for(&server).await).with_timeout(Duration::from_millis(200));
    let started = std::time::Instant::now();
    let record = resolver.resolve(&project()).await;

    assert_eq!(record.project_number, "N/A");
    assert_eq!(record.region, "N/A");
    assert!(started.elapsed() < Duration::from_secs(4));
}
