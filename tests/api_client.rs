mod common;

use common::{closed_port_url, MockServer};
use gisph_cli::api::{ApiClient, ApiSettings};
use gisph_cli::error::Error;
use gisph_cli::update::{GithubReleases, ReleaseSource};
use serde_json::json;
use std::time::Duration;

fn client(base_url: &str, api_key: Option<&str>) -> ApiClient {
    ApiClient::new(ApiSettings {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
    })
    .unwrap()
}

#[test]
fn regions_request_carries_auth_and_params() {
    let server = MockServer::json("200 OK", r#"{"data":[{"id":1,"name":"A"}],"error":null}"#);
    let api = client(&server.base_url, Some("key-1234"));

    let params = vec![
        ("limit".to_string(), "5".to_string()),
        ("status".to_string(), "active".to_string()),
    ];
    let body = api.get_regions(&params).unwrap();
    assert_eq!(body["data"][0], json!({"id": 1, "name": "A"}));

    let req = server.next_request();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/v1/regions?limit=5&status=active");
    assert_eq!(req.header("authorization"), Some("Bearer key-1234"));
    assert_eq!(req.header("content-type"), Some("application/json"));
}

#[test]
fn no_key_means_no_auth_header() {
    let server = MockServer::json("200 OK", r#"{"data":{"id":13}}"#);
    let api = client(&server.base_url, None);

    api.get_region_by_id("13").unwrap();
    let req = server.next_request();
    assert_eq!(req.path, "/v1/regions/13");
    assert_eq!(req.header("authorization"), None);
}

#[test]
fn region_id_cannot_leave_regions_path() {
    let server = MockServer::json("200 OK", r#"{"data":null}"#);
    let api = client(&server.base_url, None);

    api.get_region_by_id("../x?y").unwrap();
    let req = server.next_request();
    assert!(req.path.starts_with("/v1/regions/"), "{}", req.path);
    assert!(!req.path.contains('?'), "{}", req.path);
}

#[test]
fn server_message_becomes_api_error() {
    let server = MockServer::json("404 Not Found", r#"{"message":"Region not found"}"#);
    let api = client(&server.base_url, None);

    match api.get_region_by_id("999") {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Region not found");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_message_falls_back_to_reason() {
    let server = MockServer::json("500 Internal Server Error", "oops");
    let api = client(&server.base_url, None);

    let err = api.get_regions(&[]).unwrap_err();
    assert_eq!(err.to_string(), "API Error (500): Internal Server Error");
}

#[test]
fn unreachable_host_is_network_error() {
    let base = closed_port_url();
    let api = client(&base, None);

    match api.get_regions(&[]) {
        Err(Error::Network { base_url }) => assert_eq!(base_url, base),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn generic_verbs_send_bodies() {
    let server = MockServer::json("201 Created", r#"{"id":5}"#);
    let api = client(&server.base_url, None);

    let created = api.post("/v1/regions", &json!({"name": "New"})).unwrap();
    assert_eq!(created["id"], 5);
    let req = server.next_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/v1/regions");
}

#[test]
fn github_release_tag_is_stripped() {
    let server = MockServer::json("200 OK", r#"{"tag_name":"v2.0.0","name":"2.0.0"}"#);
    let source = GithubReleases::new("owner/repo", Duration::from_secs(5))
        .unwrap()
        .with_endpoints(&server.base_url, &server.base_url);

    assert_eq!(source.latest_version().unwrap(), "2.0.0");
    let req = server.next_request();
    assert_eq!(req.path, "/repos/owner/repo/releases/latest");
    assert!(req.header("user-agent").is_some());
}

#[test]
fn github_without_releases_reads_manifest_from_main() {
    let server = MockServer::start(vec![
        ("404 Not Found", r#"{"message":"Not Found"}"#.to_string()),
        (
            "200 OK",
            "[package]\nname = \"gisph-cli\"\nversion = \"1.4.2\"\n".to_string(),
        ),
    ]);
    let source = GithubReleases::new("owner/repo", Duration::from_secs(5))
        .unwrap()
        .with_endpoints(&server.base_url, &server.base_url);

    assert_eq!(source.latest_version().unwrap(), "1.4.2");
    server.next_request();
    assert_eq!(server.next_request().path, "/owner/repo/main/Cargo.toml");
}

#[test]
fn github_error_status_is_update_check_error() {
    let server = MockServer::json("403 Forbidden", r#"{"message":"rate limited"}"#);
    let source = GithubReleases::new("owner/repo", Duration::from_secs(5))
        .unwrap()
        .with_endpoints(&server.base_url, &server.base_url);

    match source.latest_version() {
        Err(Error::UpdateCheck(msg)) => assert_eq!(msg, "GitHub API returned status 403"),
        other => panic!("unexpected {:?}", other),
    }
}
