//! Service operation tests.
//!
//! Uses wiremock to mock the PagerDuty API and exercise the request/response
//! flow of every service operation.

use pdapi::{
    create_service, delete_service, get_service, list_services, list_services_paginated,
    update_service, CancellationToken, GetServiceOptions, Get, List, PagerDutyClient,
    PagerDutyError, Service, ServiceListQuery,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PagerDutyClient {
    PagerDutyClient::new("test-token", &server.uri()).unwrap()
}

fn page_body(services: serde_json::Value, offset: u32, limit: u32, more: bool) -> serde_json::Value {
    json!({
        "services": services,
        "offset": offset,
        "limit": limit,
        "more": more,
        "total": null
    })
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_service_unwraps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PXXXXXX"))
        .and(header("accept", "application/vnd.pagerduty+json;version=2"))
        .and(header("authorization", "Token token=test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {"id": "PXXXXXX", "name": "Web"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = get_service(&client(&mock_server), "PXXXXXX", None)
        .await
        .unwrap();

    assert_eq!(service.id, "PXXXXXX");
    assert_eq!(service.name(), "Web");
}

#[tokio::test]
async fn test_get_service_sends_includes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PXXXXXX"))
        .and(query_param("include[]", "teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {
                "id": "PXXXXXX",
                "name": "Web",
                "teams": [{"id": "PQ9K7I8", "type": "team", "name": "Ops"}]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = GetServiceOptions {
        includes: vec!["teams".to_string()],
    };
    let service = get_service(&client(&mock_server), "PXXXXXX", Some(&options))
        .await
        .unwrap();

    assert_eq!(service.team_ids(), vec!["PQ9K7I8"]);
}

#[tokio::test]
async fn test_get_service_percent_encodes_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/odd%2Fid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {"id": "odd/id", "name": "Odd"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = get_service(&client(&mock_server), "odd/id", None)
        .await
        .unwrap();
    assert_eq!(service.id, "odd/id");
}

#[tokio::test]
async fn test_get_service_missing_root_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PXXXXXX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "integration": {"id": "PXXXXXX"}
        })))
        .mount(&mock_server)
        .await;

    let err = get_service(&client(&mock_server), "PXXXXXX", None)
        .await
        .unwrap_err();

    match err {
        PagerDutyError::MissingField(field) => assert_eq!(field, "service"),
        other => panic!("Expected MissingField, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_service_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PXXXXXX"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = get_service(&client(&mock_server), "PXXXXXX", None)
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::Decode(_)));
}

#[tokio::test]
async fn test_get_service_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PNOPE00"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Not Found", "code": 2100}
        })))
        .mount(&mock_server)
        .await;

    let err = get_service(&client(&mock_server), "PNOPE00", None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        PagerDutyError::Api {
            message,
            status_code,
        } => {
            assert_eq!(message, "Not Found");
            assert_eq!(status_code, Some(404));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PXXXXXX"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let err = get_service(&client(&mock_server), "PXXXXXX", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PagerDutyError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_empty_id_is_rejected_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = Service::get(&client(&mock_server), String::new(), &Default::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::InvalidArgument(_)));
}

// =============================================================================
// Create / Update / Delete
// =============================================================================

#[tokio::test]
async fn test_create_service_sends_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .and(body_json(json!({
            "service": {
                "type": "service",
                "name": "Web",
                "escalation_policy": {
                    "id": "PT20YPA",
                    "type": "escalation_policy_reference"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "service": {
                "id": "PNEW001",
                "type": "service",
                "name": "Web",
                "status": "active",
                "escalation_policy": {"id": "PT20YPA", "type": "escalation_policy_reference"}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = create_service(&client(&mock_server), &Service::new("Web", "PT20YPA"))
        .await
        .unwrap();

    assert_eq!(created.id, "PNEW001");
    assert_eq!(created.status.as_deref(), Some("active"));
}

#[tokio::test]
async fn test_create_service_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "Invalid Input Provided",
                "code": 2001,
                "errors": ["Name has already been taken."]
            }
        })))
        .mount(&mock_server)
        .await;

    let err = create_service(&client(&mock_server), &Service::new("Web", "PT20YPA"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(
        err.to_string(),
        "PagerDuty API error: Invalid Input Provided: Name has already been taken."
    );
}

#[tokio::test]
async fn test_update_service_replaces_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/services/PXXXXXX"))
        .and(body_json(json!({
            "service": {"id": "PXXXXXX", "name": "Web (renamed)", "description": "frontend"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {"id": "PXXXXXX", "name": "Web (renamed)", "description": "frontend"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = Service {
        id: "PXXXXXX".to_string(),
        name: Some("Web (renamed)".to_string()),
        description: Some("frontend".to_string()),
        ..Default::default()
    };
    let updated = update_service(&client(&mock_server), &record).await.unwrap();

    assert_eq!(updated, record);
}

#[tokio::test]
async fn test_delete_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/services/PXXXXXX"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    delete_service(&client(&mock_server), "PXXXXXX").await.unwrap();
}

#[tokio::test]
async fn test_delete_service_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/services/PXXXXXX"))
        .respond_with(ResponseTemplate::new(500).set_body_string(""))
        .mount(&mock_server)
        .await;

    let err = delete_service(&client(&mock_server), "PXXXXXX")
        .await
        .unwrap_err();

    match err {
        PagerDutyError::Api {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(500));
            assert!(message.contains("500"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_services_sends_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("team_ids[]", "PQ9K7I8"))
        .and(query_param("query", "web"))
        .and(query_param("sort_by", "name:desc"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "100"))
        .and(query_param_is_missing("total"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{"id": "P1", "name": "Web"}]),
            0,
            100,
            false,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ServiceListQuery {
        team_ids: vec!["PQ9K7I8".to_string()],
        query: Some("web".to_string()),
        sort_by: Some("name:desc".to_string()),
        ..Default::default()
    };
    let page = list_services(&client(&mock_server), &query).await.unwrap();

    assert_eq!(page.len(), 1);
    assert!(!page.more);
    assert_eq!(page.next_offset(), None);
}

#[tokio::test]
async fn test_list_single_page_matches_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("total", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [
                {"id": "P1", "name": "Web"},
                {"id": "P2", "name": "Database"},
                {"id": "P3", "name": "Mail"}
            ],
            "offset": 0,
            "limit": 100,
            "more": false,
            "total": 3
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let query = ServiceListQuery {
        total: true,
        ..Default::default()
    };
    let client = client(&mock_server);
    let page = list_services(&client, &query).await.unwrap();
    let all = list_services_paginated(&client, &query, None).await.unwrap();

    assert_eq!(Some(all.len() as u64), page.total);
}

#[tokio::test]
async fn test_list_services_paginated_two_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{"id": "S1", "name": "First"}]),
            0,
            1,
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{"id": "S2", "name": "Second"}]),
            1,
            1,
            false,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = list_services_paginated(&client(&mock_server), &Default::default(), None)
        .await
        .unwrap();

    let ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["S1", "S2"]);
}

#[tokio::test]
async fn test_list_paginated_discards_on_mid_sequence_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{"id": "S1"}, {"id": "S2"}]),
            0,
            2,
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = Service::list_all(&client(&mock_server), &Default::default())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn test_list_paginated_cancelled_before_start() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(json!([]), 0, 100, false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = list_services_paginated(&client(&mock_server), &Default::default(), Some(&cancel))
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::Cancelled));
}

#[tokio::test]
async fn test_list_tolerates_missing_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{"id": "P1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = Service::list_all(&client(&mock_server), &Default::default())
        .await
        .unwrap();

    assert_eq!(services.len(), 1);
}
