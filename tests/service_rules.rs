//! Service rule operation tests.

use pdapi::{
    create_service_rule, delete_service_rule, get_service_rule, list_service_rules_paginated,
    update_service_rule, CancellationToken, ConditionParameter, PagerDutyClient,
    PagerDutyError, RuleActionParameter, RuleConditions, RuleSubcondition, ServiceRule,
    ServiceRuleActions,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PagerDutyClient {
    PagerDutyClient::new("test-token", &server.uri()).unwrap()
}

fn disk_rule() -> ServiceRule {
    ServiceRule {
        conditions: Some(RuleConditions {
            operator: "and".to_string(),
            subconditions: vec![RuleSubcondition {
                operator: "contains".to_string(),
                parameters: Some(ConditionParameter {
                    path: Some("summary".to_string()),
                    value: Some("disk".to_string()),
                }),
            }],
        }),
        actions: Some(ServiceRuleActions {
            severity: Some(RuleActionParameter::new("critical")),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_get_service_rule() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/PDB0001/rules/PRULE01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rule": {
                "id": "PRULE01",
                "disabled": false,
                "position": 0,
                "conditions": {
                    "operator": "and",
                    "subconditions": [
                        {"operator": "contains", "parameters": {"path": "summary", "value": "disk"}}
                    ]
                },
                "actions": {"severity": {"value": "critical"}, "suspend": {"value": 300}}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rule = get_service_rule(&client(&mock_server), "PDB0001", "PRULE01")
        .await
        .unwrap();

    assert!(rule.is_enabled());
    assert_eq!(rule.position, Some(0));
    assert_eq!(rule.action_summary(), "severity=critical, suspend=300s");
}

#[tokio::test]
async fn test_create_service_rule_sends_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/PDB0001/rules"))
        .and(body_json(json!({
            "rule": {
                "disabled": false,
                "conditions": {
                    "operator": "and",
                    "subconditions": [
                        {"operator": "contains", "parameters": {"path": "summary", "value": "disk"}}
                    ]
                },
                "actions": {"severity": {"value": "critical"}}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "rule": {"id": "PRULE09", "disabled": false, "position": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = create_service_rule(&client(&mock_server), "PDB0001", &disk_rule())
        .await
        .unwrap();

    assert_eq!(created.id, "PRULE09");
    assert_eq!(created.position, Some(2));
}

#[tokio::test]
async fn test_update_service_rule_can_disable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/services/PDB0001/rules/PRULE01"))
        .and(body_json(json!({"rule": {"id": "PRULE01", "disabled": true}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rule": {"id": "PRULE01", "disabled": true}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = ServiceRule {
        id: "PRULE01".to_string(),
        disabled: true,
        ..Default::default()
    };
    let updated = update_service_rule(&client(&mock_server), "PDB0001", "PRULE01", &record)
        .await
        .unwrap();

    assert!(!updated.is_enabled());
}

#[tokio::test]
async fn test_delete_service_rule_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/services/PDB0001/rules/PGONE00"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Not Found", "code": 2100}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = delete_service_rule(&client(&mock_server), "PDB0001", "PGONE00")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_service_rules_three_pages() {
    let mock_server = MockServer::start().await;

    for (offset, id, more) in [(0, "R1", true), (1, "R2", true), (2, "R3", false)] {
        Mock::given(method("GET"))
            .and(path("/services/PDB0001/rules"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rules": [{"id": id, "disabled": false}],
                "offset": offset,
                "limit": 1,
                "more": more
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let rules = list_service_rules_paginated(&client(&mock_server), "PDB0001", None)
        .await
        .unwrap();

    let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2", "R3"]);
}

#[tokio::test]
async fn test_list_service_rules_fails_when_offset_stalls() {
    let mock_server = MockServer::start().await;

    // Server keeps claiming more but never advances.
    Mock::given(method("GET"))
        .and(path("/services/PDB0001/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rules": [],
            "offset": 0,
            "limit": 0,
            "more": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = list_service_rules_paginated(&client(&mock_server), "PDB0001", None)
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::Pagination { offset: 0 }));
}

#[tokio::test]
async fn test_list_service_rules_fails_when_server_rewinds_offset() {
    let mock_server = MockServer::start().await;

    for (requested, id) in [(0, "S1"), (1, "S2")] {
        Mock::given(method("GET"))
            .and(path("/services/PDB0001/rules"))
            .and(query_param("offset", requested.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rules": [{"id": id, "disabled": false}],
                "offset": 0,
                "limit": 1,
                "more": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let err = list_service_rules_paginated(&client(&mock_server), "PDB0001", None)
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::Pagination { offset: 1 }));
}

#[tokio::test]
async fn test_list_service_rules_cancelled() {
    let mock_server = MockServer::start().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = list_service_rules_paginated(&client(&mock_server), "PDB0001", Some(&cancel))
        .await
        .unwrap_err();

    assert!(matches!(err, PagerDutyError::Cancelled));
}
