//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{
    ApiObject, ConditionParameter, EscalationPolicy, IncidentUrgencyRule, Integration,
    RuleActionParameter, RuleConditions, RuleSubcondition, Service, ServiceRule,
    ServiceRuleActions, Team,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Service Fixtures
    // =========================================================================

    /// Create a minimal service with an ID and name only.
    pub fn minimal_service(id: &str, name: &str) -> Service {
        Service {
            id: id.to_string(),
            object_type: Some("service".to_string()),
            summary: Some(name.to_string()),
            name: Some(name.to_string()),
            status: Some("active".to_string()),
            ..Default::default()
        }
    }

    /// Create a service routed through an escalation policy and owned by a team.
    pub fn routed_service(id: &str, name: &str, policy_id: &str, team_id: &str) -> Service {
        let mut service = Self::minimal_service(id, name);
        service.escalation_policy = Some(EscalationPolicy {
            object: ApiObject {
                summary: Some("Default".to_string()),
                ..ApiObject::reference(policy_id, "escalation_policy_reference")
            },
            ..Default::default()
        });
        service.teams = vec![Team {
            object: ApiObject::reference(team_id, "team_reference"),
            ..Default::default()
        }];
        service.acknowledgement_timeout = Some(600);
        service.auto_resolve_timeout = Some(14400);
        service.incident_urgency_rule = Some(IncidentUrgencyRule {
            rule_type: Some("constant".to_string()),
            urgency: Some("high".to_string()),
            ..Default::default()
        });
        service.alert_creation = Some("create_alerts_and_incidents".to_string());
        service
    }

    // =========================================================================
    // Integration Fixtures
    // =========================================================================

    /// Create an Events API v2 integration with a routing key.
    pub fn events_integration(id: &str, name: &str, service_id: &str) -> Integration {
        Integration {
            id: id.to_string(),
            integration_key: Some(format!("key-{}", id.to_lowercase())),
            service: Some(ApiObject::reference(service_id, "service_reference")),
            ..Integration::new(name, "events_api_v2_inbound_integration")
        }
    }

    /// Create an email integration.
    pub fn email_integration(id: &str, name: &str, service_id: &str) -> Integration {
        Integration {
            id: id.to_string(),
            integration_email: Some(format!("{}@example.pagerduty.com", id.to_lowercase())),
            service: Some(ApiObject::reference(service_id, "service_reference")),
            ..Integration::new(name, "generic_email_inbound_integration")
        }
    }

    // =========================================================================
    // Rule Fixtures
    // =========================================================================

    /// Create a rule that sets the severity of events whose field contains a value.
    pub fn severity_rule(
        id: &str,
        position: i32,
        path: &str,
        contains: &str,
        severity: &str,
    ) -> ServiceRule {
        ServiceRule {
            id: id.to_string(),
            position: Some(position),
            conditions: Some(RuleConditions {
                operator: "and".to_string(),
                subconditions: vec![RuleSubcondition {
                    operator: "contains".to_string(),
                    parameters: Some(ConditionParameter {
                        path: Some(path.to_string()),
                        value: Some(contains.to_string()),
                    }),
                }],
            }),
            actions: Some(ServiceRuleActions {
                severity: Some(RuleActionParameter::new(severity)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub services: Vec<Service>,
    pub integrations: Vec<(String, Vec<Integration>)>,
    pub rules: Vec<(String, Vec<ServiceRule>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let web = "PXXXXXX";
        let db = "PDB0001";

        let services = vec![
            Fixtures::routed_service(web, "Web", "PT20YPA", "PQ9K7I8"),
            Fixtures::routed_service(db, "Database", "PT20YPA", "PQ9K7I8"),
            Fixtures::minimal_service("PMAIL01", "Mail Relay"),
        ];

        let integrations = vec![(
            web.to_string(),
            vec![
                Fixtures::events_integration("PINT001", "Datadog", web),
                Fixtures::email_integration("PINT002", "Email", web),
            ],
        )];

        let rules = vec![(
            db.to_string(),
            vec![
                Fixtures::severity_rule("PRULE01", 0, "summary", "disk", "critical"),
                Fixtures::severity_rule("PRULE02", 1, "source", "replica", "warning"),
            ],
        )];

        Self {
            services,
            integrations,
            rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_service() {
        let service = Fixtures::minimal_service("PXXXXXX", "Web");
        assert_eq!(service.id, "PXXXXXX");
        assert_eq!(service.name(), "Web");
        assert!(service.escalation_policy.is_none());
    }

    #[test]
    fn test_routed_service() {
        let service = Fixtures::routed_service("P1", "Web", "PT20YPA", "PQ9K7I8");
        assert_eq!(service.escalation_policy.as_ref().unwrap().id(), "PT20YPA");
        assert_eq!(service.team_ids(), vec!["PQ9K7I8"]);
    }

    #[test]
    fn test_integrations() {
        let events = Fixtures::events_integration("PINT001", "Datadog", "P1");
        assert_eq!(events.service_id(), Some("P1"));
        assert_eq!(events.integration_key.as_deref(), Some("key-pint001"));

        let email = Fixtures::email_integration("PINT002", "Email", "P1");
        assert!(email.integration_key.is_none());
        assert!(email.integration_email.is_some());
    }

    #[test]
    fn test_severity_rule() {
        let rule = Fixtures::severity_rule("R1", 0, "summary", "disk", "critical");
        assert!(rule.is_enabled());
        assert_eq!(rule.action_summary(), "severity=critical");
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.services.len(), 3);
        assert!(!scenario.integrations.is_empty());
        assert!(!scenario.rules.is_empty());
    }
}
