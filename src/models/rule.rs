//! Service rule model and trait implementations.
//!
//! Service rules (event rules scoped to one service) match incoming events
//! against a condition expression and apply actions such as setting the
//! severity, annotating, or suppressing the alert.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tokio_util::sync::CancellationToken;

use crate::client::PagerDutyClient;
use crate::envelope::{decode_body, decode_envelope, Envelope};
use crate::error::Result;
use crate::models::path_segment;
use crate::pagination::{Page, PageMeta, PaginationParams};
use crate::query::QueryPairs;
use crate::traits::{Create, Delete, Get, List, Update, DEFAULT_PAGE_SIZE};

/// Envelope key for a single service rule.
pub const RULE_ROOT: &str = "rule";

/// A rule on a service.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRule {
    /// The rule ID (empty when creating).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "self", default)]
    pub self_url: Option<String>,

    /// Disabled rules are kept but never match. Always sent so that an
    /// update can re-enable a rule.
    #[serde(default)]
    pub disabled: bool,

    /// What the event must match.
    #[serde(default)]
    pub conditions: Option<RuleConditions>,

    /// When the rule is active; always active if unset.
    #[serde(default)]
    pub time_frame: Option<RuleTimeFrame>,

    /// Evaluation order within the service (0 first).
    #[serde(default)]
    pub position: Option<i32>,

    #[serde(default)]
    pub actions: Option<ServiceRuleActions>,
}

/// Condition expression of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    /// `and` or `or`.
    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub subconditions: Vec<RuleSubcondition>,
}

/// A single comparison within [`RuleConditions`].
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSubcondition {
    /// `exists`, `contains`, `equals`, `matches`, ... (optionally prefixed
    /// with `nexists`/`nequals` style negations).
    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub parameters: Option<ConditionParameter>,
}

/// Operand of a subcondition.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionParameter {
    /// Event field path (e.g. `summary`, `payload.source`).
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub value: Option<String>,
}

/// Activity window of a rule.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTimeFrame {
    #[serde(default)]
    pub scheduled_weekly: Option<ScheduledWeekly>,

    #[serde(default)]
    pub active_between: Option<ActiveBetween>,
}

/// A recurring weekly window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWeekly {
    /// ISO weekdays, 1 = Monday.
    #[serde(default)]
    pub weekdays: Vec<u8>,

    #[serde(default)]
    pub timezone: String,

    /// Milliseconds after midnight.
    #[serde(default)]
    pub start_time: u64,

    /// Window length in milliseconds.
    #[serde(default)]
    pub duration: u64,
}

/// A fixed window, as epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBetween {
    #[serde(default)]
    pub start_time: u64,

    #[serde(default)]
    pub end_time: u64,
}

/// Actions applied to matching events.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRuleActions {
    /// Note added to the resulting incident.
    #[serde(default)]
    pub annotate: Option<RuleActionParameter>,

    /// Overrides the event action (`trigger`, `resolve`).
    #[serde(default)]
    pub event_action: Option<RuleActionParameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extractions: Vec<RuleActionExtraction>,

    /// Priority ID to set.
    #[serde(default)]
    pub priority: Option<RuleActionParameter>,

    /// `info`, `warning`, `error` or `critical`.
    #[serde(default)]
    pub severity: Option<RuleActionParameter>,

    #[serde(default)]
    pub suppress: Option<RuleActionSuppress>,

    #[serde(default)]
    pub suspend: Option<RuleActionSuspend>,
}

/// A single string-valued action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleActionParameter {
    #[serde(default)]
    pub value: String,
}

impl RuleActionParameter {
    /// An action that sets its target to `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Copies part of the event into another field.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleActionExtraction {
    /// Destination field.
    #[serde(default)]
    pub target: String,

    /// Source field (for regex extraction).
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub regex: Option<String>,

    /// Template (for template extraction), e.g. `{{host}} is down`.
    #[serde(default)]
    pub template: Option<String>,
}

/// Suppress matching alerts, optionally only until a threshold is hit.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleActionSuppress {
    #[serde(default)]
    pub value: bool,

    #[serde(default)]
    pub threshold_value: Option<u32>,

    /// `minutes`, `hours`, ...
    #[serde(default)]
    pub threshold_time_unit: Option<String>,

    #[serde(default)]
    pub threshold_time_amount: Option<u32>,
}

/// Pause notifications for matching alerts.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleActionSuspend {
    /// Suspension in seconds.
    #[serde(default)]
    pub value: Option<u64>,
}

impl ServiceRule {
    /// Check if the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Short description of what the rule does, for listings.
    pub fn action_summary(&self) -> String {
        let Some(actions) = &self.actions else {
            return String::new();
        };

        let mut parts = Vec::new();
        if let Some(severity) = &actions.severity {
            parts.push(format!("severity={}", severity.value));
        }
        if let Some(priority) = &actions.priority {
            parts.push(format!("priority={}", priority.value));
        }
        if let Some(event_action) = &actions.event_action {
            parts.push(format!("event_action={}", event_action.value));
        }
        if actions.annotate.is_some() {
            parts.push("annotate".to_string());
        }
        if !actions.extractions.is_empty() {
            parts.push(format!("extractions={}", actions.extractions.len()));
        }
        if actions.suppress.as_ref().is_some_and(|s| s.value) {
            parts.push("suppress".to_string());
        }
        if let Some(seconds) = actions.suspend.as_ref().and_then(|s| s.value) {
            parts.push(format!("suspend={seconds}s"));
        }
        parts.join(", ")
    }
}

/// `(service_id, rule_id)`.
pub type ServiceRuleId = (String, String);

/// API response wrapper for listing service rules.
#[derive(Debug, Deserialize)]
struct ServiceRuleListResponse {
    #[serde(flatten)]
    meta: PageMeta,
    #[serde(default)]
    rules: Vec<ServiceRule>,
}

fn rules_path(service_id: &str) -> Result<String> {
    Ok(format!("services/{}/rules", path_segment("service", service_id)?))
}

fn rule_path(service_id: &str, rule_id: &str) -> Result<String> {
    Ok(format!(
        "{}/{}",
        rules_path(service_id)?,
        path_segment("rule", rule_id)?
    ))
}

#[async_trait]
impl Get for ServiceRule {
    type Id = ServiceRuleId;
    type Options = ();

    #[tracing::instrument(skip(client, _options))]
    async fn get(client: &PagerDutyClient, id: ServiceRuleId, _options: &()) -> Result<Self> {
        let (service_id, rule_id) = id;
        let path = rule_path(&service_id, &rule_id)?;

        let response = client.get(&path).await?;
        decode_envelope(response, RULE_ROOT).await
    }
}

#[async_trait]
impl List for ServiceRule {
    type Query = String; // Service ID

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &PagerDutyClient,
        service_id: &String,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        let path = rules_path(service_id)?;
        let mut params = QueryPairs::new();
        params.push_pagination(PaginationParams::window(offset, limit));

        let response = client.get_with_query(&path, params.as_slice()).await?;
        let data: ServiceRuleListResponse = decode_body(response).await?;

        Ok(Page::new(data.rules, data.meta))
    }
}

#[async_trait]
impl Create for ServiceRule {
    type Parent = String; // Service ID

    #[tracing::instrument(skip(client, record))]
    async fn create(client: &PagerDutyClient, service_id: String, record: &Self) -> Result<Self> {
        let path = rules_path(&service_id)?;

        let response = client.post(&path, &Envelope::new(RULE_ROOT, record)).await?;
        decode_envelope(response, RULE_ROOT).await
    }
}

#[async_trait]
impl Update for ServiceRule {
    type Id = ServiceRuleId;

    #[tracing::instrument(skip(client, record))]
    async fn update(client: &PagerDutyClient, id: ServiceRuleId, record: &Self) -> Result<Self> {
        let (service_id, rule_id) = id;
        let path = rule_path(&service_id, &rule_id)?;

        let response = client.put(&path, &Envelope::new(RULE_ROOT, record)).await?;
        decode_envelope(response, RULE_ROOT).await
    }
}

#[async_trait]
impl Delete for ServiceRule {
    type Id = ServiceRuleId;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &PagerDutyClient, id: ServiceRuleId) -> Result<()> {
        let (service_id, rule_id) = id;
        let path = rule_path(&service_id, &rule_id)?;
        client.delete(&path).await?;
        Ok(())
    }
}

/// Get a rule of a service.
pub async fn get_service_rule(
    client: &PagerDutyClient,
    service_id: &str,
    rule_id: &str,
) -> Result<ServiceRule> {
    ServiceRule::get(client, (service_id.to_string(), rule_id.to_string()), &()).await
}

/// List the first page of a service's rules.
pub async fn list_service_rules(
    client: &PagerDutyClient,
    service_id: &str,
) -> Result<Page<ServiceRule>> {
    ServiceRule::list_page(client, &service_id.to_string(), 0, DEFAULT_PAGE_SIZE).await
}

/// List every rule of a service, following pagination.
pub async fn list_service_rules_paginated(
    client: &PagerDutyClient,
    service_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<ServiceRule>> {
    ServiceRule::list_all_with_cancel(client, &service_id.to_string(), cancel).await
}

/// Create a rule on a service.
pub async fn create_service_rule(
    client: &PagerDutyClient,
    service_id: &str,
    rule: &ServiceRule,
) -> Result<ServiceRule> {
    ServiceRule::create(client, service_id.to_string(), rule).await
}

/// Replace a rule of a service.
pub async fn update_service_rule(
    client: &PagerDutyClient,
    service_id: &str,
    rule_id: &str,
    rule: &ServiceRule,
) -> Result<ServiceRule> {
    ServiceRule::update(client, (service_id.to_string(), rule_id.to_string()), rule).await
}

/// Delete a rule of a service.
pub async fn delete_service_rule(
    client: &PagerDutyClient,
    service_id: &str,
    rule_id: &str,
) -> Result<()> {
    ServiceRule::delete(client, (service_id.to_string(), rule_id.to_string())).await
}
