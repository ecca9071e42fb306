//! Service model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tokio_util::sync::CancellationToken;

use crate::client::PagerDutyClient;
use crate::envelope::{decode_body, decode_envelope, Envelope};
use crate::error::Result;
use crate::models::{path_segment, EscalationPolicy, Integration, Team};
use crate::pagination::{Page, PageMeta, PaginationParams};
use crate::query::{QueryPairs, ToQuery};
use crate::traits::{Create, Delete, Get, List, Update, DEFAULT_PAGE_SIZE};

/// Envelope key for a single service.
pub const SERVICE_ROOT: &str = "service";

/// A PagerDuty service.
///
/// Services represent something you monitor (a web application, an email
/// relay, a database). Incidents are opened against a service and routed
/// through its escalation policy.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// The service ID (assigned by PagerDuty; empty when creating).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Object type (`service` or `service_reference`).
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(rename = "self", default)]
    pub self_url: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,

    /// The service name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Seconds after which an open incident is resolved automatically.
    #[serde(default)]
    pub auto_resolve_timeout: Option<u32>,

    /// Seconds after which an acknowledged incident is re-triggered.
    #[serde(default)]
    pub acknowledgement_timeout: Option<u32>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Current state (`active`, `warning`, `critical`, `maintenance`, `disabled`).
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub last_incident_timestamp: Option<DateTime<Utc>>,

    /// Integrations attached to the service (references unless expanded
    /// with `include[]=integrations`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integrations: Vec<Integration>,

    #[serde(default)]
    pub escalation_policy: Option<EscalationPolicy>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<Team>,

    #[serde(default)]
    pub incident_urgency_rule: Option<IncidentUrgencyRule>,

    #[serde(default)]
    pub support_hours: Option<SupportHours>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scheduled_actions: Vec<ScheduledAction>,

    /// `create_incidents` or `create_alerts_and_incidents`.
    #[serde(default)]
    pub alert_creation: Option<String>,

    #[serde(default)]
    pub alert_grouping: Option<String>,

    #[serde(default)]
    pub alert_grouping_timeout: Option<u32>,

    #[serde(default)]
    pub alert_grouping_parameters: Option<AlertGroupingParameters>,
}

/// The default urgency for new incidents on a service.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUrgencyRule {
    /// `constant` or `use_support_hours`.
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,

    /// Urgency for `constant` rules (`high`, `low`, `severity_based`).
    #[serde(default)]
    pub urgency: Option<String>,

    #[serde(default)]
    pub during_support_hours: Option<IncidentUrgencyType>,

    #[serde(default)]
    pub outside_support_hours: Option<IncidentUrgencyType>,
}

/// Incident urgency during or outside support hours.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUrgencyType {
    #[serde(rename = "type", default)]
    pub urgency_type: Option<String>,

    #[serde(default)]
    pub urgency: Option<String>,
}

/// Support hours for a service.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportHours {
    /// Only `fixed_time_per_day` is supported by PagerDuty.
    #[serde(rename = "type", default)]
    pub hours_type: Option<String>,

    #[serde(default)]
    pub time_zone: Option<String>,

    /// Local start time, `HH:MM:SS`.
    #[serde(default)]
    pub start_time: Option<String>,

    /// Local end time, `HH:MM:SS`.
    #[serde(default)]
    pub end_time: Option<String>,

    /// ISO weekdays, 1 = Monday.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<u8>,
}

/// A scheduled change of incident urgency.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    #[serde(rename = "type", default)]
    pub action_type: Option<String>,

    /// When the action runs.
    #[serde(default)]
    pub at: InlineModel,

    /// Target urgency. Always sent, even when empty.
    #[serde(default)]
    pub to_urgency: String,
}

/// When a scheduled action occurs (e.g. `named_time` / `support_hours_start`).
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineModel {
    #[serde(rename = "type", default)]
    pub model_type: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// How alerts on the service are grouped into incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertGroupingParameters {
    /// `time`, `intelligent` or `content_based`.
    #[serde(rename = "type", default)]
    pub grouping_type: String,

    #[serde(default)]
    pub config: AlertGroupParamsConfig,
}

/// The `config` object of [`AlertGroupingParameters`].
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertGroupParamsConfig {
    /// Grouping window in minutes (`time` grouping).
    #[serde(default)]
    pub timeout: Option<u32>,

    /// `all` or `any` (`content_based` grouping).
    #[serde(default)]
    pub aggregate: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl Service {
    /// A new service record ready to be created.
    pub fn new(name: impl Into<String>, escalation_policy_id: impl Into<String>) -> Self {
        Self {
            object_type: Some("service".to_string()),
            name: Some(name.into()),
            escalation_policy: Some(EscalationPolicy::reference(escalation_policy_id)),
            ..Default::default()
        }
    }

    /// The service name, or an empty string.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Check if the service is in the `disabled` state.
    pub fn is_disabled(&self) -> bool {
        self.status.as_deref() == Some("disabled")
    }

    /// IDs of the teams the service belongs to.
    pub fn team_ids(&self) -> Vec<&str> {
        self.teams.iter().map(Team::id).collect()
    }

    /// IDs of the attached integrations.
    pub fn integration_ids(&self) -> Vec<&str> {
        self.integrations.iter().map(|i| i.id.as_str()).collect()
    }

    /// Get all integrations of this service with their full details.
    pub async fn fetch_integrations(&self, client: &PagerDutyClient) -> Result<Vec<Integration>> {
        crate::models::integration::list_integrations_paginated(client, &self.id, None).await
    }

    /// Get all rules of this service.
    pub async fn rules(&self, client: &PagerDutyClient) -> Result<Vec<crate::ServiceRule>> {
        crate::models::rule::list_service_rules_paginated(client, &self.id, None).await
    }
}

/// Options for fetching a single service.
#[derive(Debug, Clone, Default)]
pub struct GetServiceOptions {
    /// Related objects to expand (`escalation_policies`, `teams`,
    /// `integrations`, ...).
    pub includes: Vec<String>,
}

impl ToQuery for GetServiceOptions {
    fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        pairs.push_list("include", &self.includes);
        pairs
    }
}

/// Query parameters for listing services.
#[derive(Debug, Clone, Default)]
pub struct ServiceListQuery {
    /// Only services belonging to these teams.
    pub team_ids: Vec<String>,

    /// Time zone used to render timestamps.
    pub time_zone: Option<String>,

    /// `name`, `name:asc` or `name:desc`.
    pub sort_by: Option<String>,

    /// Filter by service name.
    pub query: Option<String>,

    /// Related objects to expand.
    pub includes: Vec<String>,

    /// Ask the server to compute `total`.
    pub total: bool,
}

impl ToQuery for ServiceListQuery {
    fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        pairs
            .push_list("team_ids", &self.team_ids)
            .push_opt("time_zone", self.time_zone.as_deref())
            .push_opt("sort_by", self.sort_by.as_deref())
            .push_opt("query", self.query.as_deref())
            .push_list("include", &self.includes);
        if self.total {
            pairs.push_opt("total", Some("true"));
        }
        pairs
    }
}

/// API response wrapper for listing services.
#[derive(Debug, Deserialize)]
struct ServiceListResponse {
    #[serde(flatten)]
    meta: PageMeta,
    #[serde(default)]
    services: Vec<Service>,
}

#[async_trait]
impl Get for Service {
    type Id = String;
    type Options = GetServiceOptions;

    #[tracing::instrument(skip(client, options))]
    async fn get(client: &PagerDutyClient, id: String, options: &Self::Options) -> Result<Self> {
        let path = format!("services/{}", path_segment("service", &id)?);
        let query = options.to_query();

        let response = client.get_with_query(&path, query.as_slice()).await?;
        decode_envelope(response, SERVICE_ROOT).await
    }
}

#[async_trait]
impl List for Service {
    type Query = ServiceListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &PagerDutyClient,
        query: &Self::Query,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        let mut params = query.to_query();
        params.push_pagination(PaginationParams::window(offset, limit));

        let response = client.get_with_query("services", params.as_slice()).await?;
        let data: ServiceListResponse = decode_body(response).await?;

        Ok(Page::new(data.services, data.meta))
    }
}

#[async_trait]
impl Create for Service {
    type Parent = ();

    #[tracing::instrument(skip(client, record))]
    async fn create(client: &PagerDutyClient, _parent: (), record: &Self) -> Result<Self> {
        let response = client
            .post("services", &Envelope::new(SERVICE_ROOT, record))
            .await?;
        decode_envelope(response, SERVICE_ROOT).await
    }
}

#[async_trait]
impl Update for Service {
    type Id = String;

    #[tracing::instrument(skip(client, record))]
    async fn update(client: &PagerDutyClient, id: String, record: &Self) -> Result<Self> {
        let path = format!("services/{}", path_segment("service", &id)?);

        let response = client
            .put(&path, &Envelope::new(SERVICE_ROOT, record))
            .await?;
        decode_envelope(response, SERVICE_ROOT).await
    }
}

#[async_trait]
impl Delete for Service {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &PagerDutyClient, id: String) -> Result<()> {
        let path = format!("services/{}", path_segment("service", &id)?);
        client.delete(&path).await?;
        Ok(())
    }
}

/// Get a service by ID, optionally expanding related objects.
pub async fn get_service(
    client: &PagerDutyClient,
    id: &str,
    options: Option<&GetServiceOptions>,
) -> Result<Service> {
    let default = GetServiceOptions::default();
    Service::get(client, id.to_string(), options.unwrap_or(&default)).await
}

/// List the first page of services matching the query.
pub async fn list_services(
    client: &PagerDutyClient,
    query: &ServiceListQuery,
) -> Result<Page<Service>> {
    Service::list_page(client, query, 0, DEFAULT_PAGE_SIZE).await
}

/// List every service matching the query, following pagination.
///
/// `cancel` is checked before each page request.
pub async fn list_services_paginated(
    client: &PagerDutyClient,
    query: &ServiceListQuery,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<Service>> {
    Service::list_all_with_cancel(client, query, cancel).await
}

/// Create a new service.
pub async fn create_service(client: &PagerDutyClient, service: &Service) -> Result<Service> {
    Service::create(client, (), service).await
}

/// Replace an existing service. The record's `id` selects the service.
pub async fn update_service(client: &PagerDutyClient, service: &Service) -> Result<Service> {
    Service::update(client, service.id.clone(), service).await
}

/// Delete a service.
pub async fn delete_service(client: &PagerDutyClient, id: &str) -> Result<()> {
    Service::delete(client, id.to_string()).await
}
