//! Integration model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tokio_util::sync::CancellationToken;

use crate::client::PagerDutyClient;
use crate::envelope::{decode_body, decode_envelope, Envelope};
use crate::error::Result;
use crate::models::{path_segment, ApiObject};
use crate::pagination::{Page, PageMeta, PaginationParams};
use crate::query::{QueryPairs, ToQuery};
use crate::traits::{Create, Delete, Get, List, Update, DEFAULT_PAGE_SIZE};

/// Envelope key for a single integration.
pub const INTEGRATION_ROOT: &str = "integration";

/// An integration belonging to a service.
///
/// Integrations are the endpoints (an email address, the Events API, a
/// monitoring vendor) through which events reach a service.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    /// The integration ID (empty when creating).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Integration type (e.g. `generic_events_api_inbound_integration`).
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(rename = "self", default)]
    pub self_url: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// The owning service.
    #[serde(default)]
    pub service: Option<ApiObject>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub vendor: Option<ApiObject>,

    /// Routing key generated for Events API integrations.
    #[serde(default)]
    pub integration_key: Option<String>,

    /// Address generated for email integrations.
    #[serde(default)]
    pub integration_email: Option<String>,
}

impl Integration {
    /// A new integration record of the given type.
    pub fn new(name: impl Into<String>, integration_type: impl Into<String>) -> Self {
        Self {
            object_type: Some(integration_type.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// The integration name, or an empty string.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// ID of the owning service, if the server reported it.
    pub fn service_id(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.id.as_str())
    }
}

/// Options for fetching a single integration.
#[derive(Debug, Clone, Default)]
pub struct GetIntegrationOptions {
    /// Related objects to expand (`services`, `vendors`).
    pub includes: Vec<String>,
}

impl ToQuery for GetIntegrationOptions {
    fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        pairs.push_list("include", &self.includes);
        pairs
    }
}

/// `(service_id, integration_id)`.
pub type IntegrationId = (String, String);

/// API response wrapper for listing integrations.
#[derive(Debug, Deserialize)]
struct IntegrationListResponse {
    #[serde(flatten)]
    meta: PageMeta,
    #[serde(default)]
    integrations: Vec<Integration>,
}

fn integrations_path(service_id: &str) -> Result<String> {
    Ok(format!(
        "services/{}/integrations",
        path_segment("service", service_id)?
    ))
}

fn integration_path(service_id: &str, integration_id: &str) -> Result<String> {
    Ok(format!(
        "{}/{}",
        integrations_path(service_id)?,
        path_segment("integration", integration_id)?
    ))
}

#[async_trait]
impl Get for Integration {
    type Id = IntegrationId;
    type Options = GetIntegrationOptions;

    #[tracing::instrument(skip(client, options))]
    async fn get(
        client: &PagerDutyClient,
        id: IntegrationId,
        options: &Self::Options,
    ) -> Result<Self> {
        let (service_id, integration_id) = id;
        let path = integration_path(&service_id, &integration_id)?;
        let query = options.to_query();

        let response = client.get_with_query(&path, query.as_slice()).await?;
        decode_envelope(response, INTEGRATION_ROOT).await
    }
}

#[async_trait]
impl List for Integration {
    type Query = String; // Service ID

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &PagerDutyClient,
        service_id: &String,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        let path = integrations_path(service_id)?;
        let mut params = QueryPairs::new();
        params.push_pagination(PaginationParams::window(offset, limit));

        let response = client.get_with_query(&path, params.as_slice()).await?;
        let data: IntegrationListResponse = decode_body(response).await?;

        Ok(Page::new(data.integrations, data.meta))
    }
}

#[async_trait]
impl Create for Integration {
    type Parent = String; // Service ID

    #[tracing::instrument(skip(client, record))]
    async fn create(client: &PagerDutyClient, service_id: String, record: &Self) -> Result<Self> {
        let path = integrations_path(&service_id)?;

        let response = client
            .post(&path, &Envelope::new(INTEGRATION_ROOT, record))
            .await?;
        decode_envelope(response, INTEGRATION_ROOT).await
    }
}

#[async_trait]
impl Update for Integration {
    type Id = IntegrationId;

    #[tracing::instrument(skip(client, record))]
    async fn update(
        client: &PagerDutyClient,
        id: IntegrationId,
        record: &Self,
    ) -> Result<Self> {
        let (service_id, integration_id) = id;
        let path = integration_path(&service_id, &integration_id)?;

        let response = client
            .put(&path, &Envelope::new(INTEGRATION_ROOT, record))
            .await?;
        decode_envelope(response, INTEGRATION_ROOT).await
    }
}

#[async_trait]
impl Delete for Integration {
    type Id = IntegrationId;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &PagerDutyClient, id: IntegrationId) -> Result<()> {
        let (service_id, integration_id) = id;
        let path = integration_path(&service_id, &integration_id)?;
        client.delete(&path).await?;
        Ok(())
    }
}

/// Get an integration belonging to a service.
pub async fn get_integration(
    client: &PagerDutyClient,
    service_id: &str,
    integration_id: &str,
    options: &GetIntegrationOptions,
) -> Result<Integration> {
    Integration::get(
        client,
        (service_id.to_string(), integration_id.to_string()),
        options,
    )
    .await
}

/// List the first page of a service's integrations.
pub async fn list_integrations(
    client: &PagerDutyClient,
    service_id: &str,
) -> Result<Page<Integration>> {
    Integration::list_page(client, &service_id.to_string(), 0, DEFAULT_PAGE_SIZE).await
}

/// List every integration of a service, following pagination.
pub async fn list_integrations_paginated(
    client: &PagerDutyClient,
    service_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<Integration>> {
    Integration::list_all_with_cancel(client, &service_id.to_string(), cancel).await
}

/// Create a new integration belonging to a service.
pub async fn create_integration(
    client: &PagerDutyClient,
    service_id: &str,
    integration: &Integration,
) -> Result<Integration> {
    Integration::create(client, service_id.to_string(), integration).await
}

/// Replace an integration belonging to a service. The record's `id`
/// selects the integration.
pub async fn update_integration(
    client: &PagerDutyClient,
    service_id: &str,
    integration: &Integration,
) -> Result<Integration> {
    Integration::update(
        client,
        (service_id.to_string(), integration.id.clone()),
        integration,
    )
    .await
}

/// Delete an integration.
pub async fn delete_integration(
    client: &PagerDutyClient,
    service_id: &str,
    integration_id: &str,
) -> Result<()> {
    Integration::delete(client, (service_id.to_string(), integration_id.to_string())).await
}
