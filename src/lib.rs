//! PagerDuty API client library.
//!
//! A Rust library for the PagerDuty REST API covering services, their
//! integrations and service rules. Each operation (Get, List, Create,
//! Update, Delete) is a trait that resource types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use pdapi::{PagerDutyClient, Service, List, get_service};
//!
//! #[tokio::main]
//! async fn main() -> pdapi::Result<()> {
//!     // Create client from environment variables
//!     let client = PagerDutyClient::from_env()?;
//!
//!     // Get a service by ID
//!     let service = get_service(&client, "PXXXXXX", None).await?;
//!     println!("Service: {}", service.name());
//!
//!     // List all services
//!     let services = Service::list_all(&client, &Default::default()).await?;
//!     println!("Found {} services", services.len());
//!
//!     // List the rules of a service
//!     let rules = pdapi::list_service_rules_paginated(&client, &service.id, None).await?;
//!     println!("Found {} rules", rules.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Get`] - Fetch a single resource by ID
//! - [`List`] - Fetch offset-paginated collections
//! - [`Create`], [`Update`], [`Delete`] - Modify resources
//!
//! Requests and responses wrap resources in a single-key envelope
//! (`{"service": {...}}`); see [`Envelope`] and [`unwrap_envelope`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `PAGERDUTY_API_TOKEN` (required) - Your PagerDuty REST API token
//! - `PAGERDUTY_API_URL` (optional) - Base URL (defaults to `https://api.pagerduty.com`)

pub mod cli;
mod client;
mod envelope;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
mod output;
mod pagination;
mod query;
mod traits;

// Re-export core types
pub use client::PagerDutyClient;
pub use envelope::{unwrap_envelope, Envelope};
pub use error::{PagerDutyError, Result};
pub use output::PrettyPrint;
pub use pagination::{collect_pages, Page, PageMeta, PaginationParams, MAX_PAGES};
pub use query::{QueryPairs, ToQuery};

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Shared references
    ApiObject,
    EscalationPolicy,
    Team,
    // Service types
    AlertGroupParamsConfig,
    AlertGroupingParameters,
    GetServiceOptions,
    IncidentUrgencyRule,
    IncidentUrgencyType,
    InlineModel,
    ScheduledAction,
    Service,
    ServiceListQuery,
    SupportHours,
    SERVICE_ROOT,
    // Integration types
    GetIntegrationOptions,
    Integration,
    IntegrationId,
    INTEGRATION_ROOT,
    // Service rule types
    ActiveBetween,
    ConditionParameter,
    RuleActionExtraction,
    RuleActionParameter,
    RuleActionSuppress,
    RuleActionSuspend,
    RuleConditions,
    RuleSubcondition,
    RuleTimeFrame,
    ScheduledWeekly,
    ServiceRule,
    ServiceRuleActions,
    ServiceRuleId,
    RULE_ROOT,
};

// Re-export convenience functions
pub use models::{
    create_service, delete_service, get_service, list_services, list_services_paginated,
    update_service,
};
pub use models::{
    create_integration, delete_integration, get_integration, list_integrations,
    list_integrations_paginated, update_integration,
};
pub use models::{
    create_service_rule, delete_service_rule, get_service_rule, list_service_rules,
    list_service_rules_paginated, update_service_rule,
};

pub use tokio_util::sync::CancellationToken;
