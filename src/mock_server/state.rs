//! Mock server state management.
//!
//! Provides the in-memory data store for the mock PagerDuty API server.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{ApiObject, Integration, Service, ServiceRule};

/// Shared state for the mock server.
///
/// Services are kept in a `BTreeMap` so listings come back in a stable
/// (ID) order across pages.
#[derive(Debug, Default)]
pub struct MockState {
    /// Services indexed by ID.
    pub services: BTreeMap<String, Service>,

    /// Integrations indexed by owning service ID, in creation order.
    pub integrations: BTreeMap<String, Vec<Integration>>,

    /// Rules indexed by owning service ID, in position order.
    pub rules: BTreeMap<String, Vec<ServiceRule>>,

    /// Optional API token. If set, requests must send `Token token=<value>`.
    pub required_token: Option<String>,

    /// Number of requests served, for asserting request counts.
    pub request_count: u64,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a service to the state.
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.insert(service.id.clone(), service);
        self
    }

    /// Add an integration under a service.
    pub fn with_integration(mut self, service_id: &str, integration: Integration) -> Self {
        self.integrations
            .entry(service_id.to_string())
            .or_default()
            .push(integration);
        self
    }

    /// Add a rule under a service.
    pub fn with_rule(mut self, service_id: &str, rule: ServiceRule) -> Self {
        self.rules
            .entry(service_id.to_string())
            .or_default()
            .push(rule);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Check an `Authorization` header value against the required token.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        match &self.required_token {
            None => true,
            Some(token) => authorization == Some(format!("Token token={token}").as_str()),
        }
    }

    /// Generate a fresh PagerDuty-style ID (`P` + six characters).
    pub fn generate_id(&mut self) -> String {
        self.next_id += 1;
        format!("PMOCK{:02}", self.next_id)
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    /// Get a service by ID.
    pub fn get_service(&self, id: &str) -> Option<&Service> {
        self.services.get(id)
    }

    /// List services, optionally filtered by a name substring.
    pub fn list_services(&self, name_filter: Option<&str>) -> Vec<&Service> {
        self.services
            .values()
            .filter(|s| {
                name_filter
                    .map(|q| s.name().to_lowercase().contains(&q.to_lowercase()))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Store a new service and return it with its assigned ID.
    pub fn create_service(&mut self, mut service: Service) -> Service {
        service.id = self.generate_id();
        service.object_type = Some("service".to_string());
        service.status.get_or_insert_with(|| "active".to_string());
        self.services.insert(service.id.clone(), service.clone());
        service
    }

    /// Replace a service. Returns `None` if it does not exist.
    pub fn replace_service(&mut self, id: &str, mut service: Service) -> Option<Service> {
        let existing = self.services.get_mut(id)?;
        service.id = id.to_string();
        *existing = service.clone();
        Some(service)
    }

    /// Delete a service with everything attached to it.
    pub fn delete_service(&mut self, id: &str) -> bool {
        self.integrations.remove(id);
        self.rules.remove(id);
        self.services.remove(id).is_some()
    }

    // -------------------------------------------------------------------------
    // Integrations
    // -------------------------------------------------------------------------

    /// Get an integration of a service.
    pub fn get_integration(&self, service_id: &str, id: &str) -> Option<&Integration> {
        self.integrations
            .get(service_id)?
            .iter()
            .find(|i| i.id == id)
    }

    /// List the integrations of a service.
    pub fn list_integrations(&self, service_id: &str) -> Vec<&Integration> {
        self.integrations
            .get(service_id)
            .map(|list| list.iter().collect())
            .unwrap_or_default()
    }

    /// Store a new integration. Returns `None` if the service does not exist.
    pub fn create_integration(
        &mut self,
        service_id: &str,
        mut integration: Integration,
    ) -> Option<Integration> {
        if !self.services.contains_key(service_id) {
            return None;
        }
        integration.id = self.generate_id();
        integration.service = Some(ApiObject::reference(service_id, "service_reference"));
        if integration.integration_key.is_none() && integration.integration_email.is_none() {
            integration.integration_key = Some(format!("key-{}", integration.id.to_lowercase()));
        }
        self.integrations
            .entry(service_id.to_string())
            .or_default()
            .push(integration.clone());
        Some(integration)
    }

    /// Replace an integration of a service.
    pub fn replace_integration(
        &mut self,
        service_id: &str,
        id: &str,
        mut integration: Integration,
    ) -> Option<Integration> {
        let existing = self
            .integrations
            .get_mut(service_id)?
            .iter_mut()
            .find(|i| i.id == id)?;
        integration.id = id.to_string();
        integration.service = Some(ApiObject::reference(service_id, "service_reference"));
        *existing = integration.clone();
        Some(integration)
    }

    /// Delete an integration of a service.
    pub fn delete_integration(&mut self, service_id: &str, id: &str) -> bool {
        match self.integrations.get_mut(service_id) {
            Some(list) => {
                let before = list.len();
                list.retain(|i| i.id != id);
                list.len() != before
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Rules
    // -------------------------------------------------------------------------

    /// Get a rule of a service.
    pub fn get_rule(&self, service_id: &str, id: &str) -> Option<&ServiceRule> {
        self.rules.get(service_id)?.iter().find(|r| r.id == id)
    }

    /// List the rules of a service in position order.
    pub fn list_rules(&self, service_id: &str) -> Vec<&ServiceRule> {
        self.rules
            .get(service_id)
            .map(|list| list.iter().collect())
            .unwrap_or_default()
    }

    /// Store a new rule at its requested position (or last). Returns `None`
    /// if the service does not exist.
    pub fn create_rule(&mut self, service_id: &str, mut rule: ServiceRule) -> Option<ServiceRule> {
        if !self.services.contains_key(service_id) {
            return None;
        }
        rule.id = self.generate_id();
        let list = self.rules.entry(service_id.to_string()).or_default();
        let index = rule
            .position
            .and_then(|p| usize::try_from(p).ok())
            .map_or(list.len(), |p| p.min(list.len()));
        list.insert(index, rule);
        Self::renumber(list);
        Some(list[index].clone())
    }

    /// Replace a rule of a service.
    pub fn replace_rule(
        &mut self,
        service_id: &str,
        id: &str,
        mut rule: ServiceRule,
    ) -> Option<ServiceRule> {
        let list = self.rules.get_mut(service_id)?;
        let current = list.iter().position(|r| r.id == id)?;
        rule.id = id.to_string();
        list.remove(current);
        let index = rule
            .position
            .and_then(|p| usize::try_from(p).ok())
            .map_or(current, |p| p.min(list.len()));
        list.insert(index, rule);
        Self::renumber(list);
        Some(list[index].clone())
    }

    /// Delete a rule of a service.
    pub fn delete_rule(&mut self, service_id: &str, id: &str) -> bool {
        match self.rules.get_mut(service_id) {
            Some(list) => {
                let before = list.len();
                list.retain(|r| r.id != id);
                Self::renumber(list);
                list.len() != before
            }
            None => false,
        }
    }

    fn renumber(list: &mut [ServiceRule]) {
        for (index, rule) in list.iter_mut().enumerate() {
            rule.position = i32::try_from(index).ok();
        }
    }
}
