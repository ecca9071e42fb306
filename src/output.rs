//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Integration, Service, ServiceRule};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Service {
    fn pretty_print(&self) -> String {
        let header = format!("Service: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.name())];

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(ref policy) = self.escalation_policy {
            let label = policy
                .name
                .as_deref()
                .or(policy.object.summary.as_deref())
                .unwrap_or(policy.id());
            lines.push(format!("Escalation:     {}", label));
        }

        if !self.teams.is_empty() {
            lines.push(format!("Teams:          {}", self.team_ids().join(", ")));
        }

        if !self.integrations.is_empty() {
            lines.push(format!("Integrations:   {}", self.integrations.len()));
        }

        if let Some(timeout) = self.acknowledgement_timeout {
            lines.push(format!("Ack Timeout:    {}s", timeout));
        }

        if let Some(timeout) = self.auto_resolve_timeout {
            lines.push(format!("Auto Resolve:   {}s", timeout));
        }

        if let Some(ref rule) = self.incident_urgency_rule {
            if let Some(ref urgency) = rule.urgency {
                lines.push(format!("Urgency:        {}", urgency));
            } else if let Some(ref rule_type) = rule.rule_type {
                lines.push(format!("Urgency:        {}", rule_type));
            }
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if let Some(ref last) = self.last_incident_timestamp {
            lines.push(format!("Last Incident:  {}", last.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Integration {
    fn pretty_print(&self) -> String {
        let header = format!("Integration: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.name())];

        if let Some(ref kind) = self.object_type {
            lines.push(format!("Type:           {}", kind));
        }

        if let Some(service_id) = self.service_id() {
            lines.push(format!("Service:        {}", service_id));
        }

        if let Some(ref vendor) = self.vendor {
            let label = vendor.summary.as_deref().unwrap_or(&vendor.id);
            lines.push(format!("Vendor:         {}", label));
        }

        if let Some(ref key) = self.integration_key {
            lines.push(format!("Key:            {}", key));
        }

        if let Some(ref email) = self.integration_email {
            lines.push(format!("Email:          {}", email));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ServiceRule {
    fn pretty_print(&self) -> String {
        let header = format!("Rule: {}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Enabled:        {}", if self.is_enabled() { "yes" } else { "no" }),
        ];

        if let Some(position) = self.position {
            lines.push(format!("Position:       {}", position));
        }

        if let Some(ref conditions) = self.conditions {
            let rendered: Vec<String> = conditions
                .subconditions
                .iter()
                .map(|c| {
                    let params = c.parameters.as_ref();
                    let path = params.and_then(|p| p.path.as_deref()).unwrap_or("");
                    let value = params.and_then(|p| p.value.as_deref()).unwrap_or("");
                    format!("{} {} {:?}", path, c.operator, value)
                })
                .collect();
            let joiner = format!(" {} ", conditions.operator);
            lines.push(format!("Conditions:     {}", rendered.join(&joiner)));
        }

        if self.time_frame.is_some() {
            lines.push("Time Frame:     scheduled".to_string());
        }

        let actions = self.action_summary();
        if !actions.is_empty() {
            lines.push(format!("Actions:        {}", actions));
        }

        lines.join("\n")
    }
}
