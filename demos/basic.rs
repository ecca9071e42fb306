//! Basic example demonstrating the PagerDuty API client.
//!
//! Run with:
//! ```
//! PAGERDUTY_API_TOKEN=your-token cargo run --example basic
//! ```

use pdapi::{
    get_service, list_services, GetServiceOptions, List, PagerDutyClient, Service,
    ServiceListQuery,
};

#[tokio::main]
async fn main() -> pdapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating PagerDuty client...");
    let client = PagerDutyClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // First page of services, with a total count
    println!("\n--- Listing Services (first page) ---");
    let query = ServiceListQuery {
        total: true,
        ..Default::default()
    };
    let page = list_services(&client, &query).await?;
    println!("Found {} services (total: {:?})", page.len(), page.total);

    for service in &page {
        println!(
            "  - {} ({}) [{}]",
            service.name(),
            service.id,
            service.status.as_deref().unwrap_or("unknown")
        );
    }

    let Some(first) = page.items.first() else {
        println!("\nNo services to inspect.");
        return Ok(());
    };

    // Details with teams and escalation policy expanded
    println!("\n--- Service Details ---");
    let options = GetServiceOptions {
        includes: vec!["teams".to_string(), "escalation_policies".to_string()],
    };
    let service = get_service(&client, &first.id, Some(&options)).await?;
    println!("Service: {}", service.name());
    println!("  ID: {}", service.id);
    if let Some(policy) = &service.escalation_policy {
        println!(
            "  Escalation policy: {}",
            policy.name.as_deref().unwrap_or(policy.id())
        );
    }
    println!("  Teams: {}", service.team_ids().join(", "));

    println!("\n--- Integrations ---");
    let integrations = service.fetch_integrations(&client).await?;
    for integration in &integrations {
        println!(
            "  - {} ({})",
            integration.name(),
            integration.object_type.as_deref().unwrap_or("unknown")
        );
    }

    println!("\n--- Service Rules ---");
    let rules = service.rules(&client).await?;
    for rule in &rules {
        let state = if rule.is_enabled() { "enabled" } else { "disabled" };
        println!("  {} [{}] {}", rule.id, state, rule.action_summary());
    }

    // Every service, following pagination
    println!("\n--- All Services ---");
    let all = Service::list_all(&client, &ServiceListQuery::default()).await?;
    println!("Fetched {} services across all pages", all.len());

    Ok(())
}
