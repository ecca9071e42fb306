//! PagerDuty API CLI binary.
//!
//! A command-line interface for services, integrations and service rules.

use clap::Parser;
use pdapi::cli::{Cli, Command, Entity};
use pdapi::{
    Delete, Get, GetIntegrationOptions, GetServiceOptions, Integration, List, Page,
    PagerDutyClient, PagerDutyError, PrettyPrint, Service, ServiceListQuery, ServiceRule, Update,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const DEFAULT_LIMIT: u32 = 25;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.command.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let client = match PagerDutyClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set PAGERDUTY_API_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &PagerDutyClient, cli: Cli) -> pdapi::Result<()> {
    match cli.command {
        Command::Get {
            entity,
            id,
            service,
            includes,
        } => handle_get(client, entity, id, service, includes, cli.json).await,
        Command::List {
            entity,
            service,
            offset,
            limit,
            all,
            query,
            team_ids,
            sort_by,
        } => {
            let filter = ServiceListQuery {
                team_ids,
                sort_by,
                query,
                ..Default::default()
            };
            let window = (!all).then(|| (offset.unwrap_or(0), limit.unwrap_or(DEFAULT_LIMIT)));
            handle_list(client, entity, service, filter, window, cli.json).await
        }
        Command::Update {
            entity,
            id,
            service,
            name,
            description,
            disabled,
        } => {
            let changes = Changes {
                name,
                description,
                disabled,
            };
            handle_update(client, entity, id, service, changes, cli.json).await
        }
        Command::Delete {
            entity,
            id,
            service,
        } => handle_delete(client, entity, id, service).await,
    }
}

fn require_service(entity: Entity, service: Option<String>) -> pdapi::Result<String> {
    service.ok_or_else(|| {
        PagerDutyError::InvalidArgument(format!("--service is required for {}", entity.plural()))
    })
}

async fn handle_get(
    client: &PagerDutyClient,
    entity: Entity,
    id: String,
    service: Option<String>,
    includes: Vec<String>,
    json: bool,
) -> pdapi::Result<()> {
    match entity {
        Entity::Service => {
            let options = GetServiceOptions { includes };
            let service = Service::get(client, id, &options).await?;
            output_single(&service, json)?;
        }
        Entity::Integration => {
            let service_id = require_service(entity, service)?;
            let options = GetIntegrationOptions { includes };
            let integration = Integration::get(client, (service_id, id), &options).await?;
            output_single(&integration, json)?;
        }
        Entity::Rule => {
            let service_id = require_service(entity, service)?;
            let rule = ServiceRule::get(client, (service_id, id), &()).await?;
            output_single(&rule, json)?;
        }
    }
    Ok(())
}

async fn handle_list(
    client: &PagerDutyClient,
    entity: Entity,
    service: Option<String>,
    filter: ServiceListQuery,
    window: Option<(u32, u32)>,
    json: bool,
) -> pdapi::Result<()> {
    match entity {
        Entity::Service => {
            list_and_print::<Service, _, _>(client, &filter, window, json, |s| {
                ServiceRow::from(s)
            })
            .await
        }
        Entity::Integration => {
            let service_id = require_service(entity, service)?;
            list_and_print::<Integration, _, _>(client, &service_id, window, json, |i| {
                IntegrationRow::from(i)
            })
            .await
        }
        Entity::Rule => {
            let service_id = require_service(entity, service)?;
            list_and_print::<ServiceRule, _, _>(client, &service_id, window, json, |r| {
                RuleRow::from(r)
            })
            .await
        }
    }
}

async fn list_and_print<T, R, F>(
    client: &PagerDutyClient,
    query: &T::Query,
    window: Option<(u32, u32)>,
    json: bool,
    to_row: F,
) -> pdapi::Result<()>
where
    T: List + Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match window {
        Some((offset, limit)) => {
            let page = T::list_page(client, query, offset, limit).await?;
            output_page(&page, json, to_row)
        }
        None => {
            let items = T::list_all(client, query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                let rows: Vec<R> = items.iter().map(to_row).collect();
                println!("{}", Table::new(rows));
                println!("\n{} total items", items.len());
            }
            Ok(())
        }
    }
}

/// Field changes requested on the command line.
struct Changes {
    name: Option<String>,
    description: Option<String>,
    disabled: Option<bool>,
}

async fn handle_update(
    client: &PagerDutyClient,
    entity: Entity,
    id: String,
    service: Option<String>,
    changes: Changes,
    json: bool,
) -> pdapi::Result<()> {
    match entity {
        Entity::Service => {
            let mut record = Service::get(client, id.clone(), &Default::default()).await?;
            if changes.name.is_some() {
                record.name = changes.name;
            }
            if changes.description.is_some() {
                record.description = changes.description;
            }
            let updated = Service::update(client, id, &record).await?;
            output_single(&updated, json)?;
        }
        Entity::Integration => {
            let service_id = require_service(entity, service)?;
            let key = (service_id, id);
            let mut record = Integration::get(client, key.clone(), &Default::default()).await?;
            if changes.name.is_some() {
                record.name = changes.name;
            }
            let updated = Integration::update(client, key, &record).await?;
            output_single(&updated, json)?;
        }
        Entity::Rule => {
            let service_id = require_service(entity, service)?;
            let key = (service_id, id);
            let mut record = ServiceRule::get(client, key.clone(), &()).await?;
            if let Some(disabled) = changes.disabled {
                record.disabled = disabled;
            }
            let updated = ServiceRule::update(client, key, &record).await?;
            output_single(&updated, json)?;
        }
    }
    Ok(())
}

async fn handle_delete(
    client: &PagerDutyClient,
    entity: Entity,
    id: String,
    service: Option<String>,
) -> pdapi::Result<()> {
    match entity {
        Entity::Service => Service::delete(client, id.clone()).await?,
        Entity::Integration => {
            let service_id = require_service(entity, service)?;
            Integration::delete(client, (service_id, id.clone())).await?
        }
        Entity::Rule => {
            let service_id = require_service(entity, service)?;
            ServiceRule::delete(client, (service_id, id.clone())).await?
        }
    }
    eprintln!("Deleted {id}");
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> pdapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> pdapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        let end = page.offset as usize + page.len();
        match (page.total, page.more) {
            (Some(total), _) => println!("\nItems {}-{} of {}", page.offset, end, total),
            (None, true) => println!("\nItems {}-{} (more available)", page.offset, end),
            (None, false) => println!("\nItems {}-{} (end)", page.offset, end),
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ServiceRow {
    id: String,
    name: String,
    status: String,
    teams: String,
}

impl From<&Service> for ServiceRow {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name().to_string(),
            status: s.status.clone().unwrap_or_default(),
            teams: s.team_ids().join(", "),
        }
    }
}

#[derive(Tabled)]
struct IntegrationRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    integration_type: String,
}

impl From<&Integration> for IntegrationRow {
    fn from(i: &Integration) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name().to_string(),
            integration_type: i.object_type.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct RuleRow {
    id: String,
    position: String,
    enabled: String,
    actions: String,
}

impl From<&ServiceRule> for RuleRow {
    fn from(r: &ServiceRule) -> Self {
        Self {
            id: r.id.clone(),
            position: r.position.map(|p| p.to_string()).unwrap_or_default(),
            enabled: if r.is_enabled() { "yes" } else { "no" }.to_string(),
            actions: r.action_summary(),
        }
    }
}
