//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the pdapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{PagerDutyError, Result};

/// PagerDuty services command-line interface.
#[derive(Parser, Debug)]
#[command(name = "pdapi", about = "PagerDuty services, integrations and rules CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a single entity by ID.
    #[command(alias = "show")]
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,

        /// Owning service ID (required for integrations and rules).
        #[arg(long)]
        service: Option<String>,

        /// Related objects to expand (services and integrations, repeatable).
        #[arg(long = "include")]
        includes: Vec<String>,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Owning service ID (required for integrations and rules).
        #[arg(long)]
        service: Option<String>,

        /// Offset of the first item.
        #[arg(long)]
        offset: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        limit: Option<u32>,

        /// Follow pagination and print every item.
        #[arg(long, conflicts_with_all = ["offset", "limit"])]
        all: bool,

        /// Filter services by name (services only).
        #[arg(long)]
        query: Option<String>,

        /// Only services of these teams (services only, repeatable).
        #[arg(long = "team-id")]
        team_ids: Vec<String>,

        /// Service sort order (`name`, `name:asc`, `name:desc`; services only).
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Update an entity (fetches it, applies the changes and sends it back).
    Update {
        /// The type of entity to update.
        entity: Entity,

        /// The entity ID.
        id: String,

        /// Owning service ID (required for integrations and rules).
        #[arg(long)]
        service: Option<String>,

        /// New name (services and integrations).
        #[arg(long)]
        name: Option<String>,

        /// New description (services).
        #[arg(long)]
        description: Option<String>,

        /// Enable or disable the rule (rules).
        #[arg(long)]
        disabled: Option<bool>,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: String,

        /// Owning service ID (required for integrations and rules).
        #[arg(long)]
        service: Option<String>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A PagerDuty service.
    #[value(alias = "services")]
    Service,
    /// An integration of a service.
    #[value(alias = "integrations")]
    Integration,
    /// A service rule.
    #[value(alias = "rules", alias = "service-rule")]
    Rule,
}

impl Entity {
    /// Returns true if the entity lives under a service.
    pub fn needs_service(self) -> bool {
        !matches!(self, Entity::Service)
    }

    /// Plural name used in messages.
    pub fn plural(self) -> &'static str {
        match self {
            Entity::Service => "services",
            Entity::Integration => "integrations",
            Entity::Rule => "rules",
        }
    }
}

impl Command {
    /// The entity the command operates on.
    pub fn entity(&self) -> Entity {
        match self {
            Command::Get { entity, .. }
            | Command::List { entity, .. }
            | Command::Update { entity, .. }
            | Command::Delete { entity, .. } => *entity,
        }
    }

    /// Reject flags that do not apply to the chosen entity.
    ///
    /// A flag that would otherwise be dropped silently is an error, e.g.
    /// `--service` on a service or `--query` on a rule listing.
    ///
    /// # Errors
    ///
    /// Returns [`PagerDutyError::InvalidArgument`] naming the first
    /// offending flag.
    pub fn validate(&self) -> Result<()> {
        let entity = self.entity();
        let mut ignored = Vec::new();

        match self {
            Command::Get {
                service, includes, ..
            } => {
                ignored.push(("--service", entity == Entity::Service && service.is_some()));
                ignored.push(("--include", entity == Entity::Rule && !includes.is_empty()));
            }
            Command::List {
                service,
                query,
                team_ids,
                sort_by,
                ..
            } => {
                let nested = entity.needs_service();
                ignored.push(("--service", !nested && service.is_some()));
                ignored.push(("--query", nested && query.is_some()));
                ignored.push(("--team-id", nested && !team_ids.is_empty()));
                ignored.push(("--sort-by", nested && sort_by.is_some()));
            }
            Command::Update {
                service,
                name,
                description,
                disabled,
                ..
            } => {
                ignored.push(("--service", entity == Entity::Service && service.is_some()));
                ignored.push(("--name", entity == Entity::Rule && name.is_some()));
                ignored.push((
                    "--description",
                    entity != Entity::Service && description.is_some(),
                ));
                ignored.push(("--disabled", entity != Entity::Rule && disabled.is_some()));
            }
            Command::Delete { service, .. } => {
                ignored.push(("--service", entity == Entity::Service && service.is_some()));
            }
        }

        match ignored.into_iter().find(|(_, hit)| *hit) {
            Some((flag, _)) => Err(PagerDutyError::InvalidArgument(format!(
                "{flag} does not apply to {}",
                entity.plural()
            ))),
            None => Ok(()),
        }
    }
}
