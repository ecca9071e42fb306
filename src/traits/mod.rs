//! Trait definitions for PagerDuty operations.
//!
//! Each resource type implements the traits it supports, encapsulating
//! path and envelope differences in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use update::Update;
