//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::PagerDutyClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use pdapi::{PagerDutyClient, Service, Get, GetServiceOptions};
///
/// let client = PagerDutyClient::from_env()?;
/// let service = Service::get(&client, "PXXXXXX".to_string(), &GetServiceOptions::default()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource. Nested resources use
    /// `(service_id, id)` pairs.
    type Id: Send;

    /// Extra query options for the request (e.g. `include[]` expansions).
    type Options: Default + Send + Sync;

    /// Fetch the resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found, the request fails,
    /// or the response envelope cannot be decoded.
    async fn get(client: &PagerDutyClient, id: Self::Id, options: &Self::Options) -> Result<Self>;
}
