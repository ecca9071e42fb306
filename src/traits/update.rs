//! Update trait for modifying resources.

use async_trait::async_trait;

use crate::client::PagerDutyClient;
use crate::error::Result;

/// Replace an existing resource.
///
/// The whole record is sent; fields left unset are not preserved by the
/// client, so fetch, modify and send back to change a single field.
///
/// # Example
///
/// ```ignore
/// use pdapi::{PagerDutyClient, Service, Get, Update};
///
/// let client = PagerDutyClient::from_env()?;
/// let mut service = Service::get(&client, "PXXXXXX".to_string(), &Default::default()).await?;
/// service.description = Some("Checkout frontend".to_string());
/// let updated = Service::update(&client, service.id.clone(), &service).await?;
/// ```
#[async_trait]
pub trait Update: Sized + Sync {
    /// The ID type for this resource.
    type Id: Send;

    /// Update the resource and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn update(client: &PagerDutyClient, id: Self::Id, record: &Self) -> Result<Self>;
}
