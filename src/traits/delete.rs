//! Delete trait for removing resources.

use async_trait::async_trait;

use crate::client::PagerDutyClient;
use crate::error::Result;

/// Delete a resource by ID. No response body is expected.
#[async_trait]
pub trait Delete {
    /// The ID type for this resource.
    type Id: Send;

    /// Delete the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn delete(client: &PagerDutyClient, id: Self::Id) -> Result<()>;
}
