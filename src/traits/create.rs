//! Create trait for adding resources.

use async_trait::async_trait;

use crate::client::PagerDutyClient;
use crate::error::Result;

/// Create a new resource.
///
/// The record is sent wrapped in its single-key envelope and the server's
/// copy (with its assigned ID) is returned.
#[async_trait]
pub trait Create: Sized + Sync {
    /// The owner the resource is created under (`()` for top-level
    /// resources, the service ID for nested ones).
    type Parent: Send;

    /// Create the resource and return the stored version.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the record or the request fails.
    async fn create(client: &PagerDutyClient, parent: Self::Parent, record: &Self) -> Result<Self>;
}
