//! List trait for fetching collections of resources.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::PagerDutyClient;
use crate::error::Result;
use crate::pagination::{collect_pages, Page};

/// Default page size for list operations (PagerDuty's maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// List resources with offset/limit pagination.
///
/// # Example
///
/// ```ignore
/// use pdapi::{PagerDutyClient, Service, List};
///
/// let client = PagerDutyClient::from_env()?;
///
/// // Fetch a single page
/// let page = Service::list_page(&client, &Default::default(), 0, 25).await?;
///
/// // Fetch all pages
/// let all_services = Service::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering (or the parent ID for nested
    /// resources).
    type Query: Default + Send + Sync;

    /// List resources matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The PagerDuty API client
    /// * `query` - Query parameters for filtering
    /// * `offset` - Offset of the first item
    /// * `limit` - Number of items per page (max 100)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list_page(
        client: &PagerDutyClient,
        query: &Self::Query,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Self>>;

    /// List all resources matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; items from earlier pages
    /// are discarded.
    async fn list_all(client: &PagerDutyClient, query: &Self::Query) -> Result<Vec<Self>> {
        Self::list_all_with_cancel(client, query, None).await
    }

    /// Like [`List::list_all`], checking `cancel` before each page request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagerDutyError::Cancelled`] if the token fires
    /// between pages, or the first page error.
    async fn list_all_with_cancel(
        client: &PagerDutyClient,
        query: &Self::Query,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Self>> {
        collect_pages(cancel, |offset| {
            Self::list_page(client, query, offset, DEFAULT_PAGE_SIZE)
        })
        .await
    }
}
