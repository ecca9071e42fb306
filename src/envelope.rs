//! Single-key JSON envelopes.
//!
//! PagerDuty wraps every resource under a root field named after its type,
//! both in request bodies (`{"service": {...}}`) and responses.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::{PagerDutyError, Result};

/// A value wrapped under a single root key for sending.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a, T> {
    root: &'static str,
    value: &'a T,
}

impl<'a, T> Envelope<'a, T> {
    /// Wrap `value` under `root`.
    pub fn new(root: &'static str, value: &'a T) -> Self {
        Self { root, value }
    }
}

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.root, self.value)?;
        map.end()
    }
}

/// Decode `body` as a JSON object and extract the value under `root`.
///
/// # Errors
///
/// Returns [`PagerDutyError::Decode`] if the body is not a JSON object or the
/// root value does not match `T`, and [`PagerDutyError::MissingField`] if the
/// object has no `root` key.
pub fn unwrap_envelope<T: DeserializeOwned>(body: &[u8], root: &str) -> Result<T> {
    let mut object: Map<String, Value> = serde_json::from_slice(body)?;
    let value = object
        .remove(root)
        .ok_or_else(|| PagerDutyError::MissingField(root.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// Read a response body once and extract the value under `root`.
pub(crate) async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
    root: &str,
) -> Result<T> {
    let body = response.bytes().await.map_err(PagerDutyError::Http)?;
    unwrap_envelope(&body, root)
}

/// Read a response body once and decode it as `T` (used for list pages,
/// which carry paging metadata next to the items).
pub(crate) async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await.map_err(PagerDutyError::Http)?;
    Ok(serde_json::from_slice(&body)?)
}
