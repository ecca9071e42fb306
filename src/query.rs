//! Query string encoding.
//!
//! PagerDuty expects array parameters in bracket form
//! (`include[]=teams&include[]=integrations`), which `serde_urlencoded`
//! cannot produce from a struct. Options types therefore encode themselves
//! into a flat list of pairs that reqwest can send as-is.

use crate::pagination::PaginationParams;

/// Ordered list of query string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// Create an empty pair list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar parameter when it is set and non-empty.
    pub fn push_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Append a numeric parameter when it is set.
    pub fn push_num(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Append an array parameter as `key[]=v` for every value.
    pub fn push_list(&mut self, key: &str, values: &[String]) -> &mut Self {
        let bracketed = format!("{key}[]");
        for value in values {
            self.0.push((bracketed.clone(), value.clone()));
        }
        self
    }

    /// Append `offset` and `limit`.
    pub fn push_pagination(&mut self, params: PaginationParams) -> &mut Self {
        self.push_num("offset", params.offset)
            .push_num("limit", params.limit)
    }

    /// Returns true if no parameter has been added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The pairs, in insertion order.
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    /// Render the pairs as a URL-encoded query string (no leading `?`).
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Types that can be sent as a query string.
pub trait ToQuery {
    /// Encode into query pairs.
    fn to_query(&self) -> QueryPairs;
}

impl ToQuery for () {
    fn to_query(&self) -> QueryPairs {
        QueryPairs::new()
    }
}
