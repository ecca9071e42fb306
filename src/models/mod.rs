//! PagerDuty API model types.

mod common;
mod integration;
mod rule;
mod service;

pub use common::*;
pub use integration::*;
pub use rule::*;
pub use service::*;

use std::borrow::Cow;

use crate::error::{PagerDutyError, Result};

/// Percent-encode an ID for use as a single path segment.
///
/// Empty IDs and the dot segments `.` and `..` are rejected so that
/// `services/{id}` always names a single resource under its collection.
pub(crate) fn path_segment<'a>(kind: &str, id: &'a str) -> Result<Cow<'a, str>> {
    if id.is_empty() {
        return Err(PagerDutyError::InvalidArgument(format!("{kind} ID is empty")));
    }
    if id == "." || id == ".." {
        return Err(PagerDutyError::InvalidArgument(format!(
            "{kind} ID {id:?} is not a valid path segment"
        )));
    }
    Ok(urlencoding::encode(id))
}
