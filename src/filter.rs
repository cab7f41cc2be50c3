//! Field-level filtering of structured records.
//!
//! Constraints live under the record's `message` sub-object. An unset
//! constraint is the absence of a constraint, not a wildcard: it matches
//! every record, including records whose `message` shape is malformed. A set
//! constraint matches only on exact equality; a record that is missing the
//! expected field, or carries it with the wrong type, does not match.

use serde_json::{Map, Value};

/// Optional field constraints applied to structured records before pattern
/// matching. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub practice_id: Option<i64>,
    pub request_id: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.practice_id.is_none() && self.request_id.is_none()
    }
}

/// Looks up `message.<field>` in a record, or `None` on any shape mismatch.
fn message_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get("message")?.as_object()?.get(key)
}

fn practice_id_matches(fields: &Map<String, Value>, criteria: &FilterCriteria) -> bool {
    let Some(want) = criteria.practice_id else {
        return true;
    };
    message_field(fields, "practice_id")
        .and_then(Value::as_i64)
        .is_some_and(|got| got == want)
}

fn request_id_matches(fields: &Map<String, Value>, criteria: &FilterCriteria) -> bool {
    let Some(want) = &criteria.request_id else {
        return true;
    };
    message_field(fields, "request_id")
        .and_then(Value::as_str)
        .is_some_and(|got| got == want)
}

/// Returns true iff every set constraint is satisfied by the record.
pub fn matches(fields: &Map<String, Value>, criteria: &FilterCriteria) -> bool {
    practice_id_matches(fields, criteria) && request_id_matches(fields, criteria)
}
