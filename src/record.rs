//! Rows flowing through the pipeline.
//!
//! A row is created by a file worker, handed off by value across channel
//! boundaries, and either discarded or subsumed into a heap entry. It is
//! never shared between workers.

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::Result;

/// One candidate row: a raw text line or a decoded JSON record, tagged with
/// the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    PlainLine {
        text: String,
        path: PathBuf,
    },
    StructuredRecord {
        fields: Map<String, Value>,
        path: PathBuf,
    },
}

impl Row {
    pub fn origin(&self) -> &PathBuf {
        match self {
            Row::PlainLine { path, .. } => path,
            Row::StructuredRecord { path, .. } => path,
        }
    }

    /// The byte form tested against the search pattern: the raw line, or the
    /// record's canonical JSON encoding (field order preserved from decode).
    pub fn matchable_text(&self) -> Result<String> {
        match self {
            Row::PlainLine { text, .. } => Ok(text.clone()),
            Row::StructuredRecord { fields, .. } => Ok(serde_json::to_string(fields)?),
        }
    }

    /// Derives the key this row sorts under in the output.
    ///
    /// Structured rows sort by the `message.asctime` string, which is exact
    /// for ISO-8601-style timestamps compared bytewise. A record missing that
    /// field (or carrying it mis-typed) yields `None`; the caller drops the
    /// row instead of crashing. Plain rows sort by their own text.
    pub fn sort_key(&self) -> Option<String> {
        match self {
            Row::PlainLine { text, .. } => Some(text.clone()),
            Row::StructuredRecord { fields, .. } => fields
                .get("message")?
                .as_object()?
                .get("asctime")?
                .as_str()
                .map(str::to_string),
        }
    }

    /// The representation written to stdout, one per matched row.
    pub fn render(&self) -> Result<String> {
        match self {
            Row::PlainLine { text, .. } => Ok(text.clone()),
            Row::StructuredRecord { fields, .. } => Ok(serde_json::to_string(fields)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: Value) -> Row {
        Row::StructuredRecord {
            fields: value.as_object().unwrap().clone(),
            path: PathBuf::from("app.log"),
        }
    }

    #[test]
    fn plain_rows_sort_and_render_as_their_text() {
        let row = Row::PlainLine {
            text: "alpha".into(),
            path: PathBuf::from("notes.txt"),
        };
        assert_eq!(row.sort_key().as_deref(), Some("alpha"));
        assert_eq!(row.render().unwrap(), "alpha");
        assert_eq!(row.matchable_text().unwrap(), "alpha");
    }

    #[test]
    fn structured_rows_sort_by_asctime() {
        let row = structured(json!({
            "message": {"asctime": "2020-05-03 11:10:12,112", "message": "vulture"}
        }));
        assert_eq!(row.sort_key().as_deref(), Some("2020-05-03 11:10:12,112"));
    }

    #[test]
    fn missing_or_mistyped_asctime_yields_no_key() {
        assert_eq!(structured(json!({"message": {}})).sort_key(), None);
        assert_eq!(structured(json!({"other": 1})).sort_key(), None);
        assert_eq!(
            structured(json!({"message": {"asctime": 12345}})).sort_key(),
            None
        );
        assert_eq!(structured(json!({"message": "text"})).sort_key(), None);
    }

    #[test]
    fn render_preserves_field_order() {
        let row = structured(json!({"b": 1, "a": 2, "message": {"asctime": "t"}}));
        assert_eq!(
            row.render().unwrap(),
            r#"{"b":1,"a":2,"message":{"asctime":"t"}}"#
        );
        // render and matchable text agree, so what matched is what prints
        assert_eq!(row.render().unwrap(), row.matchable_text().unwrap());
    }
}
