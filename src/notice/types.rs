//! Notice board row types.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::{row_to_json, DbRow, SqlValue};
use crate::Result;

/// A row of `notice_board`, as a column-to-value object.
///
/// The columns are whatever the table has, so a schema change shows up in
/// the API without touching this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NoticeBoardEntry(Map<String, Value>);

impl NoticeBoardEntry {
    /// Build an entry from a fetched row.
    pub fn from_row(row: &DbRow) -> Result<Self> {
        row_to_json(row).map(Self)
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Column names, in select order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for NoticeBoardEntry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Data for inserting a new row.
///
/// Fields are bound as given; a field left at [`SqlValue::Null`] stores NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNoticeEntry {
    /// Post number.
    pub post_no: SqlValue,
    /// Author identifier.
    pub author_id: SqlValue,
    /// Post title.
    pub title: SqlValue,
    /// Post body.
    pub content: SqlValue,
    /// Creation timestamp.
    pub created_at: SqlValue,
}

impl NewNoticeEntry {
    /// Create a new entry with only the post number set.
    pub fn new(post_no: impl Into<SqlValue>) -> Self {
        Self {
            post_no: post_no.into(),
            ..Default::default()
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author_id: impl Into<SqlValue>) -> Self {
        self.author_id = author_id.into();
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<SqlValue>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body.
    pub fn with_content(mut self, content: impl Into<SqlValue>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<SqlValue>) -> Self {
        self.created_at = created_at.into();
        self
    }
}

/// Replacement values for an existing row.
///
/// Unlike a partial update, all four columns are written; `Null` stores NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeEntryUpdate {
    /// Author identifier.
    pub author_id: SqlValue,
    /// Post title.
    pub title: SqlValue,
    /// Post body.
    pub content: SqlValue,
    /// Creation timestamp.
    pub created_at: SqlValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_entry_builder() {
        let entry = NewNoticeEntry::new(1)
            .with_author(5)
            .with_title("t")
            .with_content("c")
            .with_created_at("2024-01-01");

        assert_eq!(entry.post_no, SqlValue::Int(1));
        assert_eq!(entry.author_id, SqlValue::Int(5));
        assert_eq!(entry.title, SqlValue::from("t"));
        assert_eq!(entry.content, SqlValue::from("c"));
        assert_eq!(entry.created_at, SqlValue::from("2024-01-01"));
    }

    #[test]
    fn test_new_entry_defaults_to_nulls() {
        let entry = NewNoticeEntry::new("5");
        assert_eq!(entry.post_no, SqlValue::from("5"));
        assert!(entry.author_id.is_null());
        assert!(entry.title.is_null());
        assert!(entry.content.is_null());
        assert!(entry.created_at.is_null());
    }

    #[test]
    fn test_entry_serializes_as_plain_object() {
        let mut map = Map::new();
        map.insert("post_no".to_string(), json!(3));
        map.insert("title".to_string(), json!("hello"));
        let entry = NoticeBoardEntry::from(map);

        assert_eq!(entry.get("post_no"), Some(&json!(3)));
        assert_eq!(entry.columns().collect::<Vec<_>>(), vec!["post_no", "title"]);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "post_no": 3, "title": "hello" })
        );
    }
}
