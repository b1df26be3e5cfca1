//! Item model returned by the monday.com items-page query
//!
//! These types round-trip through serde so extracted items can be landed
//! in bronze exactly as they were read.

use crate::types::{de_opt_id, JsonValue};
use serde::{Deserialize, Serialize};

/// One business record of a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque item identifier
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,

    /// Display name of the item
    #[serde(default)]
    pub name: Option<String>,

    /// Ordered column values
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl Item {
    /// Create an item with no column values
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            column_values: Vec::new(),
        }
    }

    /// Append a column value
    #[must_use]
    pub fn with_column(mut self, column: ColumnValue) -> Self {
        self.column_values.push(column);
        self
    }
}

/// Column metadata nested under a column value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Human-readable column title
    #[serde(default)]
    pub title: Option<String>,
}

/// One field of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    /// Field identifier (e.g. "status", "numbers3")
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,

    /// Column metadata (title)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnMeta>,

    /// Free-form type tag ("text", "mirror", "board_relation", ...)
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,

    /// Plain text rendering
    #[serde(default)]
    pub text: Option<String>,

    /// Structured value; monday sends a JSON-encoded string, older
    /// snapshots may hold the decoded object
    #[serde(default)]
    pub value: Option<JsonValue>,

    /// Display-oriented string (mirror and relation columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl ColumnValue {
    /// Create a column value with an identifier and type tag
    pub fn new(id: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            column_type: Some(column_type.into()),
            ..Default::default()
        }
    }

    /// Set the column title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.column = Some(ColumnMeta {
            title: Some(title.into()),
        });
        self
    }

    /// Set the text representation
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the structured value
    #[must_use]
    pub fn with_value(mut self, value: JsonValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the display value
    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display_value = Some(display.into());
        self
    }

    /// Column title, if present
    pub fn title(&self) -> Option<&str> {
        self.column.as_ref().and_then(|c| c.title.as_deref())
    }

    /// Type tag, empty when absent
    pub fn type_tag(&self) -> &str {
        self.column_type.as_deref().unwrap_or_default()
    }
}

/// One page of an items-page response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsPage {
    /// Cursor for the next page; `None` when exhausted
    #[serde(default)]
    pub cursor: Option<String>,

    /// Items of this page, in response order
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ItemsPage {
    /// Create a page
    pub fn new(items: Vec<Item>, cursor: Option<String>) -> Self {
        Self { cursor, items }
    }

    /// Is this the last page?
    pub fn is_last(&self) -> bool {
        self.cursor.is_none()
    }
}
