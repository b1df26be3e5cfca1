//! Record flattener
//!
//! Folds the column values of one item into a [`Row`]. Column names come
//! from titles (falling back to field ids); a name already present in the
//! row being built gets the first free `_1`, `_2`, ... suffix, so the final
//! shape depends on column order.

use super::types::{Cell, ColumnKind, Row};
use crate::source::{ColumnValue, Item};
use crate::types::{JsonValue, OptionStringExt};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Separator used when joining multi-valued cells
pub const MULTI_VALUE_SEPARATOR: &str = " | ";

/// Name given to a column value with neither title nor id
pub const UNNAMED_COLUMN: &str = "unnamed";

/// Flatten one item into a row
///
/// Always yields `item_id` and `item_name`; missing fields become nulls.
pub fn flatten_item(item: &Item) -> Row {
    item.column_values.iter().fold(
        Row::for_item(item.id.clone(), item.name.clone()),
        |mut row, column| {
            let base = column_name(column);
            row.insert_unique(&base, resolve_cell(column));
            row
        },
    )
}

/// Candidate column name: title if non-blank, else field id, else
/// [`UNNAMED_COLUMN`], with whitespace runs collapsed to `_`
pub fn column_name(column: &ColumnValue) -> String {
    let raw = [column.title(), column.id.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNNAMED_COLUMN);
    WHITESPACE_RUN.replace_all(raw, "_").into_owned()
}

/// Render the cell for a column value according to its kind
pub fn resolve_cell(column: &ColumnValue) -> Cell {
    match ColumnKind::from_type_tag(column.type_tag()) {
        ColumnKind::Mirror => resolve_mirror(column),
        ColumnKind::Plain => resolve_plain(column),
    }
}

/// Display string split on `,` and re-joined with ` | `; else linked item
/// ids; else null
fn resolve_mirror(column: &ColumnValue) -> Cell {
    if let Some(display) = column.display_value.as_deref().filter(|d| !d.is_empty()) {
        let joined = display
            .split(',')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_SEPARATOR);
        return Cell::Text(joined);
    }

    column
        .value
        .as_ref()
        .and_then(linked_item_ids)
        .map_or(Cell::Null, |ids| Cell::Text(ids.join(MULTI_VALUE_SEPARATOR)))
}

/// Non-empty text, else non-empty structured value, else null
fn resolve_plain(column: &ColumnValue) -> Cell {
    column
        .text
        .clone()
        .none_if_empty()
        .or_else(|| column.value.as_ref().and_then(value_text))
        .into()
}

/// Textual form of a structured value
fn value_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => s.clone().none_if_empty(),
        other => Some(other.to_string()),
    }
}

/// Ids under `linkedPulseIds[*].linkedPulseId`
///
/// The value may be the decoded object or its JSON-encoded string form.
fn linked_item_ids(value: &JsonValue) -> Option<Vec<String>> {
    let decoded;
    let object = match value {
        JsonValue::String(s) => {
            decoded = serde_json::from_str::<JsonValue>(s).ok()?;
            &decoded
        }
        other => other,
    };

    let links = object.get("linkedPulseIds")?.as_array()?;
    Some(
        links
            .iter()
            .filter_map(|link| match link.get("linkedPulseId")? {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
    )
}
