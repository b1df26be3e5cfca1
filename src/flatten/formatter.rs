//! Snapshot formatter
//!
//! Bronze snapshots come in two shapes: the pre-extracted item list landed
//! by the current pipeline, and the full API envelope landed by earlier
//! versions. Both must keep working for historical data.

use super::flattener::flatten_item;
use super::types::TabularBatch;
use crate::error::{Error, Result};
use crate::source::Item;
use crate::types::{JsonObject, JsonValue};
use tracing::debug;

/// Shape of a bronze snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `[item, item, ...]`
    ItemList,
    /// `{"data": {"boards": [{"items_page": {"items": [...]}}]}}`
    ApiEnvelope,
}

impl SnapshotFormat {
    /// Discriminate the shape of a decoded payload
    pub fn detect(payload: &JsonValue) -> Result<Self> {
        match payload {
            JsonValue::Array(_) => Ok(Self::ItemList),
            JsonValue::Object(obj) if obj.contains_key("data") => Ok(Self::ApiEnvelope),
            JsonValue::Object(_) => Err(Error::unrecognized_format(
                "object snapshot without a `data` key",
            )),
            other => Err(Error::unrecognized_format(format!(
                "expected a list of items or an API envelope, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Decode raw snapshot bytes and flatten them
pub fn format_snapshot_bytes(bytes: &[u8]) -> Result<TabularBatch> {
    let payload: JsonValue = serde_json::from_slice(bytes)
        .map_err(|e| Error::parse(format!("Snapshot is not valid JSON: {e}")))?;
    format_snapshot(&payload)
}

/// Flatten a decoded snapshot into rows
pub fn format_snapshot(payload: &JsonValue) -> Result<TabularBatch> {
    let format = SnapshotFormat::detect(payload)?;
    debug!("Snapshot format detected: {format:?}");

    match (format, payload) {
        (SnapshotFormat::ItemList, JsonValue::Array(items)) => flatten_items(items),
        (SnapshotFormat::ApiEnvelope, JsonValue::Object(envelope)) => flatten_envelope(envelope),
        _ => Err(Error::unrecognized_format("payload does not match detected format")),
    }
}

fn flatten_items(items: &[JsonValue]) -> Result<TabularBatch> {
    items
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let item: Item = serde_json::from_value(raw.clone())
                .map_err(|e| Error::parse(format!("Item {idx} is malformed: {e}")))?;
            Ok(flatten_item(&item))
        })
        .collect::<Result<Vec<_>>>()
        .map(TabularBatch::new)
}

fn flatten_envelope(envelope: &JsonObject) -> Result<TabularBatch> {
    let boards = match envelope.get("data").and_then(|d| d.get("boards")) {
        None | Some(JsonValue::Null) => return Ok(TabularBatch::default()),
        Some(JsonValue::Array(boards)) => boards,
        Some(other) => {
            return Err(Error::unrecognized_format(format!(
                "`data.boards` should be a list, got {}",
                json_kind(other)
            )))
        }
    };

    let mut batch = TabularBatch::default();
    for board in boards {
        let items = board
            .get("items_page")
            .and_then(|page| page.get("items"))
            .and_then(JsonValue::as_array);
        if let Some(items) = items {
            batch.extend(flatten_items(items)?);
        }
    }
    Ok(batch)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
