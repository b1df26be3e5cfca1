//! Arrow schema inference and row ↔ Arrow conversion
//!
//! Silver keeps every column as nullable text. Gold promotes a column to
//! Float64 when every non-null cell in it is numeric.

use crate::error::{Error, Result};
use crate::flatten::{Cell, Row, TabularBatch, ITEM_ID, ITEM_NAME};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// How column types are chosen when converting rows to Arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnTyping {
    /// Every column is Utf8
    #[default]
    Text,
    /// Float64 for all-numeric columns, Utf8 otherwise
    Inferred,
}

/// Infer an Arrow schema for a batch
///
/// Columns follow first-seen order; all fields are nullable. An empty batch
/// still gets the identity columns so the parquet file has a schema.
pub fn infer_schema(batch: &TabularBatch, typing: ColumnTyping) -> Schema {
    let mut columns = batch.columns();
    if columns.is_empty() {
        columns = vec![ITEM_ID.to_string(), ITEM_NAME.to_string()];
    }

    let fields: Vec<Field> = columns
        .into_iter()
        .map(|name| {
            let dtype = infer_type(batch, &name, typing);
            Field::new(name, dtype, true)
        })
        .collect();

    Schema::new(fields)
}

fn infer_type(batch: &TabularBatch, name: &str, typing: ColumnTyping) -> DataType {
    if typing == ColumnTyping::Text {
        return DataType::Utf8;
    }

    let mut cells = batch
        .rows
        .iter()
        .filter_map(|row| row.get(name))
        .filter(|cell| !cell.is_null())
        .peekable();

    if cells.peek().is_some() && cells.all(|cell| matches!(cell, Cell::Number(_))) {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Convert rows to an Arrow RecordBatch
pub fn batch_to_arrow(batch: &TabularBatch, typing: ColumnTyping) -> Result<RecordBatch> {
    let schema = Arc::new(infer_schema(batch, typing));

    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| build_array(batch, field.name(), field.data_type()))
        .collect::<Result<_>>()?;

    RecordBatch::try_new(schema, columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

fn build_array(batch: &TabularBatch, name: &str, data_type: &DataType) -> Result<ArrayRef> {
    let cells = batch.rows.iter().map(|row| row.get(name));

    match data_type {
        DataType::Float64 => {
            let arr: Float64Array = cells.map(|c| c.and_then(Cell::as_number)).collect();
            Ok(Arc::new(arr))
        }
        DataType::Utf8 => {
            let arr: StringArray = cells
                .map(|c| c.filter(|c| !c.is_null()).map(ToString::to_string))
                .collect();
            Ok(Arc::new(arr))
        }
        other => Err(Error::output(format!(
            "Unsupported column type {other} for {name}"
        ))),
    }
}

/// Convert an Arrow RecordBatch back into rows
///
/// Utf8 columns become text cells; integer and float columns become
/// numeric cells. Every row carries every column of the schema.
pub fn arrow_to_batch(record_batch: &RecordBatch) -> Result<TabularBatch> {
    let schema = record_batch.schema();
    let mut rows = vec![Row::new(); record_batch.num_rows()];

    for (field, column) in schema.fields().iter().zip(record_batch.columns()) {
        let cells = column_cells(column.as_ref(), field.name())?;
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.set(field.name(), cell);
        }
    }

    Ok(TabularBatch::new(rows))
}

#[allow(clippy::cast_precision_loss)]
fn column_cells(array: &dyn Array, name: &str) -> Result<Vec<Cell>> {
    let len = array.len();
    match array.data_type() {
        DataType::Null => Ok(vec![Cell::Null; len]),
        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, name)?;
            Ok(arr
                .iter()
                .map(|v| v.map_or(Cell::Null, Cell::from))
                .collect())
        }
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, name)?;
            Ok(arr
                .iter()
                .map(|v| v.map_or(Cell::Null, Cell::Number))
                .collect())
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(array, name)?;
            Ok(arr
                .iter()
                .map(|v| v.map_or(Cell::Null, |n| Cell::Number(n as f64)))
                .collect())
        }
        other => Err(Error::output(format!(
            "Unsupported column type {other} for {name}"
        ))),
    }
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Failed to downcast column {name}")))
}
