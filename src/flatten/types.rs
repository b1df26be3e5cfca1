//! Tabular types shared by the silver and gold layers

use std::fmt;

/// Column holding the item identifier
pub const ITEM_ID: &str = "item_id";

/// Column holding the item name
pub const ITEM_NAME: &str = "item_name";

/// Column tagging rows with the board they came from
pub const BOARD_ORIGIN: &str = "board_origem";

/// A scalar cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value
    #[default]
    Null,
    /// Text value
    Text(String),
    /// Numeric value (gold monetary columns)
    Number(f64),
}

impl Cell {
    /// Is this cell null?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a number cell
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One flattened record: ordered, unique column names mapped to cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Cell)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row seeded with `item_id` and `item_name`
    pub fn for_item(id: Option<String>, name: Option<String>) -> Self {
        Self {
            entries: vec![
                (ITEM_ID.to_string(), Cell::from(id)),
                (ITEM_NAME.to_string(), Cell::from(name)),
            ],
        }
    }

    /// Does the row already hold `name`?
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Get the cell stored under `name`
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Get a text cell stored under `name`
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Cell::as_text)
    }

    /// First free name for `base`: `base`, then `base_1`, `base_2`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Insert under a collision-free name derived from `base`
    ///
    /// Returns the name actually used.
    pub fn insert_unique(&mut self, base: &str, cell: Cell) -> String {
        let name = self.unique_name(base);
        self.entries.push((name.clone(), cell));
        name
    }

    /// Set `name`, replacing an existing value in place
    pub fn set(&mut self, name: &str, cell: Cell) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == name) {
            slot.1 = cell;
        } else {
            self.entries.push((name.to_string(), cell));
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the row empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(name, cell)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable iteration over cells
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Cell)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Row {
    type Item = (String, Cell);
    type IntoIter = std::vec::IntoIter<(String, Cell)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(&k.into(), v.into());
        }
        row
    }
}

/// Rows produced from one snapshot (or the concatenation of several)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularBatch {
    /// Rows in snapshot order
    pub rows: Vec<Row>,
}

impl TabularBatch {
    /// Create a batch from rows
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Is the batch empty?
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of column names in first-seen order
    pub fn columns(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut columns = Vec::new();
        for row in &self.rows {
            for name in row.columns() {
                if seen.insert(name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }

    /// Append all rows of another batch
    pub fn extend(&mut self, other: TabularBatch) {
        self.rows.extend(other.rows);
    }

    /// Tag every row with the board it came from
    pub fn tag_origin(&mut self, board: &str) {
        for row in &mut self.rows {
            row.set(BOARD_ORIGIN, Cell::from(board));
        }
    }
}

impl FromIterator<TabularBatch> for TabularBatch {
    fn from_iter<T: IntoIterator<Item = TabularBatch>>(iter: T) -> Self {
        let mut out = TabularBatch::default();
        for batch in iter {
            out.extend(batch);
        }
        out
    }
}

/// How a column value is rendered, chosen from its type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Reference/rollup of linked items: display string or linked ids
    Mirror,
    /// Any other type: text, else structured value
    Plain,
}

impl ColumnKind {
    /// Dispatch on the type tag; only `mirror` is special
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "mirror" => Self::Mirror,
            _ => Self::Plain,
        }
    }
}
