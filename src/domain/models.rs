use super::errors::{GridError, GridResult};
use super::parser::CellContent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLUMNS: usize = 8;

/// The stored value of a cell.
///
/// Serialized untagged, so a grid payload reads as plain JSON scalars.
/// Timestamps are the one exception: they are written as `{"$ts": "<RFC 3339>"}`
/// so that a text cell holding a date-like string stays text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(#[serde(with = "tagged_timestamp")] DateTime<Utc>),
    Text(String),
}

mod tagged_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        #[serde(rename = "$ts")]
        ts: DateTime<Utc>,
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { ts: *ts }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        Tagged::deserialize(deserializer).map(|tagged| tagged.ts)
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A single grid cell.
///
/// When `formula` is present it starts with `=` and `value` holds the same
/// text. Formulas are stored, never evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Stored value; mirrors the formula text when a formula is present
    #[serde(default)]
    pub value: CellValue,
    /// Raw formula text, always starting with `=`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Whether edits to this cell are refused
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    /// Opaque rendering hints carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_meta: Option<serde_json::Value>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn read_only(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            read_only: true,
            ..Self::default()
        }
    }

    /// Restores the formula invariant on caller-supplied data: a formula that
    /// does not start with `=` is dropped, a valid one overwrites `value`.
    fn normalized(mut self) -> Self {
        match self.formula.take() {
            Some(formula) if formula.starts_with('=') => {
                self.value = CellValue::Text(formula.clone());
                self.formula = Some(formula);
            }
            Some(formula) => {
                tracing::warn!(target: "grid", %formula, "dropping formula without leading '='");
            }
            None => {}
        }
        self
    }

    /// Text a user edits: the formula when present, else the stringified value.
    pub fn raw_content(&self) -> String {
        match &self.formula {
            Some(formula) => formula.clone(),
            None => self.value.to_string(),
        }
    }
}

/// A rectangular matrix of cells with row-level structural sharing.
///
/// Every mutator is pure: it returns a new grid and leaves `self` untouched.
/// Rows that were not modified are shared between the old and the new grid.
///
/// # Examples
///
/// ```
/// use gridentry::domain::{CellContent, Grid};
///
/// let grid = Grid::initialize(Vec::new(), Some(3), Some(2)).unwrap();
/// let next = grid.set_cell_value(1, 1, CellContent::parse("42"));
///
/// assert_eq!(grid.cell(1, 1).unwrap().raw_content(), "");
/// assert_eq!(next.cell(1, 1).unwrap().raw_content(), "42");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Arc<Vec<Cell>>>,
}

impl Grid {
    /// Builds a grid from caller data, or a blank `rows x cols` grid when
    /// `data` is empty. Missing dimensions fall back to 10 rows by 8 columns.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::JaggedRows`] when the rows of `data` differ in length.
    pub fn initialize(
        data: Vec<Vec<Cell>>,
        rows: Option<usize>,
        cols: Option<usize>,
    ) -> GridResult<Self> {
        if !data.is_empty() {
            return Self::from_rows(data);
        }

        let rows = rows.unwrap_or(DEFAULT_ROWS);
        let cols = cols.unwrap_or(DEFAULT_COLUMNS);
        Ok(Self::blank(rows, cols))
    }

    pub fn blank(rows: usize, cols: usize) -> Self {
        let row = Arc::new(vec![Cell::default(); cols]);
        Self {
            rows: vec![row; rows],
        }
    }

    /// Wraps caller data, checking that it is rectangular.
    ///
    /// Cells whose formula breaks the formula invariant are normalized.
    pub fn from_rows(data: Vec<Vec<Cell>>) -> GridResult<Self> {
        let expected = data.first().map(Vec::len).unwrap_or(0);
        if let Some((row, found)) = data
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(GridError::JaggedRows { row, expected, found });
        }

        Ok(Self {
            rows: data
                .into_iter()
                .map(|row| Arc::new(row.into_iter().map(Cell::normalized).collect()))
                .collect(),
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0 || self.num_cols() == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Clones the matrix into plain vectors, e.g. for serialization by a host.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows.iter().map(|row| row.as_ref().clone()).collect()
    }

    /// Returns true when both grids share the same allocation for `row`.
    pub fn shares_row_with(&self, other: &Grid, row: usize) -> bool {
        match (self.rows.get(row), other.rows.get(row)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Writes already-parsed content into one cell.
    ///
    /// Keeps the cell's read-only flag and display metadata. Read-only and
    /// out-of-bounds targets yield an unchanged grid.
    pub fn set_cell_value(&self, row: usize, col: usize, content: CellContent) -> Grid {
        self.update_cell(row, col, |cell| {
            cell.value = content.value;
            cell.formula = content.formula;
        })
    }

    /// Empties a cell's value and drops its formula. No-op on read-only cells.
    pub fn clear_cell(&self, row: usize, col: usize) -> Grid {
        self.update_cell(row, col, |cell| {
            cell.value = CellValue::default();
            cell.formula = None;
        })
    }

    /// Swaps a whole cell record. The target must currently be writable.
    pub fn replace_cell(&self, row: usize, col: usize, replacement: Cell) -> Grid {
        self.update_cell(row, col, |cell| *cell = replacement)
    }

    fn update_cell(&self, row: usize, col: usize, apply: impl FnOnce(&mut Cell)) -> Grid {
        match self.cell(row, col) {
            Some(cell) if !cell.read_only => {}
            Some(_) => {
                tracing::debug!(target: "grid", row, col, "refusing to mutate read-only cell");
                return self.clone();
            }
            None => {
                tracing::debug!(target: "grid", row, col, "ignoring out-of-bounds update");
                return self.clone();
            }
        }

        let mut next = self.clone();
        let cells = Arc::make_mut(&mut next.rows[row]);
        apply(&mut cells[col]);
        next
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row.as_slice())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
