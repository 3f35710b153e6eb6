//! Construction-time configuration for a grid controller.

use crate::domain::{Cell, DEFAULT_COLUMNS, DEFAULT_ROWS};
use serde::Deserialize;

/// Options a host passes when creating a [`GridController`](super::GridController).
///
/// Every field is optional when deserialized; missing keys take the
/// [`Default`] values (10 rows, 8 columns, writable, formula bar shown).
///
/// # Examples
///
/// ```
/// use gridentry::application::GridConfig;
///
/// let config: GridConfig = serde_json::from_str(r#"{ "rows": 4, "readOnly": true }"#).unwrap();
/// assert_eq!(config.rows, 4);
/// assert_eq!(config.columns, 8);
/// assert!(config.read_only);
/// assert!(config.formula_bar_enabled);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Caller-supplied matrix; when empty a blank `rows x columns` grid is built
    pub initial_grid: Vec<Vec<Cell>>,
    pub rows: usize,
    pub columns: usize,
    /// Refuses every edit regardless of per-cell flags
    pub read_only: bool,
    pub formula_bar_enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            initial_grid: Vec::new(),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            read_only: false,
            formula_bar_enabled: true,
        }
    }
}

impl GridConfig {
    pub fn with_initial_grid(mut self, grid: Vec<Vec<Cell>>) -> Self {
        self.initial_grid = grid;
        self
    }

    pub fn with_dimensions(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_formula_bar(mut self, enabled: bool) -> Self {
        self.formula_bar_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert!(config.initial_grid.is_empty());
        assert_eq!(config.rows, 10);
        assert_eq!(config.columns, 8);
        assert!(!config.read_only);
        assert!(config.formula_bar_enabled);
    }

    #[test]
    fn test_deserialize_with_initial_grid() {
        let config: GridConfig = serde_json::from_str(
            r#"{
                "initialGrid": [[{ "value": "a" }, { "value": 2, "readOnly": true }]],
                "formulaBarEnabled": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.initial_grid.len(), 1);
        assert!(config.initial_grid[0][1].read_only);
        assert!(!config.formula_bar_enabled);
        assert_eq!(config.rows, 10);
    }

    #[test]
    fn test_builder() {
        let config = GridConfig::default()
            .with_dimensions(2, 3)
            .with_read_only(true)
            .with_formula_bar(false);
        assert_eq!((config.rows, config.columns), (2, 3));
        assert!(config.read_only);
        assert!(!config.formula_bar_enabled);
    }
}
