//! Command-line arguments for the terminal host.

use crate::application::GridConfig;
use crate::domain::Cell;
use crate::infrastructure::{FileRepository, PersistenceError};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gridentry", version, about = "Keyboard-driven grid data entry in the terminal")]
pub struct Args {
    /// Grid file to open (JSON rows of cells, or .csv to import)
    pub file: Option<PathBuf>,

    /// Rows of a blank grid
    #[arg(long)]
    pub rows: Option<usize>,

    /// Columns of a blank grid
    #[arg(long)]
    pub columns: Option<usize>,

    /// Refuse every edit
    #[arg(long)]
    pub read_only: bool,

    /// Hide the formula bar
    #[arg(long)]
    pub no_formula_bar: bool,

    /// JSON file with a grid configuration
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the grid as CSV to PATH and exit without starting the UI
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

impl Args {
    /// Builds the controller configuration: config file first, then the
    /// grid file, then command-line overrides.
    pub fn to_config(&self) -> Result<GridConfig, PersistenceError> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str::<GridConfig>(&fs::read_to_string(path)?)?,
            None => GridConfig::default(),
        };

        if let Some(path) = self.file.as_deref().filter(|p| p.exists()) {
            config.initial_grid = load_initial_grid(path)?;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if self.read_only {
            config.read_only = true;
        }
        if self.no_formula_bar {
            config.formula_bar_enabled = false;
        }

        Ok(config)
    }

    /// JSON path that Ctrl+S writes to. CSV inputs save next to themselves.
    pub fn save_path(&self) -> Option<PathBuf> {
        self.file.as_ref().map(|path| {
            if is_csv(path) {
                path.with_extension("json")
            } else {
                path.clone()
            }
        })
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn load_initial_grid(path: &Path) -> Result<Vec<Vec<Cell>>, PersistenceError> {
    let grid = if is_csv(path) {
        FileRepository::import_csv(path)?
    } else {
        FileRepository::load_grid(path)?
    };
    Ok(grid.to_rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Grid;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["gridentry"]).unwrap();
        let config = args.to_config().unwrap();
        assert_eq!((config.rows, config.columns), (10, 8));
        assert!(config.formula_bar_enabled);
        assert!(args.save_path().is_none());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{ "rows": 3, "columns": 2, "formulaBarEnabled": true }"#).unwrap();

        let args = Args::try_parse_from([
            "gridentry",
            "--config",
            config_path.to_str().unwrap(),
            "--columns",
            "5",
            "--read-only",
            "--no-formula-bar",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!((config.rows, config.columns), (3, 5));
        assert!(config.read_only);
        assert!(!config.formula_bar_enabled);
    }

    #[test]
    fn test_loads_existing_grid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.json");
        let grid = Grid::from_rows(vec![vec![Cell::new("a"), Cell::new(1.0)]]).unwrap();
        FileRepository::save_grid(&grid, &path).unwrap();

        let args = Args::try_parse_from(["gridentry", path.to_str().unwrap()]).unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.initial_grid, grid.to_rows());
        assert_eq!(args.save_path(), Some(path));
    }

    #[test]
    fn test_missing_file_starts_blank() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.json");
        let args = Args::try_parse_from(["gridentry", path.to_str().unwrap()]).unwrap();
        assert!(args.to_config().unwrap().initial_grid.is_empty());
    }

    #[test]
    fn test_csv_input_saves_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "1,2\n3,4\n").unwrap();

        let args = Args::try_parse_from(["gridentry", path.to_str().unwrap()]).unwrap();
        assert_eq!(args.to_config().unwrap().initial_grid.len(), 2);
        assert_eq!(args.save_path(), Some(dir.path().join("data.json")));
    }
}
