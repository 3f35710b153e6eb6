use crate::domain::{Cell, CellContent, Grid, GridError};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Grid(GridError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "{}", e),
            PersistenceError::Json(e) => write!(f, "Invalid file format - {}", e),
            PersistenceError::Csv(e) => write!(f, "Invalid CSV - {}", e),
            PersistenceError::Grid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(e: csv::Error) -> Self {
        PersistenceError::Csv(e)
    }
}

impl From<GridError> for PersistenceError {
    fn from(e: GridError) -> Self {
        PersistenceError::Grid(e)
    }
}

/// Reads and writes grids in the shape the controller hands to `onChange`.
pub struct FileRepository;

impl FileRepository {
    /// Writes the grid as pretty-printed JSON rows of cells.
    pub fn save_grid(grid: &Grid, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(grid)?;
        fs::write(path.as_ref(), json)?;
        tracing::debug!(target: "persistence", path = %path.as_ref().display(), "grid saved");
        Ok(())
    }

    pub fn load_grid(path: impl AsRef<Path>) -> Result<Grid, PersistenceError> {
        let content = fs::read_to_string(path.as_ref())?;
        let grid = serde_json::from_str::<Grid>(&content)?;
        tracing::debug!(
            target: "persistence",
            path = %path.as_ref().display(),
            rows = grid.num_rows(),
            "grid loaded"
        );
        Ok(grid)
    }

    /// Writes each cell's raw content (formula text for formula cells).
    pub fn export_csv(grid: &Grid, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path.as_ref())?;
        for row in grid.rows() {
            writer.write_record(row.iter().map(Cell::raw_content))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a CSV file into a grid, parsing every field with the commit rule.
    ///
    /// Short records are padded with empty cells so the result is rectangular.
    pub fn import_csv(path: impl AsRef<Path>) -> Result<Grid, PersistenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path.as_ref())?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    let content = CellContent::parse(field);
                    Cell {
                        value: content.value,
                        formula: content.formula,
                        ..Cell::default()
                    }
                })
                .collect();
            rows.push(row);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::default());
        }

        Ok(Grid::from_rows(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;
    use tempfile::tempdir;

    fn sample_grid() -> Grid {
        let grid = Grid::from_rows(vec![
            vec![Cell::new("name"), Cell::read_only("total")],
            vec![Cell::new(""), Cell::new(2.5)],
        ])
        .unwrap();
        grid.set_cell_value(1, 0, CellContent::parse("=B2*2"))
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.json");

        let grid = sample_grid();
        FileRepository::save_grid(&grid, &path).unwrap();
        let loaded = FileRepository::load_grid(&path).unwrap();

        assert_eq!(loaded, grid);
        assert!(loaded.cell(0, 1).unwrap().read_only);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = FileRepository::load_grid(dir.path().join("missing.json"));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_load_jagged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jagged.json");
        fs::write(&path, r#"[[{"value": 1}, {"value": 2}], [{"value": 3}]]"#).unwrap();

        let result = FileRepository::load_grid(&path);
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_csv_export_writes_raw_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.csv");

        FileRepository::export_csv(&sample_grid(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "name,total\n=B2*2,2.5\n");
    }

    #[test]
    fn test_csv_import_parses_and_pads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,1,=A1\n\"x, y\"\n").unwrap();

        let grid = FileRepository::import_csv(&path).unwrap();
        assert_eq!(grid.num_rows(), 2);
        assert_eq!(grid.num_cols(), 3);
        assert_eq!(grid.cell(0, 1).unwrap().value, CellValue::Number(1.0));
        assert_eq!(grid.cell(0, 2).unwrap().formula.as_deref(), Some("=A1"));
        assert_eq!(grid.cell(1, 0).unwrap().value, CellValue::Text("x, y".to_string()));
        assert_eq!(grid.cell(1, 2).unwrap().value, CellValue::Text(String::new()));
    }
}
