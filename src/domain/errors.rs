#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    JaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    InvalidReference(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::JaggedRows { row, expected, found } => {
                write!(
                    f,
                    "Jagged grid: row {} has {} cells, expected {}",
                    row + 1,
                    found,
                    expected
                )
            }
            GridError::InvalidReference(ref_str) => {
                write!(f, "Invalid cell reference: {}", ref_str)
            }
        }
    }
}

impl std::error::Error for GridError {}

pub type GridResult<T> = Result<T, GridError>;
