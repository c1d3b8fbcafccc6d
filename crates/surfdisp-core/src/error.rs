use surfdisp_symbolic::SymbolicError;

/// Invalid matrix dimensions supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{op}: expected a square matrix, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("{op}: {left:?} and {right:?} operands must have the same shape")]
    Mismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("symbolic: {0}")]
    Symbolic(#[from] SymbolicError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;

pub(crate) fn require_square(op: &'static str, shape: (usize, usize)) -> Result<usize> {
    let (rows, cols) = shape;
    if rows != cols {
        return Err(ShapeError::NotSquare { op, rows, cols }.into());
    }
    Ok(rows)
}
