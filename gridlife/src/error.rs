use std::error::Error;
use std::fmt;

/// Errors surfaced by grid operations and the simulation handle.
#[derive(Debug, Clone, PartialEq)]
pub enum LifeError {
    /// A cell coordinate fell outside the current grid.
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
    /// A requested grid dimension was zero.
    InvalidDimensions { rows: u32, cols: u32 },
    /// The requested dimensions multiply out past the supported cell count.
    GridTooLarge { cells: u64, max: u64 },
    /// An alive probability fell outside `[0.0, 1.0]`.
    InvalidProbability { value: f64 },
    /// The operation is only valid while the loop is paused or stopped.
    SimulationRunning,
    /// The simulation task has already exited.
    SimulationClosed,
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            } => {
                write!(f, "cell ({row}, {col}) is outside the {rows}x{cols} grid")
            }
            LifeError::InvalidDimensions { rows, cols } => {
                write!(f, "grid dimensions must be positive, got {rows}x{cols}")
            }
            LifeError::GridTooLarge { cells, max } => {
                write!(f, "grid of {cells} cells exceeds the supported maximum of {max}")
            }
            LifeError::InvalidProbability { value } => {
                write!(f, "alive probability must lie in [0.0, 1.0], got {value}")
            }
            LifeError::SimulationRunning => {
                write!(f, "operation requires a paused or stopped simulation")
            }
            LifeError::SimulationClosed => {
                write!(f, "simulation task is no longer running")
            }
        }
    }
}

impl Error for LifeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_cell() {
        let err = LifeError::OutOfBounds {
            row: 12,
            col: 3,
            rows: 10,
            cols: 10,
        };
        assert_eq!(err.to_string(), "cell (12, 3) is outside the 10x10 grid");
    }

    #[test]
    fn display_reports_zero_dimensions() {
        let err = LifeError::InvalidDimensions { rows: 0, cols: 8 };
        assert_eq!(err.to_string(), "grid dimensions must be positive, got 0x8");
    }

    #[test]
    fn display_reports_probability_value() {
        let err = LifeError::InvalidProbability { value: 1.5 };
        assert_eq!(
            err.to_string(),
            "alive probability must lie in [0.0, 1.0], got 1.5"
        );
    }
}
