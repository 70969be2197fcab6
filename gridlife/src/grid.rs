// grid.rs - Bounded Game of Life grid with an incrementally tracked population

use rand::Rng;

use crate::error::LifeError;

/// State of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        matches!(self, CellState::Alive)
    }

    pub fn toggled(self) -> CellState {
        match self {
            CellState::Dead => CellState::Alive,
            CellState::Alive => CellState::Dead,
        }
    }
}

/// Counts of live and dead neighbors inside the grid boundary.
///
/// Neighbors past the boundary are not counted at all, so `live + dead` is 3
/// for a corner cell, 5 for an edge cell and 8 for an interior cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborStates {
    pub live: u8,
    pub dead: u8,
}

/// Rectangular cell grid stored row-major in a flat buffer.
///
/// The live-cell population is maintained incrementally by every mutation,
/// so reading it never rescans the buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<CellState>,
    population: usize,
}

impl Grid {
    /// Upper bound on `rows * cols` accepted by any constructor or resize.
    pub const MAX_CELLS: usize = 1 << 20;

    /// Creates an all-dead grid of the given dimensions.
    pub fn new(rows: u32, cols: u32) -> Result<Self, LifeError> {
        let cell_count = Self::validate_dims(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::Dead; cell_count],
            population: 0,
        })
    }

    pub(crate) fn validate_dims(rows: u32, cols: u32) -> Result<usize, LifeError> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimensions { rows, cols });
        }
        let cells = u64::from(rows) * u64::from(cols);
        if cells > Self::MAX_CELLS as u64 {
            return Err(LifeError::GridTooLarge {
                cells,
                max: Self::MAX_CELLS as u64,
            });
        }
        Ok(cells as usize)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells currently alive.
    pub fn population(&self) -> usize {
        self.population
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Flat index of `(row, col)` in the cell buffer.
    pub fn index(&self, row: u32, col: u32) -> usize {
        (row as usize) * (self.cols as usize) + (col as usize)
    }

    fn check_bounds(&self, row: u32, col: u32) -> Result<(), LifeError> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub fn get(&self, row: u32, col: u32) -> Result<CellState, LifeError> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.index(row, col)])
    }

    /// Writes one cell and reports whether its state actually changed.
    pub fn set(&mut self, row: u32, col: u32, state: CellState) -> Result<bool, LifeError> {
        self.check_bounds(row, col)?;
        let idx = self.index(row, col);
        if self.cells[idx] == state {
            return Ok(false);
        }
        self.cells[idx] = state;
        match state {
            CellState::Alive => self.population += 1,
            CellState::Dead => self.population -= 1,
        }
        Ok(true)
    }

    /// Flips one cell and returns its new state.
    pub fn toggle(&mut self, row: u32, col: u32) -> Result<CellState, LifeError> {
        let next = self.get(row, col)?.toggled();
        self.set(row, col, next)?;
        Ok(next)
    }

    fn neighbor_window(&self, row: u32, col: u32) -> NeighborStates {
        let mut live = 0u8;
        let mut dead = 0u8;
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = i64::from(row) + dr;
                let c = i64::from(col) + dc;
                if r < 0 || c < 0 || r >= i64::from(self.rows) || c >= i64::from(self.cols) {
                    continue;
                }
                let idx = (r as usize) * (self.cols as usize) + (c as usize);
                match self.cells[idx] {
                    CellState::Alive => live += 1,
                    CellState::Dead => dead += 1,
                }
            }
        }
        NeighborStates { live, dead }
    }

    pub(crate) fn live_neighbors(&self, row: u32, col: u32) -> u8 {
        self.neighbor_window(row, col).live
    }

    /// Counts the cell's neighbors, clipped to the grid boundary.
    pub fn neighbor_states(&self, row: u32, col: u32) -> Result<NeighborStates, LifeError> {
        self.check_bounds(row, col)?;
        Ok(self.neighbor_window(row, col))
    }

    /// Reallocates to an all-dead grid of the given dimensions.
    pub fn resize(&mut self, rows: u32, cols: u32) -> Result<(), LifeError> {
        let cell_count = Self::validate_dims(rows, cols)?;
        self.rows = rows;
        self.cols = cols;
        self.cells.clear();
        self.cells.resize(cell_count, CellState::Dead);
        self.population = 0;
        Ok(())
    }

    /// Kills every cell without changing the dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Dead);
        self.population = 0;
    }

    /// Refills the whole grid, setting each cell alive with probability
    /// `alive_probability`.
    pub fn randomize(
        &mut self,
        rng: &mut impl Rng,
        alive_probability: f64,
    ) -> Result<(), LifeError> {
        if !(0.0..=1.0).contains(&alive_probability) {
            return Err(LifeError::InvalidProbability {
                value: alive_probability,
            });
        }
        self.population = 0;
        for cell in &mut self.cells {
            if rng.random_bool(alive_probability) {
                *cell = CellState::Alive;
                self.population += 1;
            } else {
                *cell = CellState::Dead;
            }
        }
        Ok(())
    }

    /// Replaces the grid with new dimensions and the given live cells, named
    /// by flat index. Every index is validated before anything is mutated, so
    /// a failed load leaves the previous grid intact.
    pub fn load_pattern(&mut self, rows: u32, cols: u32, live: &[usize]) -> Result<(), LifeError> {
        let cell_count = Self::validate_dims(rows, cols)?;
        if let Some(&bad) = live.iter().find(|&&idx| idx >= cell_count) {
            return Err(LifeError::OutOfBounds {
                row: (bad / cols as usize) as u32,
                col: (bad % cols as usize) as u32,
                rows,
                cols,
            });
        }
        self.rows = rows;
        self.cols = cols;
        self.cells.clear();
        self.cells.resize(cell_count, CellState::Dead);
        self.population = 0;
        for &idx in live {
            if self.cells[idx] == CellState::Dead {
                self.cells[idx] = CellState::Alive;
                self.population += 1;
            }
        }
        Ok(())
    }

    /// Flat indices of the live cells, ascending.
    pub fn alive_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(idx, _)| idx)
    }

    pub(crate) fn commit_cells(
        &mut self,
        next: &mut Vec<CellState>,
        births: usize,
        deaths: usize,
    ) {
        std::mem::swap(&mut self.cells, next);
        self.population = self.population + births - deaths;
    }
}
