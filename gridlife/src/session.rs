use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::config::SimConfig;
use crate::error::LifeError;
use crate::grid::{CellState, Grid};
use crate::observer::CellChange;

/// Owning state for one simulation: the grid, a scratch buffer for the next
/// generation, the generation counter and a seeded random source.
///
/// Stepping is double buffered. The next generation is evaluated entirely
/// against the pre-step grid and swapped in once complete, so no cell ever
/// sees a neighbor from the generation being built.
pub struct Session {
    grid: Grid,
    next_cells: Vec<CellState>,
    generation: u64,
    rng: ChaCha12Rng,
    config: SimConfig,
}

impl Session {
    pub fn new(config: SimConfig) -> Result<Self, LifeError> {
        config.validate()?;
        let grid = Grid::new(config.rows, config.cols)?;
        let next_cells = vec![CellState::Dead; grid.cell_count()];
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            grid,
            next_cells,
            generation: 0,
            rng,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Advances the grid one generation and returns the cells that changed,
    /// in ascending index order.
    ///
    /// The generation counter advances even when nothing changed, counting
    /// the evaluation itself rather than its effect.
    pub fn step(&mut self) -> Vec<CellChange> {
        self.next_cells.clear();
        self.next_cells.extend_from_slice(self.grid.cells());

        let mut changes = Vec::new();
        let mut births = 0usize;
        let mut deaths = 0usize;
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let idx = self.grid.index(row, col);
                let cell = self.grid.cells()[idx];
                let live = self.grid.live_neighbors(row, col);
                let next = match (cell, live) {
                    // Survival
                    (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive,
                    // Birth
                    (CellState::Dead, 3) => CellState::Alive,
                    // Death by isolation or overcrowding
                    _ => CellState::Dead,
                };
                if next != cell {
                    self.next_cells[idx] = next;
                    match next {
                        CellState::Alive => births += 1,
                        CellState::Dead => deaths += 1,
                    }
                    changes.push(CellChange { index: idx, state: next });
                }
            }
        }

        self.grid.commit_cells(&mut self.next_cells, births, deaths);
        self.generation += 1;
        changes
    }

    /// Flips one cell outside of stepping. Leaves the generation counter
    /// alone.
    pub fn toggle(&mut self, row: u32, col: u32) -> Result<CellChange, LifeError> {
        let state = self.grid.toggle(row, col)?;
        Ok(CellChange {
            index: self.grid.index(row, col),
            state,
        })
    }

    /// Kills every cell and rewinds the generation counter.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    /// Refills the grid from the session RNG using the configured alive
    /// probability, rewinding the generation counter.
    pub fn randomize(&mut self) -> Result<(), LifeError> {
        self.grid
            .randomize(&mut self.rng, self.config.alive_probability)?;
        self.generation = 0;
        Ok(())
    }

    /// Replaces the grid with a pattern given as flat live-cell indices.
    pub fn load_pattern(&mut self, rows: u32, cols: u32, live: &[usize]) -> Result<(), LifeError> {
        self.grid.load_pattern(rows, cols, live)?;
        self.generation = 0;
        Ok(())
    }

    /// Reallocates to an all-dead grid of the given dimensions.
    pub fn resize(&mut self, rows: u32, cols: u32) -> Result<(), LifeError> {
        self.grid.resize(rows, cols)?;
        self.generation = 0;
        Ok(())
    }

    /// Changes the probability used by later [`Session::randomize`] calls.
    pub fn set_alive_probability(&mut self, value: f64) -> Result<(), LifeError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(LifeError::InvalidProbability { value });
        }
        self.config.alive_probability = value;
        Ok(())
    }
}
