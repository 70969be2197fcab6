//! Notification boundary between the simulation and its collaborators.
//!
//! Renderers, audio frontends and stat displays implement [`LifeObserver`]
//! and receive callbacks after the grid has already been mutated, never
//! during a step. For a completed step the order is fixed: one
//! `on_cell_changed` per changed cell in ascending index order, then a
//! single `on_step_completed`, then `on_stopped` if the step left nothing
//! changed. Observers run on the simulation task, so a slow observer slows
//! the loop rather than racing it.

use crate::grid::CellState;

/// Statistics describing one completed generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Generation counter after the step.
    pub generation: u64,
    /// Live cells after the step.
    pub population: usize,
    /// Cells that changed state during the step.
    pub changed: usize,
}

/// One cell transition, already applied to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub index: usize,
    pub state: CellState,
}

/// Receiver for simulation events. Every method defaults to a no-op, so an
/// implementation only overrides what it cares about.
pub trait LifeObserver: Send {
    /// A single cell changed state, either through a step or a toggle.
    fn on_cell_changed(&mut self, _index: usize, _state: CellState) {}

    /// A generation step finished and the grid reflects it.
    fn on_step_completed(&mut self, _report: &StepReport) {}

    /// The loop stopped because a step changed nothing.
    fn on_stopped(&mut self) {}

    /// The grid was rebuilt wholesale by a clear, randomize, pattern load or
    /// resize. Surviving live cells follow as `on_cell_changed` calls.
    fn on_grid_reset(&mut self, _rows: u32, _cols: u32) {}
}

/// Frequency in Hz for voicing a step, rising linearly with the fraction of
/// the grid that is alive. An empty grid maps to 300 Hz, a full one to
/// 2000 Hz.
pub fn tone_frequency(population: usize, cell_count: usize) -> f32 {
    if cell_count == 0 {
        return 300.0;
    }
    (population as f32 / cell_count as f32) * 1700.0 + 300.0
}
