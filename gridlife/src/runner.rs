//! Timer-paced simulation loop.
//!
//! The session lives on a spawned task that owns it outright. A
//! [`Simulation`] handle talks to the task over a command channel and awaits
//! a oneshot acknowledgement per operation. The task's select loop checks
//! commands before the step timer, so once `pause` has been acknowledged no
//! further step can land, including one whose sleep had already expired
//! while the pause was in flight.

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::SimConfig;
use crate::error::LifeError;
use crate::grid::CellState;
use crate::observer::{LifeObserver, StepReport};
use crate::patterns::Pattern;
use crate::session::Session;
use crate::timer::StepTimer;

/// Lifecycle of the step loop.
///
/// `Stopped` is where the loop puts itself after a step changes nothing; it
/// only says the loop gave up self-stepping. Any grid mutation moves the
/// loop back to `Paused`, and `start` leaves `Stopped` the same way it
/// leaves `Paused`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Running => "running",
            LoopState::Paused => "paused",
            LoopState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Point-in-time counters of a simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimStatus {
    pub state: LoopState,
    pub generation: u64,
    pub population: usize,
    pub rows: u32,
    pub cols: u32,
    pub delay: Duration,
}

/// Full copy of the cell buffer plus counters, for collaborators that need
/// an initial frame before events start flowing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSnapshot {
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<CellState>,
    pub generation: u64,
    pub population: usize,
}

type Ack<T> = oneshot::Sender<Result<T, LifeError>>;

enum Command {
    Start(Ack<()>),
    Pause(Ack<()>),
    StepOnce(Ack<usize>),
    SetDelay(Duration, Ack<()>),
    SetAliveProbability(f64, Ack<()>),
    ToggleCell {
        row: u32,
        col: u32,
        ack: Ack<CellState>,
    },
    LoadPattern {
        rows: u32,
        cols: u32,
        live: Vec<usize>,
        ack: Ack<()>,
    },
    Randomize(Ack<()>),
    Clear(Ack<()>),
    Resize {
        rows: u32,
        cols: u32,
        ack: Ack<()>,
    },
    Status(oneshot::Sender<SimStatus>),
    Snapshot(oneshot::Sender<GridSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to a simulation task.
///
/// The task starts paused; nothing steps until [`Simulation::start`]. Every
/// method waits for the task to act on the request, so when a call returns
/// the effect has happened and all observers have been told. Dropping the
/// handle closes the command channel and the task winds down on its own.
pub struct Simulation {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl Simulation {
    /// Spawns a paused simulation task for `config`. Must be called from
    /// within a tokio runtime.
    pub fn spawn(config: SimConfig) -> Result<Self, LifeError> {
        Self::spawn_with_observers(config, Vec::new())
    }

    /// Spawns a paused simulation task that will notify `observers` of every
    /// mutation, in registration order.
    pub fn spawn_with_observers(
        config: SimConfig,
        observers: Vec<Box<dyn LifeObserver>>,
    ) -> Result<Self, LifeError> {
        let session = Session::new(config)?;
        let delay = session.config().step_delay();
        info!(
            "simulation spawned: {}x{} grid, {:?} step delay",
            session.grid().rows(),
            session.grid().cols(),
            delay
        );
        let (commands, receiver) = mpsc::channel(16);
        let worker = Worker {
            session,
            state: LoopState::Paused,
            delay,
            timer: StepTimer::new(),
            observers,
            commands: receiver,
        };
        let task = tokio::spawn(worker.run());
        Ok(Self { commands, task })
    }

    async fn request<T>(&self, make: impl FnOnce(Ack<T>) -> Command) -> Result<T, LifeError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(make(ack))
            .await
            .map_err(|_| LifeError::SimulationClosed)?;
        response.await.map_err(|_| LifeError::SimulationClosed)?
    }

    /// Begins timer-paced stepping. A fresh full delay runs before the first
    /// step. No-op while already running.
    pub async fn start(&self) -> Result<(), LifeError> {
        self.request(Command::Start).await
    }

    /// Halts timer-paced stepping. Once this returns, no step will land
    /// until the next `start`. No-op while not running.
    pub async fn pause(&self) -> Result<(), LifeError> {
        self.request(Command::Pause).await
    }

    /// Advances exactly one generation immediately and returns how many
    /// cells changed. Rejected while the loop is running.
    pub async fn step_once(&self) -> Result<usize, LifeError> {
        self.request(Command::StepOnce).await
    }

    /// Changes the pacing interval for steps scheduled after this call. A
    /// step already waiting keeps its original deadline.
    pub async fn set_delay(&self, delay: Duration) -> Result<(), LifeError> {
        self.request(|ack| Command::SetDelay(delay, ack)).await
    }

    /// Changes the alive probability used by later [`Simulation::randomize`]
    /// calls.
    pub async fn set_alive_probability(&self, value: f64) -> Result<(), LifeError> {
        self.request(|ack| Command::SetAliveProbability(value, ack))
            .await
    }

    /// Flips one cell and returns its new state. Rejected while the loop is
    /// running.
    pub async fn toggle_cell(&self, row: u32, col: u32) -> Result<CellState, LifeError> {
        self.request(|ack| Command::ToggleCell { row, col, ack })
            .await
    }

    /// Replaces the grid with a pattern given as dimensions plus flat
    /// live-cell indices. Pauses the loop and rewinds the generation
    /// counter.
    pub async fn load_pattern(
        &self,
        rows: u32,
        cols: u32,
        live: Vec<usize>,
    ) -> Result<(), LifeError> {
        self.request(|ack| Command::LoadPattern {
            rows,
            cols,
            live,
            ack,
        })
        .await
    }

    /// Loads one of the built-in library patterns.
    pub async fn load_library_pattern(&self, pattern: &Pattern) -> Result<(), LifeError> {
        self.load_pattern(pattern.rows, pattern.cols, pattern.live_indices())
            .await
    }

    /// Refills the grid randomly with the configured alive probability.
    /// Pauses the loop and rewinds the generation counter.
    pub async fn randomize(&self) -> Result<(), LifeError> {
        self.request(Command::Randomize).await
    }

    /// Kills every cell. Pauses the loop and rewinds the generation counter.
    pub async fn clear(&self) -> Result<(), LifeError> {
        self.request(Command::Clear).await
    }

    /// Reallocates to an all-dead grid of the given dimensions. Pauses the
    /// loop and rewinds the generation counter.
    pub async fn resize(&self, rows: u32, cols: u32) -> Result<(), LifeError> {
        self.request(|ack| Command::Resize { rows, cols, ack }).await
    }

    /// Current loop state and counters.
    pub async fn status(&self) -> Result<SimStatus, LifeError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Status(reply))
            .await
            .map_err(|_| LifeError::SimulationClosed)?;
        response.await.map_err(|_| LifeError::SimulationClosed)
    }

    /// Full copy of the grid plus counters.
    pub async fn snapshot(&self) -> Result<GridSnapshot, LifeError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(reply))
            .await
            .map_err(|_| LifeError::SimulationClosed)?;
        response.await.map_err(|_| LifeError::SimulationClosed)
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(self) -> Result<(), LifeError> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(ack))
            .await
            .map_err(|_| LifeError::SimulationClosed)?;
        let _ = done.await;
        self.task.await.map_err(|_| LifeError::SimulationClosed)
    }
}

struct Worker {
    session: Session,
    state: LoopState,
    delay: Duration,
    timer: StepTimer,
    observers: Vec<Box<dyn LifeObserver>>,
    commands: mpsc::Receiver<Command>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                maybe_cmd = self.commands.recv() => {
                    match maybe_cmd {
                        Some(cmd) => {
                            if !self.handle_command(cmd) {
                                break;
                            }
                        }
                        // All handles dropped.
                        None => break,
                    }
                }
                token = self.timer.expired() => {
                    if self.timer.accepts(token) {
                        self.run_step();
                    }
                }
            }
        }
        debug!("simulation task exited");
    }

    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Start(ack) => {
                self.start();
                let _ = ack.send(Ok(()));
            }
            Command::Pause(ack) => {
                self.pause();
                let _ = ack.send(Ok(()));
            }
            Command::StepOnce(ack) => {
                let _ = ack.send(self.step_once());
            }
            Command::SetDelay(delay, ack) => {
                debug!("step delay set to {delay:?}");
                self.delay = delay;
                let _ = ack.send(Ok(()));
            }
            Command::SetAliveProbability(value, ack) => {
                let _ = ack.send(self.session.set_alive_probability(value));
            }
            Command::ToggleCell { row, col, ack } => {
                let _ = ack.send(self.toggle_cell(row, col));
            }
            Command::LoadPattern {
                rows,
                cols,
                live,
                ack,
            } => {
                let _ = ack.send(self.load_pattern(rows, cols, &live));
            }
            Command::Randomize(ack) => {
                let _ = ack.send(self.randomize());
            }
            Command::Clear(ack) => {
                self.session.clear();
                self.after_bulk_mutation();
                let _ = ack.send(Ok(()));
            }
            Command::Resize { rows, cols, ack } => {
                let _ = ack.send(self.resize(rows, cols));
            }
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown(ack) => {
                info!(
                    "simulation shut down at generation {}",
                    self.session.generation()
                );
                let _ = ack.send(());
                return false;
            }
        }
        true
    }

    fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        info!("simulation running with a {:?} step delay", self.delay);
        self.state = LoopState::Running;
        self.timer.arm(self.delay);
    }

    fn pause(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        info!(
            "simulation paused at generation {}",
            self.session.generation()
        );
        self.state = LoopState::Paused;
        self.timer.cancel();
    }

    fn run_step(&mut self) {
        self.apply_step();
        if self.state == LoopState::Running {
            self.timer.arm(self.delay);
        }
    }

    fn step_once(&mut self) -> Result<usize, LifeError> {
        if self.state == LoopState::Running {
            return Err(LifeError::SimulationRunning);
        }
        self.state = LoopState::Paused;
        Ok(self.apply_step())
    }

    /// Advances one generation and dispatches notifications: changed cells
    /// in ascending index order, then the step report, then `on_stopped` if
    /// the step changed nothing.
    fn apply_step(&mut self) -> usize {
        let changes = self.session.step();
        let report = StepReport {
            generation: self.session.generation(),
            population: self.session.population(),
            changed: changes.len(),
        };
        for change in &changes {
            for observer in &mut self.observers {
                observer.on_cell_changed(change.index, change.state);
            }
        }
        for observer in &mut self.observers {
            observer.on_step_completed(&report);
        }
        debug!(
            "generation {}: population {}, {} changed",
            report.generation, report.population, report.changed
        );
        if changes.is_empty() {
            info!("grid settled at generation {}, stopping", report.generation);
            self.state = LoopState::Stopped;
            self.timer.cancel();
            for observer in &mut self.observers {
                observer.on_stopped();
            }
        }
        changes.len()
    }

    fn toggle_cell(&mut self, row: u32, col: u32) -> Result<CellState, LifeError> {
        if self.state == LoopState::Running {
            return Err(LifeError::SimulationRunning);
        }
        let change = self.session.toggle(row, col)?;
        if self.state == LoopState::Stopped {
            self.state = LoopState::Paused;
        }
        for observer in &mut self.observers {
            observer.on_cell_changed(change.index, change.state);
        }
        Ok(change.state)
    }

    fn load_pattern(&mut self, rows: u32, cols: u32, live: &[usize]) -> Result<(), LifeError> {
        self.session.load_pattern(rows, cols, live)?;
        info!("loaded pattern: {rows}x{cols}, {} live cells", live.len());
        self.after_bulk_mutation();
        Ok(())
    }

    fn randomize(&mut self) -> Result<(), LifeError> {
        self.session.randomize()?;
        self.after_bulk_mutation();
        Ok(())
    }

    fn resize(&mut self, rows: u32, cols: u32) -> Result<(), LifeError> {
        self.session.resize(rows, cols)?;
        self.after_bulk_mutation();
        Ok(())
    }

    /// A grid mutation that succeeded leaves the loop paused with the
    /// generation counter rewound, whatever state it was in before.
    fn after_bulk_mutation(&mut self) {
        if self.state == LoopState::Running {
            info!("simulation paused by a grid mutation");
        }
        self.state = LoopState::Paused;
        self.timer.cancel();
        self.notify_grid_reset();
    }

    fn notify_grid_reset(&mut self) {
        let rows = self.session.grid().rows();
        let cols = self.session.grid().cols();
        let alive: Vec<usize> = self.session.grid().alive_cells().collect();
        for observer in &mut self.observers {
            observer.on_grid_reset(rows, cols);
        }
        for idx in alive {
            for observer in &mut self.observers {
                observer.on_cell_changed(idx, CellState::Alive);
            }
        }
    }

    fn status(&self) -> SimStatus {
        SimStatus {
            state: self.state,
            generation: self.session.generation(),
            population: self.session.population(),
            rows: self.session.grid().rows(),
            cols: self.session.grid().cols(),
            delay: self.delay,
        }
    }

    fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.session.grid().rows(),
            cols: self.session.grid().cols(),
            cells: self.session.grid().cells().to_vec(),
            generation: self.session.generation(),
            population: self.session.population(),
        }
    }
}
