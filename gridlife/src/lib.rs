//! Interactive Game of Life core: a bounded grid plus an asynchronous,
//! timer-paced simulation loop.
//!
//! [`Grid`] and [`Session`] are synchronous and single-owner, while
//! [`Simulation`] runs a session on a background tokio task and paces it
//! with a cancellable step timer. Frontends subscribe through
//! [`LifeObserver`] and hear about every mutation after it has been
//! applied, so rendering and audio stay decoupled from the rules.
//!
//! ```no_run
//! use gridlife::{Pattern, SimConfig, Simulation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gridlife::LifeError> {
//!     let sim = Simulation::spawn(SimConfig::default())?;
//!     if let Some(glider) = Pattern::find("Glider") {
//!         sim.load_library_pattern(glider).await?;
//!     }
//!     sim.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod observer;
pub mod patterns;
pub mod runner;
pub mod session;
mod timer;

pub use config::SimConfig;
pub use error::LifeError;
pub use grid::{CellState, Grid, NeighborStates};
pub use observer::{CellChange, LifeObserver, StepReport, tone_frequency};
pub use patterns::{PATTERNS, Pattern};
pub use runner::{GridSnapshot, LoopState, SimStatus, Simulation};
pub use session::Session;
