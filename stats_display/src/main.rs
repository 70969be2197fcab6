// main.rs - Headless runner that narrates a simulation over its event stream

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridlife::{
    CellState, LifeObserver, PATTERNS, Pattern, SimConfig, Simulation, StepReport, tone_frequency,
};
use log::info;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(about = "Run a Game of Life simulation and print per-generation statistics")]
struct Cli {
    /// Path to a JSON config file; the flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Grid columns.
    #[arg(long)]
    cols: Option<u32>,

    /// Delay between generations, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Probability in [0, 1] that a randomized cell starts alive.
    #[arg(long)]
    alive_probability: Option<f64>,

    /// Seed for deterministic grids.
    #[arg(long)]
    seed: Option<u64>,

    /// Seed the grid from a named library pattern instead of randomizing.
    #[arg(long)]
    pattern: Option<String>,

    /// Stop after this many generations if the grid has not settled.
    #[arg(long, default_value_t = 200)]
    steps: u64,

    /// Redraw the board after every generation.
    #[arg(long)]
    draw: bool,

    /// Skip the tone column even when the config enables sound.
    #[arg(long)]
    quiet: bool,
}

enum Event {
    Reset(u32, u32),
    Cell(usize, CellState),
    Step(StepReport),
    Stopped,
}

/// Forwards observer callbacks out of the simulation task so the main task
/// can print at its own pace.
struct Forwarder(mpsc::UnboundedSender<Event>);

impl LifeObserver for Forwarder {
    fn on_cell_changed(&mut self, index: usize, state: CellState) {
        let _ = self.0.send(Event::Cell(index, state));
    }

    fn on_step_completed(&mut self, report: &StepReport) {
        let _ = self.0.send(Event::Step(*report));
    }

    fn on_stopped(&mut self) {
        let _ = self.0.send(Event::Stopped);
    }

    fn on_grid_reset(&mut self, rows: u32, cols: u32) {
        let _ = self.0.send(Event::Reset(rows, cols));
    }
}

/// Local mirror of the grid, rebuilt purely from reset and cell events.
struct Board {
    rows: u32,
    cols: u32,
    cells: Vec<CellState>,
}

impl Board {
    fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellState::Dead; (rows as usize) * (cols as usize)],
        }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.rows as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = (row as usize) * (self.cols as usize) + (col as usize);
                out.push(if self.cells[idx].is_alive() { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.cols = cols;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.step_delay_ms = delay_ms;
    }
    if let Some(alive_probability) = cli.alive_probability {
        config.alive_probability = alive_probability;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn pattern_by_name(name: &str) -> Result<&'static Pattern> {
    Pattern::find(name).with_context(|| {
        let known: Vec<&str> = PATTERNS.iter().map(|pattern| pattern.name).collect();
        format!(
            "unknown pattern {name:?}; known patterns: {}",
            known.join(", ")
        )
    })
}

fn print_report(report: &StepReport, voiced: bool, cell_count: usize) {
    if voiced {
        println!(
            "generation {:>5}  population {:>5}  changed {:>5}  tone {:>6.1} Hz",
            report.generation,
            report.population,
            report.changed,
            tone_frequency(report.population, cell_count)
        );
    } else {
        println!(
            "generation {:>5}  population {:>5}  changed {:>5}",
            report.generation, report.population, report.changed
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let sim = Simulation::spawn_with_observers(
        config.clone(),
        vec![Box::new(Forwarder(events_tx))],
    )?;

    if let Some(name) = cli.pattern.as_deref() {
        let pattern = pattern_by_name(name)?;
        sim.load_library_pattern(pattern).await?;
        info!("seeded from pattern {:?}", pattern.name);
    } else {
        sim.randomize().await?;
        info!(
            "seeded randomly with alive probability {}",
            config.alive_probability
        );
    }
    sim.start().await?;

    let voiced = config.sound_enabled && !cli.quiet;
    let mut board = Board::new(config.rows, config.cols);
    let mut settled = false;
    while let Some(event) = events.recv().await {
        match event {
            Event::Reset(rows, cols) => board = Board::new(rows, cols),
            Event::Cell(index, state) => board.cells[index] = state,
            Event::Step(report) => {
                print_report(&report, voiced, board.cells.len());
                if cli.draw {
                    print!("{}", board.render());
                }
                if report.generation >= cli.steps {
                    break;
                }
            }
            Event::Stopped => {
                settled = true;
                break;
            }
        }
    }

    sim.pause().await?;
    let status = sim.status().await?;
    if settled {
        println!("grid settled, nothing left to change");
    }
    println!(
        "final: {} at generation {}, population {}",
        status.state, status.generation, status.population
    );
    sim.shutdown().await?;
    Ok(())
}
