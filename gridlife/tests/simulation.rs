//! End-to-end tests driving the simulation through its public handle.

use std::future::poll_fn;
use std::task::Poll;
use std::time::Duration;

use gridlife::{
    CellState, LifeObserver, LoopState, Pattern, SimConfig, Simulation, StepReport,
};
use tokio::sync::mpsc;
use tokio::time::advance;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Reset(u32, u32),
    Cell(usize, CellState),
    Step(StepReport),
    Stopped,
}

struct Recorder(mpsc::UnboundedSender<Event>);

impl LifeObserver for Recorder {
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

fn recorded(config: SimConfig) -> (Simulation, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sim = Simulation::spawn_with_observers(config, vec![Box::new(Recorder(tx))]).unwrap();
    (sim, rx)
}

fn drain(events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn manual_stepping_round_trips_a_blinker() {
    let sim = Simulation::spawn(SimConfig::default()).unwrap();
    sim.load_library_pattern(Pattern::find("Blinker").unwrap())
        .await
        .unwrap();

    let initial = sim.snapshot().await.unwrap();
    assert_eq!(initial.population, 3);
    assert_eq!(initial.generation, 0);

    assert_eq!(sim.step_once().await.unwrap(), 4);
    assert_eq!(sim.step_once().await.unwrap(), 4);

    let after = sim.snapshot().await.unwrap();
    assert_eq!(after.cells, initial.cells);
    assert_eq!(after.generation, 2);
    assert_eq!(after.population, 3);

    sim.resize(5, 5).await.unwrap();
    let resized = sim.snapshot().await.unwrap();
    assert_eq!((resized.rows, resized.cols), (5, 5));
    assert_eq!(resized.population, 0);
    assert_eq!(resized.generation, 0);

    sim.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn event_stream_reconstructs_the_grid() {
    let (sim, mut events) = recorded(SimConfig::default());
    sim.load_library_pattern(Pattern::find("Glider").unwrap())
        .await
        .unwrap();
    sim.start().await.unwrap();

    // Mirror the grid purely from notifications, the way a renderer would.
    let mut dims = (0u32, 0u32);
    let mut board: Vec<CellState> = Vec::new();
    let mut reports = 0;
    while reports < 8 {
        match events.recv().await.unwrap() {
            Event::Reset(rows, cols) => {
                dims = (rows, cols);
                board = vec![CellState::Dead; (rows * cols) as usize];
            }
            Event::Cell(index, state) => board[index] = state,
            Event::Step(report) => {
                reports += 1;
                let live = board.iter().filter(|cell| cell.is_alive()).count();
                assert_eq!(live, report.population);
            }
            Event::Stopped => panic!("glider should still be moving"),
        }
    }

    sim.pause().await.unwrap();
    let snapshot = sim.snapshot().await.unwrap();
    assert_eq!((snapshot.rows, snapshot.cols), dims);
    assert_eq!(snapshot.cells, board);
    assert_eq!(snapshot.generation, 8);
}

#[tokio::test(start_paused = true)]
async fn equal_seeds_evolve_identically() {
    let config = SimConfig {
        rows: 14,
        cols: 14,
        seed: 77,
        ..SimConfig::default()
    };
    let a = Simulation::spawn(config.clone()).unwrap();
    let b = Simulation::spawn(config).unwrap();

    a.randomize().await.unwrap();
    b.randomize().await.unwrap();

    for _ in 0..12 {
        let changed_a = a.step_once().await.unwrap();
        let changed_b = b.step_once().await.unwrap();
        assert_eq!(changed_a, changed_b);
    }
    assert_eq!(a.snapshot().await.unwrap(), b.snapshot().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn pause_beats_a_timer_that_already_expired() {
    let (sim, mut events) = recorded(SimConfig::default());
    sim.load_library_pattern(Pattern::find("Blinker").unwrap())
        .await
        .unwrap();
    drain(&mut events);
    sim.start().await.unwrap();

    // Queue the pause command without giving the simulation task a chance
    // to run, then push the clock past the step deadline. When the task
    // finally wakes, both the command and the expired timer are ready at
    // once and the pause must win.
    let mut pause = Box::pin(sim.pause());
    poll_fn(|cx| {
        assert!(pause.as_mut().poll(cx).is_pending());
        Poll::Ready(())
    })
    .await;
    advance(Duration::from_millis(600)).await;
    pause.await.unwrap();

    let status = sim.status().await.unwrap();
    assert_eq!(status.state, LoopState::Paused);
    assert_eq!(status.generation, 0);
    assert!(drain(&mut events).is_empty());

    // The stale expiration must not leak into the next run either.
    advance(Duration::from_secs(60)).await;
    assert!(drain(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn stopped_loop_resumes_after_manual_edits() {
    let (sim, mut events) = recorded(SimConfig::default());
    sim.start().await.unwrap();

    // All-dead grid: one changeless step, then the loop stops itself.
    loop {
        match events.recv().await.unwrap() {
            Event::Stopped => break,
            _ => {}
        }
    }
    assert_eq!(sim.status().await.unwrap().state, LoopState::Stopped);

    // Drawing a block lifts the loop back to paused.
    for (row, col) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
        sim.toggle_cell(row, col).await.unwrap();
    }
    let status = sim.status().await.unwrap();
    assert_eq!(status.state, LoopState::Paused);
    assert_eq!(status.population, 4);

    // The block is stable, so the next evaluated step stops again.
    assert_eq!(sim.step_once().await.unwrap(), 0);
    assert_eq!(sim.status().await.unwrap().state, LoopState::Stopped);
}
