// simulation.rs - Paced, cancellable stepping of a shared engine
//
// The engine lives behind one mutex. Every step and every edit takes that
// lock, so a toggle can never land in the middle of a step, and readers
// always see a whole generation. The run loop is a tokio task that checks
// for cancellation only between steps, while it waits out the pacing delay.

use std::sync::Arc;
use std::time::Duration;

use conway_engine::{CellState, CycleDetector, Grid, GridEngine};
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{DriverError, DriverResult};

pub type SharedEngine = Arc<Mutex<GridEngine>>;

/// Stepping rate on the 1..=10 scale of the speed control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate(u32);

impl Rate {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn new(rate: u32) -> DriverResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&rate) {
            return Err(DriverError::InvalidRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Pause between steps: 1000 / rate milliseconds (1 Hz up to 10 Hz).
    pub fn delay(self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.0))
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(5) // 200ms
    }
}

/// How a run loop behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub rate: Rate,
    /// Compute rows on the rayon pool.
    pub parallel: bool,
    /// End the run once a grid repeats one of the recent ones.
    pub stop_on_cycle: bool,
    /// End the run after this many steps. `None` runs until stopped.
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    StepLimit,
    CycleDetected,
}

/// How and where a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub generation: u64,
    pub steps: u64,
    pub reason: StopReason,
}

struct RunHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<RunOutcome>,
}

/// Drives a [`GridEngine`]: single steps, edits, and at most one paced run.
pub struct Simulation {
    engine: SharedEngine,
    generation_tx: Arc<watch::Sender<u64>>,
    run: Option<RunHandle>,
}

impl Simulation {
    pub fn new(engine: GridEngine) -> Self {
        let (generation_tx, _) = watch::channel(engine.generation());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            generation_tx: Arc::new(generation_tx),
            run: None,
        }
    }

    /// Handle to the engine for read access from a front end.
    pub fn engine(&self) -> SharedEngine {
        Arc::clone(&self.engine)
    }

    /// Receives the generation number after every step, clear or load.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation_tx.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.engine.lock().generation()
    }

    /// Copy of the current generation, taken under the lock.
    pub fn snapshot(&self) -> Grid {
        self.engine.lock().grid().clone()
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.task.is_finished())
    }

    pub fn get_cell(&self, row: isize, col: isize) -> DriverResult<CellState> {
        Ok(self.engine.lock().get_cell(row, col)?)
    }

    /// Allowed while running; serialized with the loop's steps.
    pub fn set_cell(&self, row: isize, col: isize, state: CellState) -> DriverResult<()> {
        Ok(self.engine.lock().set_cell(row, col, state)?)
    }

    /// Allowed while running; serialized with the loop's steps.
    pub fn toggle_cell(&self, row: isize, col: isize) -> DriverResult<CellState> {
        Ok(self.engine.lock().toggle_cell(row, col)?)
    }

    pub fn step_once(&self) -> DriverResult<u64> {
        if self.is_running() {
            return Err(DriverError::Busy);
        }
        let generation = self.engine.lock().step();
        self.generation_tx.send_replace(generation);
        Ok(generation)
    }

    pub fn clear(&self) -> DriverResult<()> {
        if self.is_running() {
            return Err(DriverError::Busy);
        }
        self.engine.lock().clear();
        self.generation_tx.send_replace(0);
        Ok(())
    }

    /// Runs `f` on the engine while no run is active, then republishes the generation.
    pub fn edit<T>(&self, f: impl FnOnce(&mut GridEngine) -> T) -> DriverResult<T> {
        if self.is_running() {
            return Err(DriverError::Busy);
        }
        let mut engine = self.engine.lock();
        let result = f(&mut *engine);
        self.generation_tx.send_replace(engine.generation());
        Ok(result)
    }

    /// Spawns the paced run loop on the current tokio runtime.
    pub fn start(&mut self, options: RunOptions) -> DriverResult<()> {
        if self.is_running() {
            return Err(DriverError::AlreadyRunning);
        }
        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(
            Arc::clone(&self.engine),
            Arc::clone(&self.generation_tx),
            options,
            cancel_rx,
        ));
        info!(
            "run started at {} steps/s ({:?} per step)",
            options.rate.get(),
            options.rate.delay()
        );
        self.run = Some(RunHandle { cancel, task });
        Ok(())
    }

    /// Waits for the active run to end on its own.
    ///
    /// Returns `None` when no run was started. Dropping the future leaves the run active.
    pub async fn wait(&mut self) -> Option<RunOutcome> {
        let run = self.run.as_mut()?;
        let result = (&mut run.task).await;
        self.run = None;
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("run loop ended abnormally: {e}");
                None
            }
        }
    }

    /// Cancels the active run after its current step and returns the last generation.
    ///
    /// Does nothing but report the generation when idle.
    pub async fn stop(&mut self) -> u64 {
        if let Some(run) = self.run.as_ref() {
            run.cancel.send_replace(true);
        }
        if let Some(outcome) = self.wait().await {
            info!(
                "run stopped ({:?}) at generation {} after {} steps",
                outcome.reason, outcome.generation, outcome.steps
            );
        }
        self.generation()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.send_replace(true);
        }
    }
}

async fn run_loop(
    engine: SharedEngine,
    generation_tx: Arc<watch::Sender<u64>>,
    options: RunOptions,
    mut cancel: watch::Receiver<bool>,
) -> RunOutcome {
    let delay = options.rate.delay();
    let mut detector = CycleDetector::default();
    let mut steps = 0;

    if options.max_steps == Some(0) {
        return RunOutcome {
            generation: engine.lock().generation(),
            steps,
            reason: StopReason::StepLimit,
        };
    }

    loop {
        let (generation, repeated) = {
            let mut engine = engine.lock();
            let generation = if options.parallel {
                engine.step_parallel()
            } else {
                engine.step()
            };
            let repeated = options.stop_on_cycle && detector.observe(engine.grid());
            (generation, repeated)
        };
        steps += 1;
        generation_tx.send_replace(generation);
        debug!("generation {generation}");

        let finished = |reason| RunOutcome {
            generation,
            steps,
            reason,
        };
        if repeated {
            info!("cycle detected at generation {generation}");
            return finished(StopReason::CycleDetected);
        }
        if options.max_steps.is_some_and(|max| steps >= max) {
            return finished(StopReason::StepLimit);
        }

        // Pacing delay; the only point where a stop request is observed.
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.changed() => return finished(StopReason::Cancelled),
        }
        if *cancel.borrow() {
            return finished(StopReason::Cancelled);
        }
    }
}
