// config.rs - Command-line configuration for a headless run

use anyhow::{anyhow, bail, Context, Result};
use conway_engine::{patterns, GridEngine, DEFAULT_GRID_SIZE};

use crate::simulation::{Rate, RunOptions};

pub const USAGE: &str = "usage: conway_coro [--rows N] [--cols N] [--rate 1..10] [--generations N] \
[--pattern NAME | --random SEED] [--density F] [--parallel] [--stop-on-cycle]";

/// What the grid starts out as.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// A named pattern from the catalogue, centered.
    Pattern(String),
    /// Seeded random fill at [`RunConfig::density`].
    Random(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub rows: usize,
    pub cols: usize,
    pub rate: Rate,
    /// Steps to run; 0 runs until interrupted or a cycle is found.
    pub generations: u64,
    pub seed: Seed,
    pub density: f64,
    pub parallel: bool,
    pub stop_on_cycle: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_SIZE,
            cols: DEFAULT_GRID_SIZE,
            rate: Rate::default(),
            generations: 100,
            seed: Seed::Pattern("glider".to_owned()),
            density: 0.33,
            parallel: false,
            stop_on_cycle: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(RunConfig),
    Help,
}

fn parse_value<T>(flag: &str, value: Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.ok_or_else(|| anyhow!("{flag} requires a value"))?;
    value
        .parse()
        .with_context(|| format!("invalid value {value:?} for {flag}"))
}

/// Parses arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut config = RunConfig::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => config.rows = parse_value("--rows", args.next())?,
            "--cols" => config.cols = parse_value("--cols", args.next())?,
            "--rate" => config.rate = Rate::new(parse_value("--rate", args.next())?)?,
            "--generations" => config.generations = parse_value("--generations", args.next())?,
            "--pattern" => {
                let name: String = parse_value("--pattern", args.next())?;
                if patterns::find(&name).is_none() {
                    let known: Vec<_> = patterns::PATTERNS.iter().map(|p| p.name).collect();
                    bail!("unknown pattern {name:?} (expected one of: {})", known.join(", "));
                }
                config.seed = Seed::Pattern(name);
            }
            "--random" => config.seed = Seed::Random(parse_value("--random", args.next())?),
            "--density" => config.density = parse_value("--density", args.next())?,
            "--parallel" => config.parallel = true,
            "--stop-on-cycle" => config.stop_on_cycle = true,
            "-h" | "--help" => return Ok(Command::Help),
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(Command::Run(config))
}

impl RunConfig {
    /// Builds the engine and seeds it.
    pub fn build_engine(&self) -> Result<GridEngine> {
        let mut engine = GridEngine::new(self.rows, self.cols)?;
        match &self.seed {
            Seed::Pattern(name) => {
                let pattern =
                    patterns::find(name).ok_or_else(|| anyhow!("unknown pattern {name:?}"))?;
                engine.load_pattern_centered(pattern);
            }
            Seed::Random(seed) => engine.randomize(*seed, self.density)?,
        }
        Ok(engine)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            rate: self.rate,
            parallel: self.parallel,
            stop_on_cycle: self.stop_on_cycle,
            max_steps: (self.generations > 0).then_some(self.generations),
        }
    }
}
