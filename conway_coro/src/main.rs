// main.rs - Headless Conway's Game of Life with a paced async run loop

use anyhow::Result;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use conway_coro::config::{self, Command};
use conway_coro::Simulation;

#[tokio::main]
async fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;
    info!("Starting conway_coro v{} ...", env!("CARGO_PKG_VERSION"));

    let config = match config::parse_args(std::env::args().skip(1))? {
        Command::Run(config) => config,
        Command::Help => {
            println!("{}", config::USAGE);
            return Ok(());
        }
    };

    let engine = config.build_engine()?;
    info!(
        "{}x{} grid, {:?}, population {}",
        config.rows,
        config.cols,
        config.seed,
        engine.population()
    );

    let mut sim = Simulation::new(engine);
    sim.start(config.run_options())?;

    let outcome = tokio::select! {
        outcome = sim.wait() => outcome,
        _ = tokio::signal::ctrl_c() => None,
    };
    let generation = match outcome {
        Some(outcome) => {
            info!("run ended ({:?}) at generation {}", outcome.reason, outcome.generation);
            outcome.generation
        }
        None => sim.stop().await,
    };

    let grid = sim.snapshot();
    print!("{grid}");
    println!("generation {generation}, population {}", grid.population());
    Ok(())
}
