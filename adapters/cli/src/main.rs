#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Wave Defence session.
//!
//! The binary loads an optional TOML run configuration, starts a run, spends
//! currency on emplacements whenever it can and prints every stats payload as
//! a JSON line until the run ends or the tick budget is exhausted.

mod logging;

use std::{fs, io::Write, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use wave_defence_core::{EmplacementLevel, RunState, SimulationObserver, SlotId, Stats};
use wave_defence_runtime::{HostCommand, Simulation};
use wave_defence_world::{query, RunConfig};

/// Ticks between two attempts to spend currency.
const SPEND_EVERY: u32 = 30;

/// Plays a Wave Defence run without a window and reports its economy.
#[derive(Debug, Parser)]
#[command(name = "wave-defence", author, version, about, long_about = None)]
struct Args {
    /// TOML run configuration; the stock level is used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides the RNG seed of the run configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 6_000)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Skips automatic building and upgrading.
    #[arg(long)]
    no_build: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Writes every stats payload to stdout as one JSON object per line.
#[derive(Debug, Default)]
struct JsonLines;

impl SimulationObserver for JsonLines {
    fn scene_changed(&mut self, state: RunState) {
        info!("scene changed to {state:?}");
    }

    fn stats_changed(&mut self, stats: &Stats) {
        match serde_json::to_string(stats) {
            Ok(line) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(error) = writeln!(stdout, "{line}") {
                    warn!("failed to write stats: {error}");
                }
            }
            Err(error) => warn!("failed to encode stats: {error}"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut simulation = Simulation::new(config).context("invalid run configuration")?;
    simulation.subscribe(Box::new(JsonLines));

    simulation.submit(HostCommand::StartRun);
    if !args.no_build {
        spend(&mut simulation);
    }
    simulation.submit(HostCommand::StartWave);

    let dt = Duration::from_millis(args.tick_ms);
    let mut elapsed = 0;
    while elapsed < args.ticks && simulation.run_state() == RunState::Running {
        simulation.tick(dt, None);
        elapsed += 1;
        if !args.no_build && elapsed % SPEND_EVERY == 0 {
            spend(&mut simulation);
        }
    }

    let stats = simulation.stats();
    let outcome = match simulation.run_state() {
        RunState::Over if stats.lives > 0 => "cleared every wave",
        RunState::Over => "ran out of lives",
        _ => "stopped at the tick limit",
    };
    info!(
        "{outcome} after {elapsed} ticks: wave {}/{}, {} lives, {} currency",
        stats.wave, stats.max_waves, stats.lives, stats.currency
    );
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read run configuration {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("failed to parse run configuration {}", path.display()))?;
    info!("loaded run configuration from {}", path.display());
    Ok(config)
}

/// Builds on free slots first, then upgrades the cheapest emplacements.
fn spend(simulation: &mut Simulation) {
    let build_cost = EmplacementLevel::One.stats().cost;
    let slots = query::build_slots(simulation.world()).len();
    let slot_count = u32::try_from(slots).unwrap_or(u32::MAX);
    for slot in (0..slot_count).map(SlotId::new) {
        if simulation.stats().currency < build_cost {
            break;
        }
        let occupied = query::emplacements(simulation.world())
            .iter()
            .any(|emplacement| emplacement.slot == slot);
        if !occupied {
            simulation.submit(HostCommand::Build { slot });
        }
    }

    let mut upgrades: Vec<_> = query::emplacements(simulation.world())
        .into_iter()
        .filter(|emplacement| !emplacement.upgrading)
        .filter_map(|emplacement| {
            emplacement
                .level
                .next()
                .map(|next| (next.stats().cost, emplacement.slot))
        })
        .collect();
    upgrades.sort();
    for (cost, slot) in upgrades {
        if simulation.stats().currency < cost {
            break;
        }
        simulation.submit(HostCommand::Upgrade { slot });
    }
}
