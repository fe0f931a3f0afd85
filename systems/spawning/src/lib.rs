#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that answers due spawns with weighted agent kinds.

use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wave_defence_core::{AgentKind, Command, Event, KindWeight, RunState, WaveConfig};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the kind-selection stream.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that turns `SpawnDue` events into `SpawnAgent` commands.
///
/// The random stream restarts from the configured seed whenever a run begins,
/// so identical command scripts produce identical agent sequences.
#[derive(Debug)]
pub struct Spawning {
    rng_seed: u64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the active wave to emit spawn commands.
    ///
    /// One command is emitted per `SpawnDue` event; spawns are dropped when no
    /// wave is actively spawning.
    pub fn handle(&mut self, events: &[Event], wave: Option<&WaveConfig>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunStateChanged {
                    state: RunState::Running,
                } => {
                    self.rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
                }
                Event::SpawnDue { wave: index } => {
                    let Some(wave) = wave else {
                        continue;
                    };
                    let draw = self.rng.gen::<f32>() * wave.total_weight();
                    let kind = select_kind(&wave.weights, draw);
                    trace!("wave {index} spawn resolved to {kind:?}");
                    out.push(Command::SpawnAgent { kind });
                }
                _ => {}
            }
        }
    }
}

/// Picks the agent kind by walking the table and subtracting each weight from
/// `draw`; the first entry that brings the remainder to zero or below wins.
///
/// `draw` is expected in `[0, total_weight)`, so a draw equal to an entry's
/// cumulative bound selects that entry. An empty table yields the first known
/// kind; a draw past the end yields the first entry.
#[must_use]
pub fn select_kind(weights: &[KindWeight], draw: f32) -> AgentKind {
    let Some(first) = weights.first() else {
        return AgentKind::ALL[0];
    };

    let mut remainder = draw;
    for entry in weights {
        remainder -= entry.weight;
        if remainder <= 0.0 {
            return entry.kind;
        }
    }
    first.kind
}
