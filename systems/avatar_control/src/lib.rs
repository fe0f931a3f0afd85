#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating held directional input into avatar steering commands.

use std::time::Duration;

use wave_defence_core::{Command, Direction, DirectionalInput, Event, RunState};

/// Avatar control system that steers the avatar once per advanced tick.
#[derive(Debug, Clone)]
pub struct AvatarControl {
    run_state: RunState,
}

impl Default for AvatarControl {
    fn default() -> Self {
        Self {
            run_state: RunState::Menu,
        }
    }
}

impl AvatarControl {
    /// Creates a new avatar control system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            run_state: RunState::Menu,
        }
    }

    /// Consumes world events and the held input to emit a steering command.
    ///
    /// A `SteerAvatar` command is emitted for every batch containing advanced
    /// time while a run is in progress, even when no key is held, so the world
    /// resolves collisions every tick.
    pub fn handle(&mut self, events: &[Event], input: DirectionalInput, out: &mut Vec<Command>) {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::RunStateChanged { state } => self.run_state = *state,
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                _ => {}
            }
        }

        if self.run_state != RunState::Running || dt.is_zero() {
            return;
        }

        out.push(Command::SteerAvatar {
            direction: resolve_direction(input),
            dt,
        });
    }
}

/// Collapses held keys into a single direction.
///
/// Horizontal input wins over vertical; left wins over right and up wins over
/// down.
#[must_use]
pub const fn resolve_direction(input: DirectionalInput) -> Option<Direction> {
    if input.left {
        Some(Direction::West)
    } else if input.right {
        Some(Direction::East)
    } else if input.up {
        Some(Direction::North)
    } else if input.down {
        Some(Direction::South)
    } else {
        None
    }
}
