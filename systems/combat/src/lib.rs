#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use wave_defence_core::{AttackerView, Command, RunState, TargetAssignment};

/// Combat system that queues firing commands for ready attackers.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for attackers ready to fire.
    ///
    /// Commands follow the order of `targets`, which keeps the avatar ahead of
    /// emplacements and emplacements in build order.
    pub fn handle(
        &mut self,
        run_state: RunState,
        attackers: &AttackerView,
        targets: &[TargetAssignment],
        out: &mut Vec<Command>,
    ) {
        if run_state != RunState::Running {
            return;
        }

        if targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            let ready = attackers
                .get(target.attacker)
                .is_some_and(|snapshot| snapshot.ready_in.is_zero());
            if ready {
                self.scratch.push(Command::FireProjectile {
                    attacker: target.attacker,
                    target: target.agent,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
