#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic attacker targets from world snapshots.

use glam::Vec2;
use wave_defence_core::{AgentId, AgentView, AttackerView, RunState, TargetAssignment};

/// Targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    agent_workspace: Vec<AgentCandidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes one target per attacker for the provided world snapshot.
    ///
    /// Each attacker picks the targetable agent with the smallest squared
    /// distance among those within range; equal distances resolve to the agent
    /// spawned first. The output buffer is cleared before populating it and
    /// follows the attacker view's order.
    pub fn handle(
        &mut self,
        run_state: RunState,
        attackers: &AttackerView,
        agents: &AgentView,
        out: &mut Vec<TargetAssignment>,
    ) {
        out.clear();

        if run_state != RunState::Running {
            return;
        }

        self.prepare_agent_workspace(agents);
        if self.agent_workspace.is_empty() {
            return;
        }

        for attacker in attackers.iter() {
            let max_distance = attacker.range * attacker.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.agent_workspace {
                let distance_sq = candidate.position.distance_squared(attacker.position);
                if distance_sq > max_distance {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    agent: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TargetAssignment {
                    attacker: attacker.attacker,
                    agent: best_candidate.agent,
                    attacker_position: attacker.position,
                    agent_position: best_candidate.position,
                });
            }
        }
    }

    fn prepare_agent_workspace(&mut self, agents: &AgentView) {
        self.agent_workspace.clear();
        self.agent_workspace.reserve(agents.len());

        for snapshot in agents.iter().filter(|snapshot| snapshot.is_targetable()) {
            self.agent_workspace.push(AgentCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AgentCandidate {
    id: AgentId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    agent: AgentId,
    position: Vec2,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.agent < other.agent
    }
}
