//! Wave director: timed spawning and clearance tracking for a single wave.

use std::time::Duration;

use wave_defence_core::WaveConfig;

use crate::schedule::{Scheduler, Task};

/// Lifecycle phase of a wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// Created but not started.
    Idle,
    /// Spawn events are still scheduled.
    Spawning,
    /// Every spawn fired; waiting for the active set to empty.
    AwaitingClear,
    /// Every agent spawned and cleared.
    Complete,
}

#[derive(Clone, Debug)]
pub(crate) struct WaveDirector {
    wave: u32,
    config: WaveConfig,
    phase: WavePhase,
    due_fired: u32,
    spawned: u32,
}

impl WaveDirector {
    pub(crate) fn new(wave: u32, config: WaveConfig) -> Self {
        Self {
            wave,
            config,
            phase: WavePhase::Idle,
            due_fired: 0,
            spawned: 0,
        }
    }

    pub(crate) fn wave(&self) -> u32 {
        self.wave
    }

    pub(crate) fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub(crate) fn phase(&self) -> WavePhase {
        self.phase
    }

    pub(crate) fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Enters `Spawning` and schedules the first spawn one interval out.
    pub(crate) fn start(&mut self, now: Duration, scheduler: &mut Scheduler) {
        if self.phase != WavePhase::Idle {
            return;
        }

        if self.config.count == 0 {
            self.phase = WavePhase::AwaitingClear;
            return;
        }

        self.phase = WavePhase::Spawning;
        scheduler.schedule(now.saturating_add(self.config.spawn_interval), Task::SpawnDue);
    }

    /// Handles a fired spawn task, scheduling the next one while any remain.
    ///
    /// Returns `false` when the director no longer expects spawns.
    pub(crate) fn spawn_due(&mut self, now: Duration, scheduler: &mut Scheduler) -> bool {
        if self.phase != WavePhase::Spawning || self.due_fired >= self.config.count {
            return false;
        }

        self.due_fired += 1;
        if self.due_fired < self.config.count {
            scheduler.schedule(now.saturating_add(self.config.spawn_interval), Task::SpawnDue);
        }
        true
    }

    /// Accepts a spawn, reporting whether one was owed.
    pub(crate) fn record_spawn(&mut self) -> bool {
        if self.phase != WavePhase::Spawning || self.spawned >= self.due_fired {
            return false;
        }

        self.spawned += 1;
        if self.spawned == self.config.count {
            self.phase = WavePhase::AwaitingClear;
        }
        true
    }

    /// Polls for clearance; returns `true` exactly once, on completion.
    pub(crate) fn poll(&mut self, active_agents: usize) -> bool {
        if self.phase != WavePhase::AwaitingClear || active_agents > 0 {
            return false;
        }

        self.phase = WavePhase::Complete;
        true
    }

    /// Cancels every pending spawn. Safe to call in any phase.
    pub(crate) fn stop(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel_where(|task| matches!(task, Task::SpawnDue));
        if self.phase == WavePhase::Spawning || self.phase == WavePhase::Idle {
            self.phase = WavePhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_defence_core::{AgentKind, KindWeight};

    fn config(count: u32) -> WaveConfig {
        WaveConfig::new(
            count,
            Duration::from_millis(100),
            vec![KindWeight::new(AgentKind::Slime, 1.0)],
        )
    }

    fn drain(director: &mut WaveDirector, scheduler: &mut Scheduler, horizon: Duration) -> u32 {
        let mut fired = 0;
        while let Some((due, task)) = scheduler.pop_due(horizon) {
            assert_eq!(task, Task::SpawnDue);
            if director.spawn_due(due, scheduler) {
                assert!(director.record_spawn());
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn schedules_exactly_count_spawns_at_interval() {
        let mut scheduler = Scheduler::new();
        let mut director = WaveDirector::new(1, config(3));
        director.start(Duration::ZERO, &mut scheduler);
        assert_eq!(director.phase(), WavePhase::Spawning);

        assert_eq!(drain(&mut director, &mut scheduler, Duration::from_millis(99)), 0);
        assert_eq!(drain(&mut director, &mut scheduler, Duration::from_millis(100)), 1);
        assert_eq!(drain(&mut director, &mut scheduler, Duration::from_secs(10)), 2);

        assert_eq!(director.spawned(), 3);
        assert_eq!(director.phase(), WavePhase::AwaitingClear);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn completes_only_once_the_active_set_empties() {
        let mut scheduler = Scheduler::new();
        let mut director = WaveDirector::new(1, config(1));
        director.start(Duration::ZERO, &mut scheduler);

        assert!(!director.poll(0), "must not complete before spawning");
        let _ = drain(&mut director, &mut scheduler, Duration::from_secs(1));

        assert!(!director.poll(1));
        assert!(director.poll(0));
        assert_eq!(director.phase(), WavePhase::Complete);
        assert!(!director.poll(0), "completion is reported once");
    }

    #[test]
    fn empty_wave_completes_on_first_poll() {
        let mut scheduler = Scheduler::new();
        let mut director = WaveDirector::new(2, config(0));
        director.start(Duration::ZERO, &mut scheduler);
        assert_eq!(scheduler.pending(), 0);
        assert!(director.poll(0));
    }

    #[test]
    fn unowed_spawns_are_refused() {
        let mut scheduler = Scheduler::new();
        let mut director = WaveDirector::new(1, config(2));
        assert!(!director.record_spawn());
        director.start(Duration::ZERO, &mut scheduler);
        assert!(!director.record_spawn(), "no spawn is due yet");
    }

    #[test]
    fn stop_is_idempotent_and_cancels_pending_spawns() {
        let mut scheduler = Scheduler::new();
        let mut director = WaveDirector::new(1, config(5));
        director.start(Duration::ZERO, &mut scheduler);
        scheduler.schedule(Duration::from_secs(5), Task::AutoStartWave);

        director.stop(&mut scheduler);
        director.stop(&mut scheduler);

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(
            scheduler.pop_due(Duration::from_secs(5)),
            Some((Duration::from_secs(5), Task::AutoStartWave))
        );
        assert!(!director.poll(0));
    }
}
