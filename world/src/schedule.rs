//! Single per-run queue of deferred world work.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

use wave_defence_core::{AgentId, ProjectileId, SlotId};

/// Deferred work the world performs once its fire time is reached.
///
/// Tasks name entities by identifier only; the world re-checks that the
/// entity still exists in the expected state before applying any effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    /// The wave director's next spawn is due.
    SpawnDue,
    /// An agent finished walking its current segment.
    SegmentComplete { agent: AgentId },
    /// A projectile reached its destination.
    ProjectileArrival { projectile: ProjectileId },
    /// A dying agent finished its death presentation.
    DeathPresentationComplete { agent: AgentId },
    /// An emplacement finished its upgrade presentation.
    UpgradeComplete { slot: SlotId },
    /// The avatar's invulnerability window elapsed.
    InvulnerabilityExpired,
    /// The inter-wave delay elapsed.
    AutoStartWave,
    /// The delay after the final wave elapsed.
    ConcludeRun,
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    sequence: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Min-heap of tasks ordered by fire time, then by insertion.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    entries: BinaryHeap<Reverse<Entry>>,
    next_sequence: u64,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(&mut self, due: Duration, task: Task) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(Reverse(Entry {
            due,
            sequence,
            task,
        }));
    }

    /// Removes and returns the earliest task due at or before `horizon`.
    pub(crate) fn pop_due(&mut self, horizon: Duration) -> Option<(Duration, Task)> {
        let Reverse(head) = self.entries.peek()?;
        if head.due > horizon {
            return None;
        }

        self.entries
            .pop()
            .map(|Reverse(entry)| (entry.due, entry.task))
    }

    /// Drops every pending task matching the predicate.
    pub(crate) fn cancel_where<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Task) -> bool,
    {
        self.entries.retain(|Reverse(entry)| !predicate(&entry.task));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn pending(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn drains_in_fire_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(millis(300), Task::ConcludeRun);
        scheduler.schedule(millis(100), Task::SpawnDue);
        scheduler.schedule(millis(200), Task::AutoStartWave);

        let mut drained = Vec::new();
        while let Some((due, task)) = scheduler.pop_due(millis(1_000)) {
            drained.push((due, task));
        }

        assert_eq!(
            drained,
            vec![
                (millis(100), Task::SpawnDue),
                (millis(200), Task::AutoStartWave),
                (millis(300), Task::ConcludeRun),
            ]
        );
    }

    #[test]
    fn equal_fire_times_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        let first = Task::SegmentComplete {
            agent: AgentId::new(2),
        };
        let second = Task::SegmentComplete {
            agent: AgentId::new(1),
        };
        scheduler.schedule(millis(50), first);
        scheduler.schedule(millis(50), second);

        assert_eq!(scheduler.pop_due(millis(50)), Some((millis(50), first)));
        assert_eq!(scheduler.pop_due(millis(50)), Some((millis(50), second)));
    }

    #[test]
    fn tasks_beyond_horizon_stay_queued() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(millis(500), Task::InvulnerabilityExpired);

        assert_eq!(scheduler.pop_due(millis(499)), None);
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.pop_due(millis(500)).is_some());
    }

    #[test]
    fn cancel_where_only_drops_matching_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(millis(10), Task::SpawnDue);
        scheduler.schedule(millis(20), Task::SpawnDue);
        scheduler.schedule(millis(30), Task::AutoStartWave);

        scheduler.cancel_where(|task| matches!(task, Task::SpawnDue));

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(
            scheduler.pop_due(millis(100)),
            Some((millis(30), Task::AutoStartWave))
        );
    }
}
