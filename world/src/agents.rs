//! Hostile agents and the waypoint traversal they share.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use wave_defence_core::{AgentId, AgentKind, AgentSnapshot, Heading};

/// One leg of travel between two consecutive waypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    /// Index of the waypoint the segment leaves from.
    pub(crate) index: usize,
    from: Vec2,
    to: Vec2,
    started: Duration,
    duration: Duration,
}

impl Segment {
    /// Starts the segment leaving waypoint `index`, or returns `None` when the
    /// path is exhausted.
    pub(crate) fn begin(path: &[Vec2], index: usize, speed: f32, now: Duration) -> Option<Self> {
        let from = *path.get(index)?;
        let to = *path.get(index.checked_add(1)?)?;
        Some(Self {
            index,
            from,
            to,
            started: now,
            duration: traversal_time(from.distance(to), speed),
        })
    }

    /// Simulation time at which the destination waypoint is reached.
    pub(crate) fn ends_at(&self) -> Duration {
        self.started.saturating_add(self.duration)
    }

    pub(crate) fn heading(&self) -> Heading {
        Heading::from_travel(self.from, self.to)
    }

    /// Position along the segment at `now`, clamped to its endpoints.
    pub(crate) fn position_at(&self, now: Duration) -> Vec2 {
        if self.duration.is_zero() {
            return self.to;
        }

        let elapsed = now.saturating_sub(self.started);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        self.from.lerp(self.to, progress as f32)
    }
}

fn traversal_time(distance: f32, speed: f32) -> Duration {
    if distance <= 0.0 {
        return Duration::ZERO;
    }
    if speed <= 0.0 {
        return Duration::MAX;
    }
    Duration::try_from_secs_f32(distance / speed).unwrap_or(Duration::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Vitality {
    Walking(Segment),
    Dying { position: Vec2 },
}

/// Hostile mover parameterised by its kind's immutable profile.
#[derive(Clone, Debug)]
pub(crate) struct Agent {
    id: AgentId,
    kind: AgentKind,
    health: u32,
    heading: Heading,
    vitality: Vitality,
}

impl Agent {
    pub(crate) fn new(id: AgentId, kind: AgentKind, segment: Segment) -> Self {
        Self {
            id,
            kind,
            health: kind.profile().health,
            heading: segment.heading(),
            vitality: Vitality::Walking(segment),
        }
    }

    pub(crate) fn kind(&self) -> AgentKind {
        self.kind
    }

    pub(crate) fn heading(&self) -> Heading {
        self.heading
    }

    pub(crate) fn speed(&self) -> f32 {
        self.kind.profile().speed
    }

    /// Segment currently walked, or `None` once dying.
    pub(crate) fn segment(&self) -> Option<&Segment> {
        match &self.vitality {
            Vitality::Walking(segment) => Some(segment),
            Vitality::Dying { .. } => None,
        }
    }

    pub(crate) fn is_targetable(&self) -> bool {
        matches!(self.vitality, Vitality::Walking(_))
    }

    pub(crate) fn position_at(&self, now: Duration) -> Vec2 {
        match &self.vitality {
            Vitality::Walking(segment) => segment.position_at(now),
            Vitality::Dying { position } => *position,
        }
    }

    /// Switches to the next segment, reporting whether the heading changed.
    pub(crate) fn walk(&mut self, segment: Segment) -> bool {
        let heading = segment.heading();
        let turned = heading != self.heading;
        self.heading = heading;
        self.vitality = Vitality::Walking(segment);
        turned
    }

    /// Applies damage and reports whether the agent started dying.
    ///
    /// Movement freezes at the position held at `now`.
    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> bool {
        if !self.is_targetable() {
            return false;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            return false;
        }

        self.vitality = Vitality::Dying {
            position: self.position_at(now),
        };
        true
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn snapshot(&self, now: Duration) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position_at(now),
            health: self.health,
            heading: self.heading,
            dying: !self.is_targetable(),
        }
    }
}

/// Active-agent set keyed by identifier in spawn order.
#[derive(Debug)]
pub(crate) struct AgentRegistry {
    entries: BTreeMap<AgentId, Agent>,
    next_agent_id: AgentId,
}

impl AgentRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_agent_id: AgentId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> AgentId {
        let id = self.next_agent_id;
        self.next_agent_id = AgentId::new(id.get().wrapping_add(1));
        id
    }

    pub(crate) fn insert(&mut self, agent: Agent) {
        let _ = self.entries.insert(agent.id, agent);
    }

    pub(crate) fn get(&self, id: AgentId) -> Option<&Agent> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Forgets every agent; identifiers keep counting upward.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_defence_core::Facing;

    fn path() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 50.0),
        ]
    }

    #[test]
    fn segment_duration_is_distance_over_speed() {
        let segment = Segment::begin(&path(), 0, 50.0, Duration::from_secs(1)).expect("segment");
        assert_eq!(segment.ends_at(), Duration::from_secs(3));
        assert_eq!(
            segment.position_at(Duration::from_secs(2)),
            Vec2::new(50.0, 0.0)
        );
        assert_eq!(
            segment.position_at(Duration::from_secs(10)),
            Vec2::new(100.0, 0.0)
        );
    }

    #[test]
    fn exhausted_path_has_no_segment() {
        assert!(Segment::begin(&path(), 2, 50.0, Duration::ZERO).is_none());
        assert!(Segment::begin(&[Vec2::ZERO], 0, 50.0, Duration::ZERO).is_none());
    }

    #[test]
    fn zero_length_segment_completes_immediately() {
        let points = [Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)];
        let segment = Segment::begin(&points, 0, 10.0, Duration::from_secs(4)).expect("segment");
        assert_eq!(segment.ends_at(), Duration::from_secs(4));
    }

    #[test]
    fn heading_changes_are_reported_on_turns() {
        let points = path();
        let first = Segment::begin(&points, 0, 10.0, Duration::ZERO).expect("first");
        let mut agent = Agent::new(AgentId::new(0), AgentKind::Goblin, first);
        assert_eq!(agent.heading().facing, Facing::Side);

        let second = Segment::begin(&points, 1, 10.0, first.ends_at()).expect("second");
        assert!(agent.walk(second));
        assert_eq!(agent.heading().facing, Facing::Down);
    }

    #[test]
    fn lethal_damage_freezes_position() {
        let points = path();
        let segment = Segment::begin(&points, 0, 10.0, Duration::ZERO).expect("segment");
        let mut agent = Agent::new(AgentId::new(0), AgentKind::Goblin, segment);

        assert!(!agent.take_damage(1, Duration::from_secs(1)));
        assert_eq!(agent.health(), 1);
        assert!(agent.take_damage(5, Duration::from_secs(2)));
        assert_eq!(agent.health(), 0);
        assert!(!agent.is_targetable());
        assert_eq!(
            agent.position_at(Duration::from_secs(9)),
            Vec2::new(20.0, 0.0)
        );
        assert!(!agent.take_damage(1, Duration::from_secs(3)));
    }
}
