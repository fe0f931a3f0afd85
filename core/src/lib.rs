#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wave Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Reward credited to the economy for every agent that finishes dying.
pub const KILL_REWARD: u32 = 15;

/// Time a projectile spends travelling from its attacker to its destination.
pub const PROJECTILE_FLIGHT: Duration = Duration::from_millis(200);

/// Frames contained in every agent animation clip.
pub const CLIP_FRAMES: u32 = 6;

/// Playback rate of every agent animation clip.
pub const CLIP_FRAME_RATE: u32 = 10;

/// Length of the death presentation that gates the "agent killed" signal.
pub const DEATH_PRESENTATION: Duration =
    Duration::from_millis((CLIP_FRAMES * 1_000 / CLIP_FRAME_RATE) as u64);

/// Length of the presentation that gates an emplacement upgrade.
pub const UPGRADE_PRESENTATION: Duration = Duration::from_millis(500);

/// Top-level state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Title screen; nothing simulates.
    Menu,
    /// A run is in progress and ticks advance the simulation.
    Running,
    /// The run ended, either after the final wave or at zero lives.
    Over,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the menu and begins a fresh run.
    StartRun,
    /// Restarts the run from scratch.
    Retry,
    /// Abandons the run and returns to the menu.
    ReturnToMenu,
    /// Requests that the next wave begins.
    StartWave,
    /// Requests a level 1 emplacement at the provided build slot.
    BuildEmplacement {
        /// Build slot that should host the emplacement.
        slot: SlotId,
    },
    /// Requests that the emplacement at the provided slot upgrades one level.
    UpgradeEmplacement {
        /// Build slot hosting the emplacement to upgrade.
        slot: SlotId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Instantiates an agent of the provided kind at the head of the path.
    SpawnAgent {
        /// Kind selected for the spawn.
        kind: AgentKind,
    },
    /// Moves the avatar for one tick and resolves collisions with agents.
    SteerAvatar {
        /// Direction resolved from input, or `None` to stand still.
        direction: Option<Direction>,
        /// Duration of the movement step.
        dt: Duration,
    },
    /// Requests that an attacker fires a projectile at an agent.
    FireProjectile {
        /// Attacker releasing the projectile.
        attacker: Attacker,
        /// Agent targeted by the projectile.
        target: AgentId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the run entered a new top-level state.
    RunStateChanged {
        /// State that became active.
        state: RunState,
    },
    /// Carries the economy payload after every economy mutation.
    StatsChanged {
        /// Latest economy values.
        stats: Stats,
    },
    /// Confirms that a wave began spawning.
    WaveStarted {
        /// One-based index of the wave.
        wave: u32,
    },
    /// Signals that the wave director's next spawn is due.
    SpawnDue {
        /// One-based index of the wave that owns the spawn.
        wave: u32,
    },
    /// Confirms that every agent of a wave was spawned and cleared.
    WaveCompleted {
        /// One-based index of the completed wave.
        wave: u32,
    },
    /// Confirms that an agent entered the path.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Kind of the agent.
        kind: AgentKind,
        /// Position at which the agent appeared.
        position: Vec2,
    },
    /// Reports that an agent started a segment facing a new direction.
    AgentHeadingChanged {
        /// Agent that turned.
        agent: AgentId,
        /// Kind of the agent.
        kind: AgentKind,
        /// Heading adopted for the segment.
        heading: Heading,
    },
    /// Reports that a projectile damaged an agent.
    AgentDamaged {
        /// Agent that took damage.
        agent: AgentId,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that an agent ran out of health and began its death presentation.
    AgentDying {
        /// Agent that is dying.
        agent: AgentId,
        /// Kind of the agent.
        kind: AgentKind,
        /// Heading held when the agent died.
        heading: Heading,
    },
    /// Confirms that a dying agent was removed and its reward credited.
    AgentKilled {
        /// Agent that was destroyed.
        agent: AgentId,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// Reports that an agent walked off the end of the path.
    AgentReachedGoal {
        /// Agent that arrived.
        agent: AgentId,
    },
    /// Confirms that an attacker released a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Attacker that fired.
        attacker: Attacker,
        /// Agent targeted by the projectile.
        target: AgentId,
        /// Position the projectile left from.
        origin: Vec2,
        /// Position of the target when the shot was taken.
        destination: Vec2,
    },
    /// Reports that a projectile reached its destination.
    ProjectileLanded {
        /// Projectile that arrived.
        projectile: ProjectileId,
        /// Whether the projectile damaged its target.
        hit: bool,
    },
    /// Confirms that an emplacement was built.
    EmplacementBuilt {
        /// Slot hosting the emplacement.
        slot: SlotId,
        /// Position of the emplacement.
        position: Vec2,
    },
    /// Confirms that an emplacement upgrade was purchased and is presenting.
    UpgradeStarted {
        /// Slot hosting the emplacement.
        slot: SlotId,
        /// Level the emplacement will reach.
        target: EmplacementLevel,
    },
    /// Confirms that an emplacement switched to its upgraded stats.
    UpgradeCompleted {
        /// Slot hosting the emplacement.
        slot: SlotId,
        /// Level now in effect.
        level: EmplacementLevel,
    },
    /// Reports that a build or upgrade request was refused.
    PurchaseRejected {
        /// Slot named by the request.
        slot: SlotId,
        /// Specific reason the request failed.
        reason: PurchaseError,
    },
    /// Reports that the avatar collided with an agent and lost a life.
    AvatarHit {
        /// Position of the avatar at the moment of the hit.
        position: Vec2,
    },
    /// Reports that the avatar's invulnerability window expired.
    AvatarRecovered,
}

/// Reasons a build or upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseError {
    /// No run is in progress.
    NotRunning,
    /// The slot does not exist in the run configuration.
    UnknownSlot,
    /// The slot already hosts an emplacement.
    SlotOccupied,
    /// The slot does not host an emplacement to upgrade.
    NoEmplacement,
    /// An upgrade is already presenting on the emplacement.
    UpgradePending,
    /// The emplacement already reached the final level.
    MaxLevel,
    /// The economy cannot cover the cost.
    InsufficientFunds,
}

/// Economy payload forwarded to the host after every economy mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Lives remaining before the run ends.
    pub lives: u32,
    /// Currency available for purchases.
    pub currency: u32,
    /// One-based index of the latest wave, zero before the first.
    pub wave: u32,
    /// Number of waves configured for the run.
    pub max_waves: u32,
    /// Indicates whether a wave is currently spawning or awaiting clearance.
    pub wave_in_progress: bool,
}

/// Cardinal movement directions available to the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing y.
    North,
    /// Movement toward increasing x.
    East,
    /// Movement toward increasing y.
    South,
    /// Movement toward decreasing x.
    West,
}

impl Direction {
    /// Unit vector pointing along the direction in screen coordinates.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Directional input sampled from the host every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionalInput {
    /// Whether the "left" control is held.
    pub left: bool,
    /// Whether the "right" control is held.
    pub right: bool,
    /// Whether the "up" control is held.
    pub up: bool,
    /// Whether the "down" control is held.
    pub down: bool,
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a build slot within the run configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Entity capable of acquiring targets and firing projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attacker {
    /// The player-controlled avatar.
    Avatar,
    /// The emplacement hosted by the provided slot.
    Emplacement(SlotId),
}

/// Kinds of hostile agents that walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Sturdy-enough baseline agent.
    Goblin,
    /// Slow agent with the largest health pool.
    Slime,
    /// Fast agent with a moderate health pool.
    Wolf,
}

impl AgentKind {
    /// Every kind in table order; the first entry is the fallback kind.
    pub const ALL: [Self; 3] = [Self::Goblin, Self::Slime, Self::Wolf];

    /// Immutable stat and asset record for the kind.
    #[must_use]
    pub const fn profile(self) -> AgentProfile {
        match self {
            Self::Goblin => AgentProfile {
                health: 2,
                speed: 80.0,
                scale: 1.5,
                clip_prefix: "goblin",
            },
            Self::Slime => AgentProfile {
                health: 4,
                speed: 60.0,
                scale: 1.2,
                clip_prefix: "slime",
            },
            Self::Wolf => AgentProfile {
                health: 3,
                speed: 120.0,
                scale: 1.3,
                clip_prefix: "wolf",
            },
        }
    }

    /// Name of the looping walk clip for the provided heading.
    #[must_use]
    pub fn walk_clip(self, heading: Heading) -> String {
        format!("{}-walk-{}", self.profile().clip_prefix, heading.facing.as_str())
    }

    /// Name of the one-shot death clip for the provided heading.
    #[must_use]
    pub fn death_clip(self, heading: Heading) -> String {
        format!("{}-death-{}", self.profile().clip_prefix, heading.facing.as_str())
    }
}

/// Stat and asset configuration shared by every agent of one kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentProfile {
    /// Health the agent spawns with.
    pub health: u32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Sprite scale applied by presentation.
    pub scale: f32,
    /// Prefix used to build clip names.
    pub clip_prefix: &'static str,
}

/// Facing bucket used to pick walk and death clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Travelling mostly horizontally.
    Side,
    /// Travelling mostly toward decreasing y.
    Up,
    /// Travelling mostly toward increasing y.
    Down,
}

impl Facing {
    /// Lowercase name used inside clip identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Facing bucket plus horizontal mirroring for a segment of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Heading {
    /// Facing bucket derived from the travel angle.
    pub facing: Facing,
    /// Whether the side clip should be mirrored to face left.
    pub mirrored: bool,
}

impl Default for Heading {
    fn default() -> Self {
        Self {
            facing: Facing::Side,
            mirrored: false,
        }
    }
}

impl Heading {
    /// Classifies the travel from `from` to `to`.
    ///
    /// Angles are measured in screen coordinates where y grows downward. Travel
    /// within 67.5° to 112.5° of the positive x axis (in either rotational
    /// direction) counts as vertical; everything else is side-on and mirrored
    /// when heading left. A zero vector keeps the default side heading.
    #[must_use]
    pub fn from_travel(from: Vec2, to: Vec2) -> Self {
        let delta = to - from;
        if delta == Vec2::ZERO {
            return Self::default();
        }

        let degrees = delta.y.atan2(delta.x).to_degrees();
        let magnitude = degrees.abs();
        if (67.5_f32..=112.5_f32).contains(&magnitude) {
            let facing = if degrees > 0.0 { Facing::Down } else { Facing::Up };
            Self {
                facing,
                mirrored: false,
            }
        } else {
            Self {
                facing: Facing::Side,
                mirrored: delta.x < 0.0,
            }
        }
    }
}

/// Upgrade level of an emplacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmplacementLevel {
    /// Level reached when the emplacement is built.
    One,
    /// First upgrade.
    Two,
    /// Final upgrade.
    Three,
}

impl EmplacementLevel {
    /// Next level, or `None` when the level is terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    /// Numeric representation of the level.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Stats in effect at the level, including the cost to reach it.
    #[must_use]
    pub const fn stats(self) -> EmplacementStats {
        match self {
            Self::One => EmplacementStats {
                cost: 50,
                range: 150.0,
                fire_interval: Duration::from_millis(1_000),
                damage: 1,
            },
            Self::Two => EmplacementStats {
                cost: 75,
                range: 175.0,
                fire_interval: Duration::from_millis(800),
                damage: 2,
            },
            Self::Three => EmplacementStats {
                cost: 100,
                range: 200.0,
                fire_interval: Duration::from_millis(600),
                damage: 3,
            },
        }
    }
}

/// Entry of the emplacement level table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmplacementStats {
    /// Currency spent to build (level 1) or upgrade into the level.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between shots.
    pub fire_interval: Duration,
    /// Damage carried by every projectile.
    pub damage: u32,
}

/// Relative spawn weight of one agent kind inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindWeight {
    /// Kind that may be drawn.
    pub kind: AgentKind,
    /// Proportional weight; weights need not sum to one.
    pub weight: f32,
}

impl KindWeight {
    /// Creates a new weighted entry.
    #[must_use]
    pub const fn new(kind: AgentKind, weight: f32) -> Self {
        Self { kind, weight }
    }
}

/// Spawn schedule for a single wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Total number of agents spawned by the wave.
    pub count: u32,
    /// Delay between consecutive spawns, and before the first one.
    #[serde(with = "millis")]
    pub spawn_interval: Duration,
    /// Weighted list of kinds drawn for each spawn.
    pub weights: Vec<KindWeight>,
}

impl WaveConfig {
    /// Creates a new wave configuration.
    #[must_use]
    pub fn new(count: u32, spawn_interval: Duration, weights: Vec<KindWeight>) -> Self {
        Self {
            count,
            spawn_interval,
            weights,
        }
    }

    /// Sum of every configured weight.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.weights.iter().map(|entry| entry.weight).sum()
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Tracks when an attacker last fired and how long it must wait between shots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    interval: Duration,
    last_fired: Option<Duration>,
}

impl Cooldown {
    /// Creates a cooldown that is immediately ready.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Minimum time between shots.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Simulation time of the most recent shot.
    #[must_use]
    pub const fn last_fired(&self) -> Option<Duration> {
        self.last_fired
    }

    /// Time remaining before the next shot is allowed.
    #[must_use]
    pub fn ready_in(&self, now: Duration) -> Duration {
        match self.last_fired {
            Some(fired) => fired.saturating_add(self.interval).saturating_sub(now),
            None => Duration::ZERO,
        }
    }

    /// Reports whether enough time elapsed since the last shot.
    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        self.ready_in(now).is_zero()
    }

    /// Records a shot taken at `now`.
    pub fn record(&mut self, now: Duration) {
        self.last_fired = Some(now);
    }

    /// Replaces the interval while keeping the last shot timestamp.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Kind of the agent.
    pub kind: AgentKind,
    /// Current position along the path.
    pub position: Vec2,
    /// Remaining health.
    pub health: u32,
    /// Heading of the current segment.
    pub heading: Heading,
    /// Whether the agent is playing its death presentation.
    pub dying: bool,
}

impl AgentSnapshot {
    /// Reports whether attackers may acquire and damage the agent.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        !self.dying
    }
}

/// Read-only snapshot describing every agent in the active set.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view, ordered by spawn.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of agents in the view, dying ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an attacker's firing state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerSnapshot {
    /// Attacker described by the snapshot.
    pub attacker: Attacker,
    /// Position projectiles leave from.
    pub position: Vec2,
    /// Targeting radius in world units.
    pub range: f32,
    /// Time remaining before the attacker may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every attacker in update order.
///
/// The avatar comes first, followed by emplacements in build order.
#[derive(Clone, Debug, Default)]
pub struct AttackerView {
    snapshots: Vec<AttackerSnapshot>,
}

impl AttackerView {
    /// Creates a new attacker view that preserves the provided order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<AttackerSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the attackers in update order.
    pub fn iter(&self) -> impl Iterator<Item = &AttackerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided attacker.
    #[must_use]
    pub fn get(&self, attacker: Attacker) -> Option<&AttackerSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.attacker == attacker)
    }
}

/// Target chosen for an attacker during a targeting pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetAssignment {
    /// Attacker that acquired the target.
    pub attacker: Attacker,
    /// Agent selected as the target.
    pub agent: AgentId,
    /// Position of the attacker during the pass.
    pub attacker_position: Vec2,
    /// Position of the agent during the pass.
    pub agent_position: Vec2,
}

/// Reference to an entity presentation can animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A hostile agent.
    Agent(AgentId),
    /// The emplacement hosted by a slot.
    Emplacement(SlotId),
    /// The player avatar.
    Avatar,
}

/// Shape or sprite drawn by presentation at a position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteKind {
    /// A hostile agent using its walk or death clip.
    Agent {
        /// Kind of the agent.
        kind: AgentKind,
        /// Heading of the current segment.
        heading: Heading,
        /// Whether the death clip is playing.
        dying: bool,
    },
    /// An emplacement drawn as a base and cannon.
    Emplacement {
        /// Level currently in effect.
        level: EmplacementLevel,
        /// Whether an upgrade presentation is running.
        upgrading: bool,
    },
    /// The avatar drawn as a square.
    Avatar {
        /// Whether the avatar is flashing after a hit.
        invulnerable: bool,
    },
    /// A projectile drawn as a small circle.
    Projectile {
        /// Attacker that fired the projectile.
        attacker: Attacker,
    },
}

/// Drawing request forwarded to presentation every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// What to draw.
    pub kind: SpriteKind,
    /// Where to draw it.
    pub position: Vec2,
}

/// Capability interface provided by the host for animation, audio and drawing.
///
/// Every call is fire-and-forget; the simulation never waits on presentation.
pub trait Presentation {
    /// Plays a named animation clip on an entity.
    fn play_clip(&mut self, entity: EntityRef, clip: &str);

    /// Plays a named one-shot sound.
    fn play_sound(&mut self, sound: &str);

    /// Draws a shape or sprite at its position.
    fn draw(&mut self, sprite: Sprite);
}

/// Output port notified synchronously after state changes.
pub trait SimulationObserver {
    /// Called when the top-level run state changes.
    fn scene_changed(&mut self, state: RunState);

    /// Called after every economy mutation.
    fn stats_changed(&mut self, stats: &Stats);
}
