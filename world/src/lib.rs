#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wave Defence.
//!
//! The world owns every piece of run state: the clock, the economy, agents,
//! emplacements, projectiles, the avatar and the single queue of deferred
//! work. Mutation happens exclusively through [`apply`]; adapters and systems
//! observe it through the [`query`] module and the emitted [`Event`]s.

mod agents;
mod avatar;
mod config;
mod economy;
mod emplacements;
mod schedule;
mod wave;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use log::{debug, info};
use wave_defence_core::{
    AgentId, AgentKind, Attacker, Command, Direction, EmplacementLevel, Event, ProjectileId,
    PurchaseError, RunState, SlotId, DEATH_PRESENTATION, KILL_REWARD, PROJECTILE_FLIGHT,
    UPGRADE_PRESENTATION,
};

pub use config::{ConfigError, EconomyConfig, RunConfig, ScreenConfig};
pub use wave::WavePhase;

use agents::{Agent, AgentRegistry, Segment};
use avatar::{Avatar, AVATAR_DAMAGE, AVATAR_RANGE, COLLISION_RADIUS};
use economy::Economy;
use emplacements::{Emplacement, EmplacementRegistry};
use schedule::{Scheduler, Task};
use wave::WaveDirector;

const INTER_WAVE_DELAY: Duration = Duration::from_millis(2_000);
const CONCLUSION_DELAY: Duration = Duration::from_millis(1_000);

#[derive(Clone, Copy, Debug)]
struct Projectile {
    attacker: Attacker,
    target: AgentId,
    origin: Vec2,
    destination: Vec2,
    launched: Duration,
    damage: u32,
}

impl Projectile {
    fn position_at(&self, now: Duration) -> Vec2 {
        let elapsed = now.saturating_sub(self.launched);
        let progress = (elapsed.as_secs_f32() / PROJECTILE_FLIGHT.as_secs_f32()).clamp(0.0, 1.0);
        self.origin.lerp(self.destination, progress)
    }
}

/// Represents the authoritative Wave Defence world state.
#[derive(Debug)]
pub struct World {
    config: RunConfig,
    state: RunState,
    clock: Duration,
    economy: Economy,
    scheduler: Scheduler,
    agents: AgentRegistry,
    emplacements: EmplacementRegistry,
    avatar: Avatar,
    director: Option<WaveDirector>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: ProjectileId,
}

impl World {
    /// Creates a world on the menu using the built-in level.
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(RunConfig::default())
    }

    /// Creates a world on the menu using the provided level after validating it.
    pub fn with_config(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: RunConfig) -> Self {
        Self {
            economy: Economy::new(config.economy, config.max_waves()),
            avatar: Avatar::spawn(&config.screen),
            config,
            state: RunState::Menu,
            clock: Duration::ZERO,
            scheduler: Scheduler::new(),
            agents: AgentRegistry::new(),
            emplacements: EmplacementRegistry::new(),
            director: None,
            projectiles: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    fn reset_run(&mut self) {
        self.economy = Economy::new(self.config.economy, self.config.max_waves());
        self.scheduler.clear();
        self.agents.clear();
        self.emplacements.clear();
        self.projectiles.clear();
        self.director = None;
        self.avatar = Avatar::spawn(&self.config.screen);
    }

    fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    fn change_state(&mut self, state: RunState, out_events: &mut Vec<Event>) {
        self.state = state;
        out_events.push(Event::RunStateChanged { state });
    }

    fn emit_stats(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::StatsChanged {
            stats: self.economy.stats(),
        });
    }

    fn begin_run(&mut self, out_events: &mut Vec<Event>) {
        self.reset_run();
        info!(
            "run started with {} lives over {} waves",
            self.economy.lives(),
            self.config.max_waves()
        );
        self.change_state(RunState::Running, out_events);
        self.emit_stats(out_events);
    }

    fn return_to_menu(&mut self, out_events: &mut Vec<Event>) {
        self.reset_run();
        info!("returned to menu");
        self.change_state(RunState::Menu, out_events);
        self.emit_stats(out_events);
    }

    fn conclude_run(&mut self, out_events: &mut Vec<Event>) {
        if self.state == RunState::Over {
            return;
        }

        if let Some(director) = self.director.as_mut() {
            director.stop(&mut self.scheduler);
        }
        self.scheduler.clear();
        self.projectiles.clear();
        self.economy.finish_wave();
        info!(
            "run over at wave {} with {} lives left",
            self.economy.wave(),
            self.economy.lives()
        );
        self.change_state(RunState::Over, out_events);
        self.emit_stats(out_events);
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.is_running() || !self.economy.can_start_wave() {
            debug!(
                "ignoring wave start (wave {}, in progress: {})",
                self.economy.wave(),
                self.economy.wave_in_progress()
            );
            return;
        }

        let index = usize::try_from(self.economy.wave()).unwrap_or(usize::MAX);
        let Some(config) = self.config.waves.get(index).cloned() else {
            return;
        };

        self.scheduler
            .cancel_where(|task| matches!(task, Task::AutoStartWave));
        if let Some(mut previous) = self.director.take() {
            previous.stop(&mut self.scheduler);
        }

        let wave = self.economy.begin_wave();
        let mut director = WaveDirector::new(wave, config);
        director.start(self.clock, &mut self.scheduler);
        self.director = Some(director);

        info!("wave {wave} started");
        out_events.push(Event::WaveStarted { wave });
        self.emit_stats(out_events);
    }

    fn poll_wave(&mut self, out_events: &mut Vec<Event>) {
        let Some(director) = self.director.as_mut() else {
            return;
        };
        if !director.poll(self.agents.len()) {
            return;
        }

        let wave = director.wave();
        self.economy.finish_wave();
        info!("wave {wave} cleared");
        out_events.push(Event::WaveCompleted { wave });
        self.emit_stats(out_events);

        if self.economy.is_final_wave() {
            self.scheduler
                .schedule(self.clock.saturating_add(CONCLUSION_DELAY), Task::ConcludeRun);
        } else {
            self.scheduler
                .schedule(self.clock.saturating_add(INTER_WAVE_DELAY), Task::AutoStartWave);
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        let horizon = self.clock.saturating_add(dt);
        while self.is_running() {
            let Some((due, task)) = self.scheduler.pop_due(horizon) else {
                break;
            };
            self.clock = self.clock.max(due);
            self.run_task(task, out_events);
        }
        self.clock = horizon;

        if self.is_running() {
            self.poll_wave(out_events);
        }
    }

    fn run_task(&mut self, task: Task, out_events: &mut Vec<Event>) {
        match task {
            Task::SpawnDue => {
                let Some(director) = self.director.as_mut() else {
                    return;
                };
                if director.spawn_due(self.clock, &mut self.scheduler) {
                    out_events.push(Event::SpawnDue {
                        wave: director.wave(),
                    });
                }
            }
            Task::SegmentComplete { agent } => self.advance_agent(agent, out_events),
            Task::ProjectileArrival { projectile } => self.land_projectile(projectile, out_events),
            Task::DeathPresentationComplete { agent } => self.remove_dead(agent, out_events),
            Task::UpgradeComplete { slot } => {
                let completed = self
                    .emplacements
                    .get_mut(slot)
                    .and_then(Emplacement::complete_upgrade);
                if let Some(level) = completed {
                    debug!("emplacement {} reached level {}", slot.get(), level.number());
                    out_events.push(Event::UpgradeCompleted { slot, level });
                }
            }
            Task::InvulnerabilityExpired => {
                if self.avatar.recover() {
                    out_events.push(Event::AvatarRecovered);
                }
            }
            Task::AutoStartWave => self.start_wave(out_events),
            Task::ConcludeRun => self.conclude_run(out_events),
        }
    }

    fn spawn_agent(&mut self, kind: AgentKind, out_events: &mut Vec<Event>) {
        let Some(director) = self.director.as_mut() else {
            debug!("ignoring {kind:?} spawn without an active wave");
            return;
        };
        if !director.record_spawn() {
            debug!("ignoring {kind:?} spawn that was not due");
            return;
        }
        let Some(origin) = self.config.path.first().copied() else {
            return;
        };

        let id = self.agents.allocate_id();
        debug!("agent {} ({kind:?}) spawned", id.get());
        out_events.push(Event::AgentSpawned {
            agent: id,
            kind,
            position: origin,
        });

        match Segment::begin(&self.config.path, 0, kind.profile().speed, self.clock) {
            Some(segment) => {
                let agent = Agent::new(id, kind, segment);
                out_events.push(Event::AgentHeadingChanged {
                    agent: id,
                    kind,
                    heading: agent.heading(),
                });
                self.scheduler
                    .schedule(segment.ends_at(), Task::SegmentComplete { agent: id });
                self.agents.insert(agent);
            }
            None => self.agent_arrived(id, out_events),
        }
    }

    fn advance_agent(&mut self, id: AgentId, out_events: &mut Vec<Event>) {
        let Some(agent) = self.agents.get_mut(id) else {
            return;
        };
        let Some(index) = agent.segment().map(|segment| segment.index) else {
            return;
        };

        match Segment::begin(&self.config.path, index + 1, agent.speed(), self.clock) {
            Some(segment) => {
                if agent.walk(segment) {
                    out_events.push(Event::AgentHeadingChanged {
                        agent: id,
                        kind: agent.kind(),
                        heading: agent.heading(),
                    });
                }
                self.scheduler
                    .schedule(segment.ends_at(), Task::SegmentComplete { agent: id });
            }
            None => {
                let _ = self.agents.remove(id);
                self.agent_arrived(id, out_events);
            }
        }
    }

    fn agent_arrived(&mut self, id: AgentId, out_events: &mut Vec<Event>) {
        debug!("agent {} reached the goal", id.get());
        out_events.push(Event::AgentReachedGoal { agent: id });
        self.lose_life(out_events);
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        let lives = self.economy.lose_life();
        self.emit_stats(out_events);
        if lives == 0 {
            self.conclude_run(out_events);
        }
    }

    fn land_projectile(&mut self, id: ProjectileId, out_events: &mut Vec<Event>) {
        let Some(projectile) = self.projectiles.remove(&id) else {
            return;
        };

        let now = self.clock;
        let outcome = self
            .agents
            .get_mut(projectile.target)
            .filter(|agent| agent.is_targetable())
            .map(|agent| {
                let dying = agent.take_damage(projectile.damage, now);
                (agent.health(), agent.kind(), agent.heading(), dying)
            });

        let Some((health, kind, heading, dying)) = outcome else {
            out_events.push(Event::ProjectileLanded {
                projectile: id,
                hit: false,
            });
            return;
        };

        out_events.push(Event::ProjectileLanded {
            projectile: id,
            hit: true,
        });
        out_events.push(Event::AgentDamaged {
            agent: projectile.target,
            health,
        });

        if dying {
            debug!("agent {} is dying", projectile.target.get());
            out_events.push(Event::AgentDying {
                agent: projectile.target,
                kind,
                heading,
            });
            self.scheduler.schedule(
                now.saturating_add(DEATH_PRESENTATION),
                Task::DeathPresentationComplete {
                    agent: projectile.target,
                },
            );
        }
    }

    fn remove_dead(&mut self, id: AgentId, out_events: &mut Vec<Event>) {
        let dying = self
            .agents
            .get(id)
            .is_some_and(|agent| !agent.is_targetable());
        if !dying {
            return;
        }

        let _ = self.agents.remove(id);
        self.economy.earn(KILL_REWARD);
        debug!("agent {} killed", id.get());
        out_events.push(Event::AgentKilled {
            agent: id,
            reward: KILL_REWARD,
        });
        self.emit_stats(out_events);
    }

    fn fire(&mut self, attacker: Attacker, target: AgentId, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let Some(destination) = self
            .agents
            .get(target)
            .filter(|agent| agent.is_targetable())
            .map(|agent| agent.position_at(now))
        else {
            return;
        };

        let (origin, range, damage, ready) = match attacker {
            Attacker::Avatar => (
                self.avatar.position(),
                AVATAR_RANGE,
                AVATAR_DAMAGE,
                self.avatar.cooldown().is_ready(now),
            ),
            Attacker::Emplacement(slot) => {
                let Some(emplacement) = self.emplacements.get(slot) else {
                    return;
                };
                let stats = emplacement.stats();
                (
                    emplacement.position(),
                    stats.range,
                    stats.damage,
                    emplacement.cooldown().is_ready(now),
                )
            }
        };

        if !ready || origin.distance_squared(destination) > range * range {
            return;
        }

        match attacker {
            Attacker::Avatar => self.avatar.record_shot(now),
            Attacker::Emplacement(slot) => {
                if let Some(emplacement) = self.emplacements.get_mut(slot) {
                    emplacement.record_shot(now);
                }
            }
        }

        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        let _ = self.projectiles.insert(
            id,
            Projectile {
                attacker,
                target,
                origin,
                destination,
                launched: now,
                damage,
            },
        );
        self.scheduler.schedule(
            now.saturating_add(PROJECTILE_FLIGHT),
            Task::ProjectileArrival { projectile: id },
        );
        out_events.push(Event::ProjectileFired {
            projectile: id,
            attacker,
            target,
            origin,
            destination,
        });
    }

    fn steer_avatar(
        &mut self,
        direction: Option<Direction>,
        dt: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let now = self.clock;
        if let Some(direction) = direction {
            self.avatar.steer(direction, dt, now, &self.config.screen);
        }

        if self.avatar.is_invulnerable() {
            return;
        }

        let position = self.avatar.position();
        let radius_squared = COLLISION_RADIUS * COLLISION_RADIUS;
        let touched = self.agents.iter().any(|agent| {
            agent.is_targetable()
                && agent.position_at(now).distance_squared(position) <= radius_squared
        });
        if !touched {
            return;
        }

        let until = self.avatar.begin_invulnerability(now);
        self.scheduler.schedule(until, Task::InvulnerabilityExpired);
        debug!("avatar hit at ({}, {})", position.x, position.y);
        out_events.push(Event::AvatarHit { position });
        self.lose_life(out_events);
    }

    fn try_build(&mut self, slot: SlotId) -> Result<Vec2, PurchaseError> {
        if !self.is_running() {
            return Err(PurchaseError::NotRunning);
        }
        let index = usize::try_from(slot.get()).map_err(|_| PurchaseError::UnknownSlot)?;
        let position = self
            .config
            .build_slots
            .get(index)
            .copied()
            .ok_or(PurchaseError::UnknownSlot)?;
        if self.emplacements.contains(slot) {
            return Err(PurchaseError::SlotOccupied);
        }

        self.economy.spend(EmplacementLevel::One.stats().cost)?;
        self.emplacements.insert(Emplacement::build(slot, position));
        Ok(position)
    }

    fn try_upgrade(&mut self, slot: SlotId) -> Result<EmplacementLevel, PurchaseError> {
        if !self.is_running() {
            return Err(PurchaseError::NotRunning);
        }
        let emplacement = self
            .emplacements
            .get_mut(slot)
            .ok_or(PurchaseError::NoEmplacement)?;
        let target = emplacement.next_level()?;
        self.economy.spend(target.stats().cost)?;

        emplacement.begin_upgrade(target);
        self.scheduler.schedule(
            self.clock.saturating_add(UPGRADE_PRESENTATION),
            Task::UpgradeComplete { slot },
        );
        Ok(target)
    }

    fn reject(&self, slot: SlotId, reason: PurchaseError, out_events: &mut Vec<Event>) {
        debug!("purchase at slot {} rejected: {reason:?}", slot.get());
        out_events.push(Event::PurchaseRejected { slot, reason });
        self.emit_stats(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRun => {
            if world.state == RunState::Menu {
                world.begin_run(out_events);
            }
        }
        Command::Retry => {
            if world.state != RunState::Menu {
                world.begin_run(out_events);
            }
        }
        Command::ReturnToMenu => {
            if world.state != RunState::Menu {
                world.return_to_menu(out_events);
            }
        }
        Command::StartWave => world.start_wave(out_events),
        Command::BuildEmplacement { slot } => match world.try_build(slot) {
            Ok(position) => {
                debug!("emplacement built at slot {}", slot.get());
                out_events.push(Event::EmplacementBuilt { slot, position });
                world.emit_stats(out_events);
            }
            Err(reason) => world.reject(slot, reason, out_events),
        },
        Command::UpgradeEmplacement { slot } => match world.try_upgrade(slot) {
            Ok(target) => {
                out_events.push(Event::UpgradeStarted { slot, target });
                world.emit_stats(out_events);
            }
            Err(reason) => world.reject(slot, reason, out_events),
        },
        Command::Tick { dt } => {
            if world.is_running() {
                world.advance(dt, out_events);
            }
        }
        Command::SpawnAgent { kind } => {
            if world.is_running() {
                world.spawn_agent(kind, out_events);
            }
        }
        Command::SteerAvatar { direction, dt } => {
            if world.is_running() {
                world.steer_avatar(direction, dt, out_events);
            }
        }
        Command::FireProjectile { attacker, target } => {
            if world.is_running() {
                world.fire(attacker, target, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use wave_defence_core::{
        AgentId, AgentView, Attacker, AttackerView, EmplacementLevel, ProjectileId, RunState,
        SlotId, Stats, WaveConfig,
    };

    use super::{RunConfig, WavePhase, World};

    /// Reports the top-level state of the run.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.state
    }

    /// Captures the current economy payload.
    #[must_use]
    pub fn stats(world: &World) -> Stats {
        world.economy.stats()
    }

    /// Simulation time elapsed since the run started.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Provides read-only access to the level the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &RunConfig {
        &world.config
    }

    /// Waypoints agents walk along.
    #[must_use]
    pub fn path(world: &World) -> &[Vec2] {
        &world.config.path
    }

    /// Positions of every build slot, indexed by slot identifier.
    #[must_use]
    pub fn build_slots(world: &World) -> &[Vec2] {
        &world.config.build_slots
    }

    /// Captures a read-only view of the active agents ordered by spawn.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots = world
            .agents
            .iter()
            .map(|agent| agent.snapshot(world.clock))
            .collect();
        AgentView::from_snapshots(snapshots)
    }

    /// Captures every attacker in firing order: the avatar, then emplacements
    /// in build order. Empty unless a run is in progress.
    #[must_use]
    pub fn attacker_view(world: &World) -> AttackerView {
        if !world.is_running() {
            return AttackerView::default();
        }

        let now = world.clock;
        let snapshots = std::iter::once(world.avatar.attacker_snapshot(now))
            .chain(
                world
                    .emplacements
                    .iter()
                    .map(|emplacement| emplacement.attacker_snapshot(now)),
            )
            .collect();
        AttackerView::from_snapshots(snapshots)
    }

    /// Presentation-facing state of the avatar.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AvatarSnapshot {
        /// Current position in world units.
        pub position: Vec2,
        /// Whether collisions are currently ignored.
        pub invulnerable: bool,
        /// Whether the attack animation is still playing.
        pub attacking: bool,
    }

    /// Captures the avatar's presentation-facing state.
    #[must_use]
    pub fn avatar(world: &World) -> AvatarSnapshot {
        AvatarSnapshot {
            position: world.avatar.position(),
            invulnerable: world.avatar.is_invulnerable(),
            attacking: world.avatar.is_attacking(world.clock),
        }
    }

    /// Read-only description of a built emplacement.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EmplacementSnapshot {
        /// Slot hosting the emplacement.
        pub slot: SlotId,
        /// Position of the emplacement.
        pub position: Vec2,
        /// Level currently in effect.
        pub level: EmplacementLevel,
        /// Whether an upgrade presentation is pending.
        pub upgrading: bool,
    }

    /// Lists built emplacements in build order.
    #[must_use]
    pub fn emplacements(world: &World) -> Vec<EmplacementSnapshot> {
        world
            .emplacements
            .iter()
            .map(|emplacement| EmplacementSnapshot {
                slot: emplacement.slot(),
                position: emplacement.position(),
                level: emplacement.level(),
                upgrading: emplacement.is_upgrading(),
            })
            .collect()
    }

    /// Read-only description of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: ProjectileId,
        /// Attacker that fired it.
        pub attacker: Attacker,
        /// Agent it was fired at.
        pub target: AgentId,
        /// Interpolated position at the current clock.
        pub position: Vec2,
    }

    /// Lists projectiles in flight ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                attacker: projectile.attacker,
                target: projectile.target,
                position: projectile.position_at(world.clock),
            })
            .collect()
    }

    /// Progress of the most recently started wave.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WaveProgress {
        /// One-based index of the wave.
        pub wave: u32,
        /// Lifecycle phase of the wave director.
        pub phase: WavePhase,
        /// Agents spawned so far.
        pub spawned: u32,
        /// Agents the wave spawns in total.
        pub count: u32,
    }

    /// Reports progress of the most recently started wave, if any.
    #[must_use]
    pub fn wave_progress(world: &World) -> Option<WaveProgress> {
        world.director.as_ref().map(|director| WaveProgress {
            wave: director.wave(),
            phase: director.phase(),
            spawned: director.spawned(),
            count: director.config().count,
        })
    }

    /// Configuration of the wave that is still spawning, if any.
    #[must_use]
    pub fn active_wave_config(world: &World) -> Option<&WaveConfig> {
        world
            .director
            .as_ref()
            .filter(|director| director.phase() == WavePhase::Spawning)
            .map(|director| director.config())
    }

    /// Number of deferred tasks waiting in the world's queue.
    #[must_use]
    pub fn pending_tasks(world: &World) -> usize {
        world.scheduler.pending()
    }
}
