#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing simulation that drives the world and its systems each tick.
//!
//! [`Simulation`] owns the authoritative world together with the pure
//! systems, runs them in a fixed order every tick and fans the resulting
//! events out to the host's [`SimulationObserver`]s and [`Presentation`].

pub mod cues;

use std::time::Duration;

use log::debug;
use wave_defence_core::{
    Command, DirectionalInput, Event, Presentation, RunState, SimulationObserver, SlotId, Sprite,
    SpriteKind, Stats, TargetAssignment,
};
use wave_defence_system_avatar_control::AvatarControl;
use wave_defence_system_combat::Combat;
use wave_defence_system_spawning::{Config as SpawningConfig, Spawning};
use wave_defence_system_targeting::Targeting;
use wave_defence_world::{self as world, query, ConfigError, RunConfig, World};

/// Requests the host may issue between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostCommand {
    /// Leaves the menu and begins a fresh run.
    StartRun,
    /// Starts the next wave early.
    StartWave,
    /// Abandons the run and returns to the menu.
    ReturnToMenu,
    /// Restarts the run from scratch.
    Retry,
    /// Buys a level 1 emplacement at a build slot.
    Build {
        /// Build slot to occupy.
        slot: SlotId,
    },
    /// Buys the next level for the emplacement at a build slot.
    Upgrade {
        /// Build slot hosting the emplacement.
        slot: SlotId,
    },
}

impl From<HostCommand> for Command {
    fn from(command: HostCommand) -> Self {
        match command {
            HostCommand::StartRun => Self::StartRun,
            HostCommand::StartWave => Self::StartWave,
            HostCommand::ReturnToMenu => Self::ReturnToMenu,
            HostCommand::Retry => Self::Retry,
            HostCommand::Build { slot } => Self::BuildEmplacement { slot },
            HostCommand::Upgrade { slot } => Self::UpgradeEmplacement { slot },
        }
    }
}

/// Complete simulation: world, systems and the host's output ports.
pub struct Simulation {
    world: World,
    spawning: Spawning,
    avatar_control: AvatarControl,
    targeting: Targeting,
    combat: Combat,
    targets: Vec<TargetAssignment>,
    observers: Vec<Box<dyn SimulationObserver>>,
    presentation: Option<Box<dyn Presentation>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("observers", &self.observers.len())
            .field("presentation", &self.presentation.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation sitting on the menu for the provided level.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let seed = config.seed;
        let world = World::with_config(config)?;
        Ok(Self {
            world,
            spawning: Spawning::new(SpawningConfig::new(seed)),
            avatar_control: AvatarControl::new(),
            targeting: Targeting::new(),
            combat: Combat::new(),
            targets: Vec::new(),
            observers: Vec::new(),
            presentation: None,
        })
    }

    /// Registers an observer notified after every state change and economy mutation.
    pub fn subscribe(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Installs the presentation capability, replacing any previous one.
    pub fn attach_presentation(&mut self, presentation: Box<dyn Presentation>) {
        self.presentation = Some(presentation);
    }

    /// Provides read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Top-level state of the run.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        query::run_state(&self.world)
    }

    /// Latest economy payload.
    #[must_use]
    pub fn stats(&self) -> Stats {
        query::stats(&self.world)
    }

    /// Applies a host request immediately and notifies subscribers.
    pub fn submit(&mut self, command: HostCommand) {
        debug!("host command {command:?}");
        let mut events = Vec::new();
        self.execute(vec![Command::from(command)], &mut events);
        self.react(DirectionalInput::default(), &mut events);
        self.dispatch(&events);
    }

    /// Advances the simulation by `dt` using the directional input held this tick.
    ///
    /// Order within a tick: the world drains due tasks, spawns are resolved,
    /// the avatar moves and collides, then targeting and firing run for the
    /// avatar followed by emplacements in build order.
    pub fn tick(&mut self, dt: Duration, input: Option<DirectionalInput>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        if events.is_empty() {
            return;
        }

        self.react(input.unwrap_or_default(), &mut events);

        let run_state = query::run_state(&self.world);
        let attackers = query::attacker_view(&self.world);
        self.targeting.handle(
            run_state,
            &attackers,
            &query::agent_view(&self.world),
            &mut self.targets,
        );
        let mut commands = Vec::new();
        self.combat
            .handle(run_state, &attackers, &self.targets, &mut commands);
        self.execute(commands, &mut events);

        self.dispatch(&events);
    }

    /// Collects the sprites describing the current frame.
    #[must_use]
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::new();
        if self.run_state() == RunState::Menu {
            return sprites;
        }

        for emplacement in query::emplacements(&self.world) {
            sprites.push(Sprite {
                kind: SpriteKind::Emplacement {
                    level: emplacement.level,
                    upgrading: emplacement.upgrading,
                },
                position: emplacement.position,
            });
        }

        for agent in query::agent_view(&self.world).iter() {
            sprites.push(Sprite {
                kind: SpriteKind::Agent {
                    kind: agent.kind,
                    heading: agent.heading,
                    dying: agent.dying,
                },
                position: agent.position,
            });
        }

        let avatar = query::avatar(&self.world);
        sprites.push(Sprite {
            kind: SpriteKind::Avatar {
                invulnerable: avatar.invulnerable,
            },
            position: avatar.position,
        });

        for projectile in query::projectiles(&self.world) {
            sprites.push(Sprite {
                kind: SpriteKind::Projectile {
                    attacker: projectile.attacker,
                },
                position: projectile.position,
            });
        }

        sprites
    }

    /// Draws the current frame through the provided presentation.
    pub fn render(&self, presentation: &mut dyn Presentation) {
        for sprite in self.sprites() {
            presentation.draw(sprite);
        }
    }

    fn react(&mut self, input: DirectionalInput, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.spawning.handle(
            events,
            query::active_wave_config(&self.world),
            &mut commands,
        );
        self.avatar_control.handle(events, input, &mut commands);
        self.execute(commands, events);
    }

    fn execute(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RunStateChanged { state } => {
                    for observer in &mut self.observers {
                        observer.scene_changed(*state);
                    }
                }
                Event::StatsChanged { stats } => {
                    for observer in &mut self.observers {
                        observer.stats_changed(stats);
                    }
                }
                _ => {}
            }

            if let Some(presentation) = self.presentation.as_mut() {
                cues::present(presentation.as_mut(), event);
            }
        }
    }
}
