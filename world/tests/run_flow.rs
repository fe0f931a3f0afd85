use std::time::Duration;

use wave_defence_core::{AgentKind, Command, Event, KindWeight, RunState, Vec2, WaveConfig};
use wave_defence_world::{self as world, query, EconomyConfig, RunConfig, WavePhase, World};

const STEP: Duration = Duration::from_millis(100);

struct Harness {
    world: World,
    spawn_kind: AgentKind,
    log: Vec<(Duration, Event)>,
}

impl Harness {
    fn start(config: RunConfig, spawn_kind: AgentKind) -> Self {
        let mut harness = Self {
            world: World::with_config(config).expect("valid config"),
            spawn_kind,
            log: Vec::new(),
        };
        let _ = harness.command(Command::StartRun);
        harness
    }

    fn command(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let now = query::clock(&self.world);
        self.log
            .extend(events.iter().cloned().map(|event| (now, event)));
        events
    }

    /// Advances one step, answering every spawn request with the fixed kind
    /// and holding the avatar still.
    fn step(&mut self) -> Vec<Event> {
        let mut events = self.command(Command::Tick { dt: STEP });
        let due = events
            .iter()
            .filter(|event| matches!(event, Event::SpawnDue { .. }))
            .count();
        for _ in 0..due {
            let kind = self.spawn_kind;
            events.extend(self.command(Command::SpawnAgent { kind }));
        }
        events.extend(self.command(Command::SteerAvatar {
            direction: None,
            dt: STEP,
        }));
        events
    }

    fn run_until(&mut self, limit: Duration, mut done: impl FnMut(&World) -> bool) {
        while query::clock(&self.world) < limit {
            let _ = self.step();
            if done(&self.world) {
                return;
            }
        }
        panic!("condition not reached within {limit:?}");
    }

    fn times_of(&self, mut predicate: impl FnMut(&Event) -> bool) -> Vec<Duration> {
        self.log
            .iter()
            .filter(|(_, event)| predicate(event))
            .map(|(time, _)| *time)
            .collect()
    }
}

fn level(path: Vec<Vec2>, waves: Vec<WaveConfig>) -> RunConfig {
    RunConfig {
        path,
        waves,
        ..RunConfig::default()
    }
}

fn slime_wave(count: u32, interval_ms: u64) -> WaveConfig {
    WaveConfig::new(
        count,
        Duration::from_millis(interval_ms),
        vec![KindWeight::new(AgentKind::Slime, 1.0)],
    )
}

#[test]
fn wave_spawns_every_agent_at_its_interval_and_completes_once() {
    let path = vec![Vec2::new(0.0, 150.0), Vec2::new(60.0, 150.0)];
    let mut harness = Harness::start(level(path, vec![slime_wave(5, 1_500)]), AgentKind::Slime);
    let _ = harness.command(Command::StartWave);

    harness.run_until(Duration::from_secs(20), |world| {
        query::wave_progress(world).map(|progress| progress.phase) == Some(WavePhase::Complete)
    });

    let spawns = harness.times_of(|event| {
        matches!(
            event,
            Event::AgentSpawned {
                kind: AgentKind::Slime,
                ..
            }
        )
    });
    let expected: Vec<Duration> = (1..=5).map(|n| Duration::from_millis(1_500 * n)).collect();
    assert_eq!(spawns, expected);

    let arrivals = harness.times_of(|event| matches!(event, Event::AgentReachedGoal { .. }));
    assert_eq!(arrivals.len(), 5);

    let completions = harness.times_of(|event| matches!(event, Event::WaveCompleted { wave: 1 }));
    assert_eq!(completions, vec![Duration::from_millis(8_500)]);
    assert!(completions[0] >= arrivals[4]);

    let stats = query::stats(&harness.world);
    assert_eq!(stats.lives, 15);
    assert!(!stats.wave_in_progress);
}

#[test]
fn avatar_ignores_contact_while_invulnerable() {
    let path = vec![Vec2::new(0.0, 384.0), Vec2::new(1_024.0, 384.0)];
    let mut harness = Harness::start(level(path, vec![slime_wave(2, 2_100)]), AgentKind::Slime);
    let _ = harness.command(Command::StartWave);

    harness.run_until(Duration::from_secs(15), |world| query::stats(world).lives < 20);
    let first_hit = query::clock(&harness.world);
    assert_eq!(first_hit, Duration::from_millis(10_300));
    assert_eq!(query::stats(&harness.world).lives, 19);
    assert!(query::avatar(&harness.world).invulnerable);

    harness.run_until(Duration::from_secs(20), |world| {
        query::clock(world) >= first_hit + Duration::from_millis(500)
    });
    let overlap = query::agent_view(&harness.world)
        .iter()
        .any(|agent| agent.position.distance(query::avatar(&harness.world).position) <= 24.0);
    assert!(overlap, "the first agent should still touch the avatar");
    assert_eq!(query::stats(&harness.world).lives, 19);

    harness.run_until(Duration::from_secs(20), |world| query::stats(world).lives < 19);
    assert_eq!(
        query::clock(&harness.world),
        first_hit + Duration::from_millis(2_100)
    );
    assert_eq!(query::stats(&harness.world).lives, 18);

    let recoveries = harness.times_of(|event| matches!(event, Event::AvatarRecovered));
    assert_eq!(recoveries, vec![first_hit + Duration::from_millis(2_000)]);
}

#[test]
fn losing_the_last_life_ends_the_run_mid_wave() {
    let mut config = level(
        vec![Vec2::new(0.0, 150.0), Vec2::new(30.0, 150.0)],
        vec![slime_wave(3, 1_000)],
    );
    config.economy = EconomyConfig {
        starting_lives: 1,
        starting_currency: 100,
    };
    let mut harness = Harness::start(config, AgentKind::Slime);
    let _ = harness.command(Command::StartWave);

    harness.run_until(Duration::from_secs(10), |world| {
        query::run_state(world) == RunState::Over
    });

    assert_eq!(query::clock(&harness.world), Duration::from_millis(1_500));
    let progress = query::wave_progress(&harness.world).expect("wave started");
    assert_ne!(progress.phase, WavePhase::Complete);
    assert_eq!(progress.spawned, 1);
    assert_eq!(query::pending_tasks(&harness.world), 0);

    let stats = query::stats(&harness.world);
    assert_eq!(stats.lives, 0);
    assert!(!stats.wave_in_progress);

    let after = harness.step();
    assert!(after.is_empty(), "an ended run does not simulate");
}

#[test]
fn waves_chain_automatically_and_the_final_one_ends_the_run() {
    let path = vec![Vec2::new(0.0, 150.0), Vec2::new(60.0, 150.0)];
    let mut harness = Harness::start(
        level(path, vec![slime_wave(1, 100), slime_wave(1, 100)]),
        AgentKind::Slime,
    );
    let _ = harness.command(Command::StartWave);

    harness.run_until(Duration::from_secs(20), |world| {
        query::run_state(world) == RunState::Over
    });

    let first_done = harness.times_of(|event| matches!(event, Event::WaveCompleted { wave: 1 }));
    let second_start = harness.times_of(|event| matches!(event, Event::WaveStarted { wave: 2 }));
    assert_eq!(first_done, vec![Duration::from_millis(1_100)]);
    assert_eq!(second_start, vec![Duration::from_millis(3_100)]);

    let second_done = harness.times_of(|event| matches!(event, Event::WaveCompleted { wave: 2 }));
    let over = harness.times_of(|event| {
        matches!(
            event,
            Event::RunStateChanged {
                state: RunState::Over
            }
        )
    });
    assert_eq!(second_done, vec![Duration::from_millis(4_200)]);
    assert_eq!(over, vec![Duration::from_millis(5_200)]);
    assert_eq!(query::stats(&harness.world).wave, 2);
}

#[test]
fn manual_start_cancels_the_pending_automatic_start() {
    let path = vec![Vec2::new(0.0, 150.0), Vec2::new(60.0, 150.0)];
    let waves = vec![slime_wave(1, 100), slime_wave(1, 100), slime_wave(1, 100)];
    let mut harness = Harness::start(level(path, waves), AgentKind::Slime);
    let _ = harness.command(Command::StartWave);

    harness.run_until(Duration::from_secs(5), |world| {
        !query::stats(world).wave_in_progress && query::stats(world).wave == 1
    });
    let _ = harness.command(Command::StartWave);
    assert_eq!(query::stats(&harness.world).wave, 2);

    harness.run_until(Duration::from_secs(20), |world| {
        query::clock(world) >= Duration::from_secs(6)
    });
    let starts = harness.times_of(|event| matches!(event, Event::WaveStarted { .. }));
    assert_eq!(starts.len(), 3, "one manual start then one automatic start");
    assert_eq!(starts[1], Duration::from_millis(1_100));
    assert_eq!(starts[2], Duration::from_millis(4_200));
}

#[test]
fn start_wave_is_ignored_while_a_wave_runs() {
    let mut harness = Harness::start(RunConfig::default(), AgentKind::Goblin);
    let first = harness.command(Command::StartWave);
    let second = harness.command(Command::StartWave);

    assert!(first.contains(&Event::WaveStarted { wave: 1 }));
    assert!(second.is_empty());
    assert_eq!(query::stats(&harness.world).wave, 1);
}

#[test]
fn return_to_menu_discards_the_run() {
    let mut harness = Harness::start(RunConfig::default(), AgentKind::Goblin);
    let _ = harness.command(Command::BuildEmplacement {
        slot: wave_defence_core::SlotId::new(0),
    });
    let _ = harness.command(Command::StartWave);
    for _ in 0..20 {
        let _ = harness.step();
    }
    assert!(!query::agent_view(&harness.world).is_empty());

    let events = harness.command(Command::ReturnToMenu);
    assert!(events.contains(&Event::RunStateChanged {
        state: RunState::Menu
    }));
    assert!(query::agent_view(&harness.world).is_empty());
    assert!(query::emplacements(&harness.world).is_empty());
    assert!(query::wave_progress(&harness.world).is_none());
    assert_eq!(query::pending_tasks(&harness.world), 0);

    let stats = query::stats(&harness.world);
    assert_eq!((stats.lives, stats.currency, stats.wave), (20, 100, 0));
    assert!(query::attacker_view(&harness.world).iter().next().is_none());
}

#[test]
fn retry_restarts_from_a_fresh_run() {
    let mut config = level(
        vec![Vec2::new(0.0, 150.0), Vec2::new(30.0, 150.0)],
        vec![slime_wave(1, 100)],
    );
    config.economy.starting_lives = 1;
    let mut harness = Harness::start(config, AgentKind::Slime);
    let _ = harness.command(Command::StartWave);
    harness.run_until(Duration::from_secs(5), |world| {
        query::run_state(world) == RunState::Over
    });

    let events = harness.command(Command::Retry);
    assert_eq!(
        events.first(),
        Some(&Event::RunStateChanged {
            state: RunState::Running
        })
    );
    let stats = query::stats(&harness.world);
    assert_eq!((stats.lives, stats.wave), (1, 0));
    assert!(harness.command(Command::StartRun).is_empty());
}
