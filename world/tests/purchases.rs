use std::time::Duration;

use wave_defence_core::{Command, EmplacementLevel, Event, PurchaseError, RunState, SlotId, Stats};
use wave_defence_world::{self as world, query, EconomyConfig, RunConfig, World};

fn running(starting_currency: u32) -> World {
    let config = RunConfig {
        economy: EconomyConfig {
            starting_lives: 20,
            starting_currency,
        },
        ..RunConfig::default()
    };
    let mut world = World::with_config(config).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRun, &mut events);
    world
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn rejection(events: &[Event]) -> Option<PurchaseError> {
    events.iter().find_map(|event| match event {
        Event::PurchaseRejected { reason, .. } => Some(*reason),
        _ => None,
    })
}

fn stats_of(events: &[Event]) -> Option<Stats> {
    events.iter().find_map(|event| match event {
        Event::StatsChanged { stats } => Some(*stats),
        _ => None,
    })
}

#[test]
fn building_deducts_the_level_one_cost() {
    let mut world = running(100);
    let events = apply(
        &mut world,
        Command::BuildEmplacement {
            slot: SlotId::new(2),
        },
    );

    let position = query::build_slots(&world)[2];
    assert_eq!(
        events.first(),
        Some(&Event::EmplacementBuilt {
            slot: SlotId::new(2),
            position,
        })
    );
    assert_eq!(stats_of(&events).map(|stats| stats.currency), Some(50));

    let built = query::emplacements(&world);
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].level, EmplacementLevel::One);
}

#[test]
fn rejected_purchases_still_report_unchanged_stats() {
    let mut world = running(60);
    let _ = apply(
        &mut world,
        Command::BuildEmplacement {
            slot: SlotId::new(0),
        },
    );

    let cases = [
        (
            Command::BuildEmplacement {
                slot: SlotId::new(0),
            },
            PurchaseError::SlotOccupied,
        ),
        (
            Command::BuildEmplacement {
                slot: SlotId::new(99),
            },
            PurchaseError::UnknownSlot,
        ),
        (
            Command::BuildEmplacement {
                slot: SlotId::new(1),
            },
            PurchaseError::InsufficientFunds,
        ),
        (
            Command::UpgradeEmplacement {
                slot: SlotId::new(3),
            },
            PurchaseError::NoEmplacement,
        ),
        (
            Command::UpgradeEmplacement {
                slot: SlotId::new(0),
            },
            PurchaseError::InsufficientFunds,
        ),
    ];

    for (command, expected) in cases {
        let events = apply(&mut world, command.clone());
        assert_eq!(rejection(&events), Some(expected), "{command:?}");
        assert_eq!(stats_of(&events).map(|stats| stats.currency), Some(10));
    }
}

#[test]
fn purchases_require_a_running_game() {
    let mut world = World::new();
    let events = apply(
        &mut world,
        Command::BuildEmplacement {
            slot: SlotId::new(0),
        },
    );
    assert_eq!(rejection(&events), Some(PurchaseError::NotRunning));
    assert_eq!(query::run_state(&world), RunState::Menu);
}

#[test]
fn upgrade_applies_after_its_presentation() {
    let mut world = running(500);
    let slot = SlotId::new(0);
    let _ = apply(&mut world, Command::BuildEmplacement { slot });

    let events = apply(&mut world, Command::UpgradeEmplacement { slot });
    assert_eq!(
        events.first(),
        Some(&Event::UpgradeStarted {
            slot,
            target: EmplacementLevel::Two,
        })
    );
    assert_eq!(stats_of(&events).map(|stats| stats.currency), Some(375));
    assert!(query::emplacements(&world)[0].upgrading);
    assert_eq!(query::emplacements(&world)[0].level, EmplacementLevel::One);

    let events = apply(&mut world, Command::UpgradeEmplacement { slot });
    assert_eq!(rejection(&events), Some(PurchaseError::UpgradePending));

    let events = apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(499),
        },
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::UpgradeCompleted { .. })));

    let events = apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(1),
        },
    );
    assert!(events.contains(&Event::UpgradeCompleted {
        slot,
        level: EmplacementLevel::Two,
    }));

    let range = query::attacker_view(&world)
        .get(wave_defence_core::Attacker::Emplacement(slot))
        .map(|snapshot| snapshot.range);
    assert_eq!(range, Some(EmplacementLevel::Two.stats().range));

    let _ = apply(&mut world, Command::UpgradeEmplacement { slot });
    let _ = apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
    );
    let events = apply(&mut world, Command::UpgradeEmplacement { slot });
    assert_eq!(rejection(&events), Some(PurchaseError::MaxLevel));
    assert_eq!(query::emplacements(&world)[0].level, EmplacementLevel::Three);
}
