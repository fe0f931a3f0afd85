//! Authoritative emplacement state and the upgrade state machine.

use std::time::Duration;

use glam::Vec2;
use wave_defence_core::{
    Attacker, AttackerSnapshot, Cooldown, EmplacementLevel, EmplacementStats, PurchaseError,
    SlotId,
};

/// Stationary defender built at a slot.
#[derive(Clone, Debug)]
pub(crate) struct Emplacement {
    slot: SlotId,
    position: Vec2,
    level: EmplacementLevel,
    cooldown: Cooldown,
    pending_upgrade: Option<EmplacementLevel>,
}

impl Emplacement {
    pub(crate) fn build(slot: SlotId, position: Vec2) -> Self {
        let level = EmplacementLevel::One;
        Self {
            slot,
            position,
            level,
            cooldown: Cooldown::new(level.stats().fire_interval),
            pending_upgrade: None,
        }
    }

    pub(crate) fn slot(&self) -> SlotId {
        self.slot
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn level(&self) -> EmplacementLevel {
        self.level
    }

    /// Stats currently in effect; a pending upgrade does not apply yet.
    pub(crate) fn stats(&self) -> EmplacementStats {
        self.level.stats()
    }

    pub(crate) fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub(crate) fn record_shot(&mut self, now: Duration) {
        self.cooldown.record(now);
    }

    pub(crate) fn is_upgrading(&self) -> bool {
        self.pending_upgrade.is_some()
    }

    /// Level the next upgrade would reach, if one may start.
    pub(crate) fn next_level(&self) -> Result<EmplacementLevel, PurchaseError> {
        if self.pending_upgrade.is_some() {
            return Err(PurchaseError::UpgradePending);
        }
        self.level.next().ok_or(PurchaseError::MaxLevel)
    }

    pub(crate) fn begin_upgrade(&mut self, target: EmplacementLevel) {
        self.pending_upgrade = Some(target);
    }

    /// Applies the pending level, returning it when one was pending.
    pub(crate) fn complete_upgrade(&mut self) -> Option<EmplacementLevel> {
        let level = self.pending_upgrade.take()?;
        self.level = level;
        self.cooldown.set_interval(level.stats().fire_interval);
        Some(level)
    }

    pub(crate) fn attacker_snapshot(&self, now: Duration) -> AttackerSnapshot {
        AttackerSnapshot {
            attacker: Attacker::Emplacement(self.slot),
            position: self.position,
            range: self.stats().range,
            ready_in: self.cooldown.ready_in(now),
        }
    }
}

/// Emplacements in build order.
#[derive(Debug, Default)]
pub(crate) struct EmplacementRegistry {
    entries: Vec<Emplacement>,
}

impl EmplacementRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, slot: SlotId) -> bool {
        self.get(slot).is_some()
    }

    pub(crate) fn get(&self, slot: SlotId) -> Option<&Emplacement> {
        self.entries.iter().find(|entry| entry.slot == slot)
    }

    pub(crate) fn get_mut(&mut self, slot: SlotId) -> Option<&mut Emplacement> {
        self.entries.iter_mut().find(|entry| entry.slot == slot)
    }

    pub(crate) fn insert(&mut self, emplacement: Emplacement) {
        self.entries.push(emplacement);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Emplacement> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
