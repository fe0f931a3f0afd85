//! Player-controlled avatar: movement, firing state and the hit/recover cycle.

use std::time::Duration;

use glam::Vec2;
use wave_defence_core::{Attacker, AttackerSnapshot, Cooldown, Direction};

use crate::config::ScreenConfig;

/// Travel speed in world units per second.
pub(crate) const AVATAR_SPEED: f32 = 200.0;
/// Targeting radius in world units.
pub(crate) const AVATAR_RANGE: f32 = 75.0;
/// Minimum time between shots.
pub(crate) const AVATAR_FIRE_INTERVAL: Duration = Duration::from_millis(1_000);
/// Damage carried by every avatar projectile.
pub(crate) const AVATAR_DAMAGE: u32 = 1;
/// Distance at which an agent touches the avatar.
pub(crate) const COLLISION_RADIUS: f32 = 24.0;
/// Length of the window after a hit during which collisions are ignored.
pub(crate) const INVULNERABILITY: Duration = Duration::from_millis(2_000);
/// Length of the attack animation played after each shot.
pub(crate) const ATTACK_ANIMATION: Duration = Duration::from_millis(300);

const INVULNERABLE_SPEED_FACTOR: f32 = 0.5;
const ATTACKING_SPEED_FACTOR: f32 = 0.75;

#[derive(Clone, Debug)]
pub(crate) struct Avatar {
    position: Vec2,
    cooldown: Cooldown,
    attacking_until: Option<Duration>,
    invulnerable_until: Option<Duration>,
}

impl Avatar {
    pub(crate) fn spawn(screen: &ScreenConfig) -> Self {
        Self {
            position: screen.centre(),
            cooldown: Cooldown::new(AVATAR_FIRE_INTERVAL),
            attacking_until: None,
            invulnerable_until: None,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn is_invulnerable(&self) -> bool {
        self.invulnerable_until.is_some()
    }

    pub(crate) fn is_attacking(&self, now: Duration) -> bool {
        self.attacking_until.is_some_and(|until| now < until)
    }

    pub(crate) fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Invulnerability takes precedence over the attack slowdown.
    pub(crate) fn speed_factor(&self, now: Duration) -> f32 {
        if self.is_invulnerable() {
            INVULNERABLE_SPEED_FACTOR
        } else if self.is_attacking(now) {
            ATTACKING_SPEED_FACTOR
        } else {
            1.0
        }
    }

    pub(crate) fn steer(
        &mut self,
        direction: Direction,
        dt: Duration,
        now: Duration,
        screen: &ScreenConfig,
    ) {
        let distance = AVATAR_SPEED * self.speed_factor(now) * dt.as_secs_f32();
        let moved = self.position + direction.unit() * distance;
        self.position = moved.clamp(screen.playable_min(), screen.playable_max());
    }

    pub(crate) fn record_shot(&mut self, now: Duration) {
        self.cooldown.record(now);
        self.attacking_until = Some(now.saturating_add(ATTACK_ANIMATION));
    }

    /// Starts the invulnerability window, returning when it expires.
    pub(crate) fn begin_invulnerability(&mut self, now: Duration) -> Duration {
        let until = now.saturating_add(INVULNERABILITY);
        self.invulnerable_until = Some(until);
        until
    }

    /// Clears invulnerability, reporting whether it was active.
    pub(crate) fn recover(&mut self) -> bool {
        self.invulnerable_until.take().is_some()
    }

    pub(crate) fn attacker_snapshot(&self, now: Duration) -> AttackerSnapshot {
        AttackerSnapshot {
            attacker: Attacker::Avatar,
            position: self.position,
            range: AVATAR_RANGE,
            ready_in: self.cooldown.ready_in(now),
        }
    }
}
