//! Named presentation cues raised in response to world events.

use wave_defence_core::{Attacker, EntityRef, Event, Presentation};

/// Sound played when an agent starts dying.
pub const AGENT_DEATH_SOUND: &str = "enemy-death";
/// Sound played when the avatar fires.
pub const AVATAR_SHOT_SOUND: &str = "player-shoot";
/// Sound played when the avatar is hit.
pub const AVATAR_HURT_SOUND: &str = "player-hurt";
/// Sound played when an emplacement fires.
pub const EMPLACEMENT_SHOT_SOUND: &str = "turret-shoot";
/// Sound played when an emplacement is built.
pub const EMPLACEMENT_BUILD_SOUND: &str = "turret-build";
/// Sound played when an emplacement upgrade is purchased.
pub const EMPLACEMENT_UPGRADE_SOUND: &str = "turret-upgrade";
/// Clip played on the avatar after each shot.
pub const AVATAR_ATTACK_CLIP: &str = "player-attack";
/// Clip played on an emplacement while its upgrade presents.
pub const EMPLACEMENT_UPGRADE_CLIP: &str = "emplacement-upgrade";

/// Forwards the clips and sounds an event calls for.
pub(crate) fn present(presentation: &mut dyn Presentation, event: &Event) {
    match event {
        Event::AgentHeadingChanged {
            agent,
            kind,
            heading,
        } => presentation.play_clip(EntityRef::Agent(*agent), &kind.walk_clip(*heading)),
        Event::AgentDying {
            agent,
            kind,
            heading,
        } => {
            presentation.play_clip(EntityRef::Agent(*agent), &kind.death_clip(*heading));
            presentation.play_sound(AGENT_DEATH_SOUND);
        }
        Event::ProjectileFired {
            attacker: Attacker::Avatar,
            ..
        } => {
            presentation.play_clip(EntityRef::Avatar, AVATAR_ATTACK_CLIP);
            presentation.play_sound(AVATAR_SHOT_SOUND);
        }
        Event::ProjectileFired {
            attacker: Attacker::Emplacement(_),
            ..
        } => presentation.play_sound(EMPLACEMENT_SHOT_SOUND),
        Event::EmplacementBuilt { .. } => presentation.play_sound(EMPLACEMENT_BUILD_SOUND),
        Event::UpgradeStarted { slot, .. } => {
            presentation.play_clip(EntityRef::Emplacement(*slot), EMPLACEMENT_UPGRADE_CLIP);
            presentation.play_sound(EMPLACEMENT_UPGRADE_SOUND);
        }
        Event::AvatarHit { .. } => presentation.play_sound(AVATAR_HURT_SOUND),
        _ => {}
    }
}
