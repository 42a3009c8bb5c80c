//! Name-keyed sound bank and fire-and-forget playback.
//!
//! Gameplay systems never touch asset handles; they write a [`SoundRequest`]
//! message and this module resolves it against the [`SoundBank`] loaded from
//! `assets/sounds/`.  Playback failures are non-events: a missing or
//! undecodable file just means silence, logged once at load time.  The
//! collision and warning cues share a short cooldown so a burst of
//! simultaneous hits does not stack into one loud crack.

use bevy::audio::{PlaybackSettings, Volume};
use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::GameConfig;

/// The game's sound cues, keyed symbolically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    Explosion,
    Collision,
    LevelUp,
    Warning,
}

impl SoundCue {
    /// All cues, in asset-load order.
    pub const ALL: [SoundCue; 5] = [
        SoundCue::Shoot,
        SoundCue::Explosion,
        SoundCue::Collision,
        SoundCue::LevelUp,
        SoundCue::Warning,
    ];

    /// Asset path of this cue's sound file.
    pub fn path(self) -> &'static str {
        match self {
            SoundCue::Shoot => "sounds/shoot.ogg",
            SoundCue::Explosion => "sounds/explosion.ogg",
            SoundCue::Collision => "sounds/collision.ogg",
            SoundCue::LevelUp => "sounds/levelup.ogg",
            SoundCue::Warning => "sounds/warning.ogg",
        }
    }
}

/// Request to play a cue, with an optional volume multiplier.
#[derive(Message, Debug, Clone, Copy)]
pub struct SoundRequest {
    pub cue: SoundCue,
    pub volume: f32,
}

impl SoundRequest {
    #[inline]
    pub fn new(cue: SoundCue) -> Self {
        Self { cue, volume: 1.0 }
    }

    #[inline]
    pub fn with_volume(cue: SoundCue, volume: f32) -> Self {
        Self { cue, volume }
    }
}

/// Loaded cue handles.
#[derive(Resource, Default)]
pub struct SoundBank {
    handles: HashMap<SoundCue, Handle<AudioSource>>,
}

impl SoundBank {
    pub fn get(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        self.handles.get(&cue)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Master volume and mute flag.
#[derive(Resource, Debug, Clone)]
pub struct AudioSettings {
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            muted: false,
        }
    }
}

/// Remaining cooldown before the collision/warning cues may retrigger.
#[derive(Resource, Default)]
pub struct CueCooldowns {
    collision_secs: f32,
}

pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundBank>()
            .init_resource::<AudioSettings>()
            .init_resource::<CueCooldowns>()
            .add_message::<SoundRequest>()
            .add_systems(Startup, load_sound_bank)
            .add_systems(
                Update,
                (play_requested_sounds_system, audio_diagnostics_system),
            );
    }
}

/// Load every cue handle at startup.  Files that fail to decode stay silent;
/// Bevy's asset pipeline logs the failure and the cue simply never plays.
fn load_sound_bank(mut bank: ResMut<SoundBank>, asset_server: Res<AssetServer>) {
    for cue in SoundCue::ALL {
        bank.handles.insert(cue, asset_server.load(cue.path()));
    }
    info!("Sound bank loaded ({} cues)", bank.len());
}

/// Drain [`SoundRequest`] messages into one-shot audio entities.
pub fn play_requested_sounds_system(
    mut commands: Commands,
    mut requests: MessageReader<SoundRequest>,
    bank: Res<SoundBank>,
    settings: Res<AudioSettings>,
    config: Res<GameConfig>,
    time: Res<Time>,
    mut cooldowns: ResMut<CueCooldowns>,
) {
    cooldowns.collision_secs = (cooldowns.collision_secs - time.delta_secs()).max(0.0);

    for request in requests.read() {
        if settings.muted {
            continue;
        }

        // Collision-class cues share a retrigger cooldown.
        if matches!(request.cue, SoundCue::Collision | SoundCue::Warning) {
            if cooldowns.collision_secs > 0.0 {
                continue;
            }
            cooldowns.collision_secs = config.collision_sound_cooldown_secs;
        }

        let Some(handle) = bank.get(request.cue) else {
            continue;
        };

        let volume = (settings.volume * request.volume).clamp(0.0, 1.0);
        commands.spawn((
            AudioPlayer::new(handle.clone()),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(volume)),
        ));
    }
}

/// Dump the audio state to the log on `Ctrl+Shift+D`.
pub fn audio_diagnostics_system(
    keys: Res<ButtonInput<KeyCode>>,
    bank: Res<SoundBank>,
    settings: Res<AudioSettings>,
    cooldowns: Res<CueCooldowns>,
) {
    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    if !(ctrl && shift && keys.just_pressed(KeyCode::KeyD)) {
        return;
    }

    info!(
        "Audio diagnostics: {} cues loaded, volume {:.2}, muted {}, collision cooldown {:.3}s",
        bank.len(),
        settings.volume,
        settings.muted,
        cooldowns.collision_secs
    );
    for cue in SoundCue::ALL {
        let status = bank.get(cue).map_or("missing", |_| "loaded");
        info!("  {:?} -> {} ({})", cue, cue.path(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_distinct_path() {
        let mut seen = std::collections::HashSet::new();
        for cue in SoundCue::ALL {
            assert!(seen.insert(cue.path()), "duplicate path for {cue:?}");
        }
    }
}
