//! HUD: score/lives/special readouts, the boss health bar, transient centre
//! messages, and the hit-flash overlay.

use bevy::prelude::*;

use crate::boss::Boss;
use crate::config::GameConfig;
use crate::constants::{HIT_FLASH_SECS, HUD_FONT_SIZE, HUD_MESSAGE_SECS};
use crate::difficulty::difficulty_name;
use crate::effects::FlashState;
use crate::menu::GameState;
use crate::player::state::{PlayerLives, SpecialWeapon};
use crate::score::ScoreBoard;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Queue of transient centre-screen messages (level-ups, rewards, warnings).
#[derive(Resource, Debug, Default)]
pub struct HudMessages {
    entries: Vec<(String, f32)>,
}

impl HudMessages {
    /// Queue a message for the standard display duration.
    pub fn post(&mut self, text: String) {
        self.entries.push((text, HUD_MESSAGE_SECS));
    }

    /// Most recent live message, if any.
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(|(text, _)| text.as_str())
    }

    fn tick(&mut self, dt: f32) {
        for (_, remaining) in &mut self.entries {
            *remaining -= dt;
        }
        self.entries.retain(|(_, remaining)| *remaining > 0.0);
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

#[derive(Component)]
pub struct HudStatusDisplay;

#[derive(Component)]
pub struct HudLivesDisplay;

#[derive(Component)]
pub struct HudBossDisplay;

#[derive(Component)]
pub struct HudMessageDisplay;

#[derive(Component)]
pub struct FlashOverlay;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudMessages>()
            .add_systems(Startup, setup_hud)
            .add_systems(
                Update,
                (
                    hud_status_system,
                    hud_lives_system,
                    hud_boss_system,
                    hud_message_system,
                    flash_overlay_system,
                    hud_visibility_system,
                ),
            );
    }
}

/// Spawn the permanent HUD nodes.
fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Score: 0"),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.88, 0.45)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudStatusDisplay,
        Visibility::Hidden,
    ));

    commands.spawn((
        Text::new("Lives: 0"),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.4, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0 + HUD_FONT_SIZE + 6.0),
            ..default()
        },
        HudLivesDisplay,
        Visibility::Hidden,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.5, 0.1)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(25.0),
            top: Val::Px(8.0),
            ..default()
        },
        HudBossDisplay,
        Visibility::Hidden,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 1.0, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(30.0),
            top: Val::Percent(45.0),
            ..default()
        },
        HudMessageDisplay,
        Visibility::Hidden,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 0.0, 0.0, 0.0)),
        ZIndex(100),
        FlashOverlay,
    ));
}

/// Refresh the score/level/special readout.
fn hud_status_system(
    score: Res<ScoreBoard>,
    special: Res<SpecialWeapon>,
    config: Res<GameConfig>,
    mut query: Query<&mut Text, With<HudStatusDisplay>>,
) {
    if !(score.is_changed() || special.is_changed()) {
        return;
    }
    for mut text in query.iter_mut() {
        *text = Text::new(format!(
            "Score: {}  High: {}  Level {} ({})  Special: {}/{} [{}%]",
            score.score,
            score.high_score,
            score.level,
            difficulty_name(score.level),
            special.count,
            config.special_weapon_max_count,
            (special.charge * 100 / config.special_weapon_max_charge.max(1)).min(100),
        ));
    }
}

/// Refresh the lives readout, blinking while the warning timer runs.
fn hud_lives_system(
    time: Res<Time>,
    lives: Res<PlayerLives>,
    flash: Res<FlashState>,
    mut query: Query<(&mut Text, &mut TextColor), With<HudLivesDisplay>>,
) {
    for (mut text, mut color) in query.iter_mut() {
        *text = Text::new(format!("Lives: {}", lives.effective_lives()));

        let blink_on =
            flash.life_blink_secs > 0.0 && (time.elapsed_secs() * 8.0) as u32 % 2 == 0;
        *color = if blink_on {
            TextColor(Color::srgb(1.0, 1.0, 1.0))
        } else {
            TextColor(Color::srgb(0.95, 0.4, 0.4))
        };
    }
}

/// Show boss health and phase while one is alive.
fn hud_boss_system(q_boss: Query<&Boss>, mut query: Query<&mut Text, With<HudBossDisplay>>) {
    let line = match q_boss.single() {
        Ok(boss) => format!(
            "BOSS  {:.0}/{:.0}  phase {}",
            boss.health,
            boss.max_health,
            boss.phase + 1
        ),
        Err(_) => String::new(),
    };
    for mut text in query.iter_mut() {
        *text = Text::new(line.clone());
    }
}

/// Tick and display the transient centre message.
fn hud_message_system(
    time: Res<Time>,
    mut messages: ResMut<HudMessages>,
    mut query: Query<&mut Text, With<HudMessageDisplay>>,
) {
    messages.tick(time.delta_secs());
    let line = messages.current().unwrap_or("").to_string();
    for mut text in query.iter_mut() {
        *text = Text::new(line.clone());
    }
}

/// Drive the red overlay's alpha from the hit-flash timer.
fn flash_overlay_system(
    flash: Res<FlashState>,
    mut query: Query<&mut BackgroundColor, With<FlashOverlay>>,
) {
    let alpha = 0.3 * (flash.hit_flash_secs / HIT_FLASH_SECS).clamp(0.0, 1.0);
    for mut background in query.iter_mut() {
        *background = BackgroundColor(Color::srgba(1.0, 0.0, 0.0, alpha));
    }
}

/// HUD text is only visible during (and after) a round, not on the splash.
#[allow(clippy::type_complexity)]
fn hud_visibility_system(
    state: Res<State<GameState>>,
    mut query: Query<
        &mut Visibility,
        Or<(
            With<HudStatusDisplay>,
            With<HudLivesDisplay>,
            With<HudBossDisplay>,
            With<HudMessageDisplay>,
        )>,
    >,
) {
    if !state.is_changed() {
        return;
    }
    let visible = !matches!(state.get(), GameState::StartScreen);
    for mut visibility in query.iter_mut() {
        *visibility = if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire_after_their_duration() {
        let mut messages = HudMessages::default();
        messages.post("Level 2!".to_string());
        assert_eq!(messages.current(), Some("Level 2!"));

        messages.tick(HUD_MESSAGE_SECS - 0.1);
        assert!(messages.current().is_some());

        messages.tick(0.2);
        assert_eq!(messages.current(), None);
    }

    #[test]
    fn latest_message_wins_the_display_slot() {
        let mut messages = HudMessages::default();
        messages.post("first".to_string());
        messages.post("second".to_string());
        assert_eq!(messages.current(), Some("second"));
    }
}
