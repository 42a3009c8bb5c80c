//! Combat resolution: every pairwise collision check and its side effects.
//!
//! Runs as a chained `PostUpdate` sequence after behaviour systems have
//! moved everything.  Each system keeps a processed-entity set so an entity
//! removed by one check is never referenced again in the same frame, and
//! hazards carry their own `has_collided` latch on top of that.  Player
//! damage funnels through the [`PlayerHit`] message so deduplication, the
//! shield power-up, life accounting, and the game-over transition all live
//! in one place.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::audio::{SoundCue, SoundRequest};
use crate::boss::{destroy_boss, Boss, BossBullet, BossDirector};
use crate::collision::{in_top_zone, overlaps, Aabb, Hitbox};
use crate::config::GameConfig;
use crate::constants::{HIT_FLASH_SECS, LIFE_WARNING_BLINK_SECS};
use crate::effects::{
    spawn_collision_pulse, spawn_explosion, ExplosionKind, FlashState,
};
use crate::enemy::{Enemy, EnemyBullet, EnemyHealth, HelicopterBullet, Shield};
use crate::formation::FormationMember;
use crate::hazard::{Bomb, Dynamite};
use crate::hud::HudMessages;
use crate::menu::GameState;
use crate::player::state::{EscortPlane, Player, PlayerBullet, PlayerLives, SpecialWeapon};
use crate::powerup::ActiveEffects;
use crate::schedule::ShotSchedule;
use crate::score::{award_points, ScoreBoard};

/// One resolved hit against the player (or the escort).
///
/// `token` deduplicates hits that several per-frame checks could report for
/// the same physical collision (hazards use their entity id).
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerHit {
    pub pos: Vec2,
    pub token: Option<u64>,
}

/// Dedup set for [`PlayerHit`] tokens; cleared on round reset.
#[derive(Resource, Debug, Default)]
pub struct ProcessedCollisions(pub HashSet<u64>);

/// Running count of broken helicopter shields, driving the life reward.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ShieldedKills(pub u32);

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProcessedCollisions>()
            .init_resource::<ShieldedKills>()
            .add_message::<PlayerHit>()
            .add_systems(
                PostUpdate,
                (
                    player_bullet_hit_system,
                    bullet_neutralise_system,
                    player_bullet_vs_hazard_system,
                    enemy_projectile_vs_player_system,
                    hazard_vs_player_system,
                    enemy_body_collision_system,
                    player_hit_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Player bullets vs hostile hulls ───────────────────────────────────────────

/// Player bullets against the boss, enemies, and formation members.
///
/// Shielded helicopters absorb hits into the shield first; the boss takes
/// flat per-bullet damage or dies instantly to a special-weapon bullet;
/// everything else loses hull points and pays out score on destruction.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn player_bullet_hit_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut score: ResMut<ScoreBoard>,
    mut special: ResMut<SpecialWeapon>,
    mut lives: ResMut<PlayerLives>,
    mut shield_kills: ResMut<ShieldedKills>,
    mut director: ResMut<BossDirector>,
    mut schedule: ResMut<ShotSchedule>,
    mut messages: ResMut<HudMessages>,
    q_bullets: Query<(Entity, &Transform, &Hitbox, &PlayerBullet)>,
    mut q_boss: Query<(Entity, &Transform, &Hitbox, &mut Boss)>,
    mut q_enemies: Query<
        (
            Entity,
            &Transform,
            &Hitbox,
            &Enemy,
            &mut EnemyHealth,
            Option<&mut Shield>,
        ),
        Without<FormationMember>,
    >,
    mut q_members: Query<
        (Entity, &Transform, &Hitbox, &mut EnemyHealth),
        (With<FormationMember>, Without<Enemy>),
    >,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let arena_top = config.arena_top();
    let mut used_bullets: HashSet<Entity> = HashSet::new();
    let mut dead_hulls: HashSet<Entity> = HashSet::new();

    for (bullet_entity, bullet_transform, bullet_hitbox, bullet) in q_bullets.iter() {
        let bullet_rect = Aabb::of(bullet_transform, bullet_hitbox);
        let bullet_pos = bullet_rect.center;

        // Boss first: it shares the frame with regular enemies.
        if let Ok((boss_entity, boss_transform, boss_hitbox, mut boss)) = q_boss.single_mut() {
            if !dead_hulls.contains(&boss_entity)
                && !used_bullets.contains(&bullet_entity)
                && overlaps(&bullet_rect, &Aabb::of(boss_transform, boss_hitbox), arena_top)
            {
                used_bullets.insert(bullet_entity);
                commands.entity(bullet_entity).despawn();

                let boss_pos = boss_transform.translation.truncate();
                if bullet.special {
                    dead_hulls.insert(boss_entity);
                    destroy_boss(
                        &mut commands,
                        boss_entity,
                        boss_pos,
                        &config,
                        &mut director,
                        &mut schedule,
                        &mut score,
                        &mut special,
                        &mut lives,
                        &mut messages,
                        true,
                    );
                    continue;
                }

                boss.health = (boss.health - config.boss_bullet_damage).max(0.0);
                boss.being_hit = true;
                boss.secs_since_hit = 0.0;
                spawn_explosion(&mut commands, bullet_pos, ExplosionKind::Normal, arena_top);
                sounds.write(SoundRequest::new(SoundCue::Collision));
                sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.5));

                if boss.health <= 0.0 {
                    dead_hulls.insert(boss_entity);
                    destroy_boss(
                        &mut commands,
                        boss_entity,
                        boss_pos,
                        &config,
                        &mut director,
                        &mut schedule,
                        &mut score,
                        &mut special,
                        &mut lives,
                        &mut messages,
                        false,
                    );
                }
                continue;
            }
        }

        for (enemy_entity, enemy_transform, enemy_hitbox, enemy, mut health, shield) in
            q_enemies.iter_mut()
        {
            if used_bullets.contains(&bullet_entity) {
                break;
            }
            if dead_hulls.contains(&enemy_entity) {
                continue;
            }
            let enemy_rect = Aabb::of(enemy_transform, enemy_hitbox);
            if !overlaps(&bullet_rect, &enemy_rect, arena_top) {
                continue;
            }

            used_bullets.insert(bullet_entity);
            commands.entity(bullet_entity).despawn();

            // Shield absorbs the hit before the hull can be touched.
            if let Some(mut shield) = shield {
                if shield.active {
                    let broke = shield.absorb_hit();
                    spawn_explosion(&mut commands, bullet_pos, ExplosionKind::Normal, arena_top);

                    if broke {
                        shield_kills.0 += 1;
                        spawn_explosion(
                            &mut commands,
                            enemy_rect.center,
                            ExplosionKind::ShieldBreak,
                            arena_top,
                        );
                        sounds.write(SoundRequest::new(SoundCue::Explosion));
                        sounds.write(SoundRequest::new(SoundCue::Collision));

                        let cadence = config.shield_kill_life_reward_every.max(1);
                        if shield_kills.0 % cadence == 0 {
                            lives.grant_life();
                            messages.post("+1 life!".to_string());
                            sounds.write(SoundRequest::new(SoundCue::LevelUp));
                        }
                    } else {
                        sounds.write(SoundRequest::new(SoundCue::Collision));
                        sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.4));
                    }
                    break;
                }
            }

            // Hull damage: one hit per 100 damage points (double damage = 2).
            health.hp -= bullet.damage / 100.0;
            if health.hp > 0.0 {
                spawn_explosion(&mut commands, bullet_pos, ExplosionKind::Normal, arena_top);
                sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.4));
                break;
            }

            dead_hulls.insert(enemy_entity);
            commands.entity(enemy_entity).despawn();

            if enemy.kind.is_helicopter() {
                spawn_explosion(&mut commands, enemy_rect.center, ExplosionKind::Final, arena_top);
                for i in 0..8 {
                    let angle = std::f32::consts::TAU * i as f32 / 8.0;
                    spawn_explosion(
                        &mut commands,
                        enemy_rect.center + Vec2::new(angle.cos(), angle.sin()) * 50.0,
                        ExplosionKind::Normal,
                        arena_top,
                    );
                }
                sounds.write(SoundRequest::new(SoundCue::Explosion));
            } else {
                spawn_explosion(&mut commands, enemy_rect.center, ExplosionKind::Normal, arena_top);
                sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.4));
            }

            award_points(&mut score, &mut special, &config, enemy.score_value);
            break;
        }

        if used_bullets.contains(&bullet_entity) {
            continue;
        }

        for (member_entity, member_transform, member_hitbox, mut health) in q_members.iter_mut() {
            if dead_hulls.contains(&member_entity) {
                continue;
            }
            let member_rect = Aabb::of(member_transform, member_hitbox);
            if !overlaps(&bullet_rect, &member_rect, arena_top) {
                continue;
            }

            used_bullets.insert(bullet_entity);
            commands.entity(bullet_entity).despawn();

            health.hp -= 1.0;
            if health.hp <= 0.0 {
                dead_hulls.insert(member_entity);
                commands.entity(member_entity).despawn();
                spawn_explosion(&mut commands, member_rect.center, ExplosionKind::Normal, arena_top);
                award_points(&mut score, &mut special, &config, FormationMember::SCORE);
                sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.4));
            }
            break;
        }
    }
}

// ── Bullet-on-bullet neutralisation ───────────────────────────────────────────

/// A normal player bullet meeting a hostile bullet cancels both with a pulse
/// effect and no score.
#[allow(clippy::type_complexity)]
pub fn bullet_neutralise_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_player_bullets: Query<(Entity, &Transform, &Hitbox, &PlayerBullet)>,
    q_hostile: Query<
        (Entity, &Transform, &Hitbox),
        Or<(With<HelicopterBullet>, With<EnemyBullet>)>,
    >,
) {
    let arena_top = config.arena_top();
    let mut used: HashSet<Entity> = HashSet::new();

    for (bullet_entity, bullet_transform, bullet_hitbox, bullet) in q_player_bullets.iter() {
        if bullet.special {
            continue;
        }
        if used.contains(&bullet_entity) {
            continue;
        }
        let bullet_rect = Aabb::of(bullet_transform, bullet_hitbox);

        for (hostile_entity, hostile_transform, hostile_hitbox) in q_hostile.iter() {
            if used.contains(&hostile_entity) {
                continue;
            }
            let hostile_rect = Aabb::of(hostile_transform, hostile_hitbox);
            if !overlaps(&bullet_rect, &hostile_rect, arena_top) {
                continue;
            }

            used.insert(bullet_entity);
            used.insert(hostile_entity);
            commands.entity(bullet_entity).despawn();
            commands.entity(hostile_entity).despawn();
            spawn_collision_pulse(&mut commands, hostile_rect.center);
            break;
        }
    }
}

// ── Player bullets vs hazards ─────────────────────────────────────────────────

/// Shooting a bomb or dynamite detonates it harmlessly (no score, the bullet
/// flies on).
#[allow(clippy::type_complexity)]
pub fn player_bullet_vs_hazard_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_bullets: Query<(&Transform, &Hitbox), With<PlayerBullet>>,
    q_hazards: Query<(Entity, &Transform, &Hitbox), Or<(With<Bomb>, With<Dynamite>)>>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let arena_top = config.arena_top();
    let mut detonated: HashSet<Entity> = HashSet::new();

    for (bullet_transform, bullet_hitbox) in q_bullets.iter() {
        let bullet_rect = Aabb::of(bullet_transform, bullet_hitbox);

        for (hazard_entity, hazard_transform, hazard_hitbox) in q_hazards.iter() {
            if detonated.contains(&hazard_entity) {
                continue;
            }
            let hazard_rect = Aabb::of(hazard_transform, hazard_hitbox);
            if !overlaps(&bullet_rect, &hazard_rect, arena_top) {
                continue;
            }

            detonated.insert(hazard_entity);
            commands.entity(hazard_entity).despawn();
            spawn_explosion(&mut commands, hazard_rect.center, ExplosionKind::Final, arena_top);
            sounds.write(SoundRequest::new(SoundCue::Collision));
        }
    }
}

// ── Hostile projectiles vs the player ─────────────────────────────────────────

/// Enemy, helicopter, and boss bullets striking the player or the escort.
#[allow(clippy::type_complexity)]
pub fn enemy_projectile_vs_player_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_planes: Query<(&Transform, &Hitbox), Or<(With<Player>, With<EscortPlane>)>>,
    q_projectiles: Query<
        (Entity, &Transform, &Hitbox),
        Or<(With<EnemyBullet>, With<HelicopterBullet>, With<BossBullet>)>,
    >,
    mut hits: MessageWriter<PlayerHit>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let arena_top = config.arena_top();
    let mut used: HashSet<Entity> = HashSet::new();

    for (target_transform, target_hitbox) in q_planes.iter() {
        let target_rect = Aabb::of(target_transform, target_hitbox);

        for (projectile_entity, projectile_transform, projectile_hitbox) in q_projectiles.iter() {
            if used.contains(&projectile_entity) {
                continue;
            }
            let projectile_rect = Aabb::of(projectile_transform, projectile_hitbox);
            if !overlaps(&target_rect, &projectile_rect, arena_top) {
                continue;
            }

            used.insert(projectile_entity);
            commands.entity(projectile_entity).despawn();
            spawn_explosion(
                &mut commands,
                projectile_rect.center,
                ExplosionKind::Normal,
                arena_top,
            );
            hits.write(PlayerHit {
                pos: projectile_rect.center,
                token: None,
            });
            sounds.write(SoundRequest::with_volume(SoundCue::Shoot, 0.5));
        }
    }
}

/// Bombs and dynamite striking the player.  The hazard's `has_collided`
/// latch plus the hit token keep one blast from costing two lives.
#[allow(clippy::type_complexity)]
pub fn hazard_vs_player_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_planes: Query<(&Transform, &Hitbox), Or<(With<Player>, With<EscortPlane>)>>,
    mut q_bombs: Query<(Entity, &Transform, &Hitbox, &mut Bomb)>,
    mut q_dynamites: Query<(Entity, &Transform, &Hitbox, &mut Dynamite)>,
    mut hits: MessageWriter<PlayerHit>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let arena_top = config.arena_top();

    for (target_transform, target_hitbox) in q_planes.iter() {
        let target_rect = Aabb::of(target_transform, target_hitbox);

        for (entity, transform, hitbox, mut bomb) in q_bombs.iter_mut() {
            if bomb.has_collided {
                continue;
            }
            let rect = Aabb::of(transform, hitbox);
            if !overlaps(&target_rect, &rect, arena_top) {
                continue;
            }
            bomb.has_collided = true;
            commands.entity(entity).despawn();
            spawn_explosion(&mut commands, rect.center, ExplosionKind::Final, arena_top);
            hits.write(PlayerHit {
                pos: rect.center,
                token: Some(entity.to_bits()),
            });
            sounds.write(SoundRequest::new(SoundCue::Explosion));
        }

        for (entity, transform, hitbox, mut dynamite) in q_dynamites.iter_mut() {
            if dynamite.has_collided {
                continue;
            }
            let rect = Aabb::of(transform, hitbox);
            if !overlaps(&target_rect, &rect, arena_top) {
                continue;
            }
            dynamite.has_collided = true;
            commands.entity(entity).despawn();
            spawn_explosion(&mut commands, rect.center, ExplosionKind::Final, arena_top);
            hits.write(PlayerHit {
                pos: rect.center,
                token: Some(entity.to_bits()),
            });
            sounds.write(SoundRequest::new(SoundCue::Explosion));
        }
    }
}

/// Ramming: enemy or formation-member hulls touching the player or escort.
#[allow(clippy::type_complexity)]
pub fn enemy_body_collision_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_planes: Query<(&Transform, &Hitbox), Or<(With<Player>, With<EscortPlane>)>>,
    q_hulls: Query<
        (Entity, &Transform, &Hitbox),
        (Or<(With<Enemy>, With<FormationMember>)>, Without<Boss>),
    >,
    mut hits: MessageWriter<PlayerHit>,
) {
    let arena_top = config.arena_top();
    let mut rammed: HashSet<Entity> = HashSet::new();

    for (target_transform, target_hitbox) in q_planes.iter() {
        let target_rect = Aabb::of(target_transform, target_hitbox);

        for (hull_entity, hull_transform, hull_hitbox) in q_hulls.iter() {
            if rammed.contains(&hull_entity) {
                continue;
            }
            let hull_rect = Aabb::of(hull_transform, hull_hitbox);
            if !overlaps(&target_rect, &hull_rect, arena_top) {
                continue;
            }

            rammed.insert(hull_entity);
            commands.entity(hull_entity).despawn();
            spawn_explosion(&mut commands, hull_rect.center, ExplosionKind::Normal, arena_top);
            hits.write(PlayerHit {
                pos: hull_rect.center,
                token: None,
            });
        }
    }
}

// ── The hit pipeline ──────────────────────────────────────────────────────────

/// Apply queued [`PlayerHit`] messages: dedup, shield power-up, life loss,
/// screen feedback, and the game-over transition.
#[allow(clippy::too_many_arguments)]
pub fn player_hit_system(
    config: Res<GameConfig>,
    mut hit_messages: MessageReader<PlayerHit>,
    mut processed: ResMut<ProcessedCollisions>,
    mut effects: ResMut<ActiveEffects>,
    mut lives: ResMut<PlayerLives>,
    mut flash: ResMut<FlashState>,
    q_player: Query<(&Transform, &Hitbox), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sounds: MessageWriter<SoundRequest>,
) {
    let arena_top = config.arena_top();

    for hit in hit_messages.read() {
        if let Some(token) = hit.token {
            if !processed.0.insert(token) {
                continue;
            }
        }

        // The spawn strip is a no-damage zone for the player as well.
        if let Ok((transform, hitbox)) = q_player.single() {
            if in_top_zone(&Aabb::of(transform, hitbox), arena_top) {
                continue;
            }
        }

        if effects.consume_shield() {
            continue;
        }

        let game_over = lives.register_hit();
        flash.hit_flash_secs = HIT_FLASH_SECS;
        flash.life_blink_secs = LIFE_WARNING_BLINK_SECS;
        sounds.write(SoundRequest::new(SoundCue::Warning));

        if game_over {
            next_state.set(GameState::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Explosion;
    use crate::enemy::EnemyKind;
    use crate::player::combat::special_weapon_system;
    use crate::player::state::FireControl;
    use bevy::state::app::StatesPlugin;

    fn combat_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_state(GameState::Playing);
        app.add_message::<PlayerHit>();
        app.add_message::<SoundRequest>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(ScoreBoard::default());
        app.insert_resource(SpecialWeapon::default());
        app.insert_resource(PlayerLives::default());
        app.insert_resource(ShieldedKills::default());
        app.insert_resource(ProcessedCollisions::default());
        app.insert_resource(ActiveEffects::default());
        app.insert_resource(FlashState::default());
        app.insert_resource(FireControl::default());
        app.insert_resource(BossDirector::default());
        app.insert_resource(ShotSchedule::default());
        app.insert_resource(HudMessages::default());
        app
    }

    fn spawn_plane_enemy(app: &mut App, pos: Vec2, hp: f32) -> Entity {
        app.world_mut()
            .spawn((
                Enemy {
                    kind: EnemyKind::Plane,
                    speed: 120.0,
                    score_value: 10,
                    elite: false,
                },
                EnemyHealth { hp },
                Hitbox::square(72.0),
                Transform::from_translation(pos.extend(0.0)),
            ))
            .id()
    }

    fn spawn_shielded_helicopter(app: &mut App, pos: Vec2, shield_hp: u32) -> Entity {
        app.world_mut()
            .spawn((
                Enemy {
                    kind: EnemyKind::Helicopter,
                    speed: 100.0,
                    score_value: 150,
                    elite: false,
                },
                EnemyHealth { hp: 3.0 },
                Shield::new(shield_hp, 50.0),
                Hitbox::square(48.0),
                Transform::from_translation(pos.extend(0.0)),
            ))
            .id()
    }

    fn spawn_player_bullet(app: &mut App, pos: Vec2, special: bool) -> Entity {
        app.world_mut()
            .spawn((
                PlayerBullet {
                    damage: 100.0,
                    special,
                    life_secs: None,
                },
                Hitbox::new(4.5, 9.0),
                Transform::from_translation(pos.extend(0.0)),
            ))
            .id()
    }

    fn explosion_count(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, With<Explosion>>()
            .iter(world)
            .count()
    }

    #[test]
    fn bullet_destroys_unit_health_plane_for_ten_points() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_bullet_hit_system);

        let enemy = spawn_plane_enemy(&mut app, Vec2::ZERO, 1.0);
        let bullet = spawn_player_bullet(&mut app, Vec2::ZERO, false);

        app.update();

        assert!(app.world().get_entity(enemy).is_err(), "enemy must despawn");
        assert!(app.world().get_entity(bullet).is_err(), "bullet is consumed");
        assert!(explosion_count(app.world_mut()) >= 1);
        assert_eq!(app.world().resource::<ScoreBoard>().score, 10);
    }

    #[test]
    fn shield_takes_exactly_eight_hits_before_the_hull_opens() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_bullet_hit_system);

        let heli = spawn_shielded_helicopter(&mut app, Vec2::ZERO, 8);

        for hit in 1..=8 {
            spawn_player_bullet(&mut app, Vec2::ZERO, false);
            app.update();

            let shield = app.world().get::<Shield>(heli).unwrap();
            let health = app.world().get::<EnemyHealth>(heli).unwrap();
            assert_eq!(shield.hp, 8 - hit);
            assert_eq!(shield.active, hit < 8, "shield breaks on the 8th hit only");
            assert_eq!(health.hp, 3.0, "hull untouched while the shield holds");
        }

        assert_eq!(app.world().resource::<ShieldedKills>().0, 1);
        assert_eq!(app.world().resource::<ScoreBoard>().score, 0);

        // With the shield down, hits now reach the hull.
        spawn_player_bullet(&mut app, Vec2::ZERO, false);
        app.update();
        assert_eq!(app.world().get::<EnemyHealth>(heli).unwrap().hp, 2.0);
    }

    #[test]
    fn shield_break_grants_a_life_at_the_default_cadence() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_bullet_hit_system);

        let before = app.world().resource::<PlayerLives>().max_lives;
        spawn_shielded_helicopter(&mut app, Vec2::ZERO, 1);
        spawn_player_bullet(&mut app, Vec2::ZERO, false);
        app.update();

        assert_eq!(app.world().resource::<PlayerLives>().max_lives, before + 1);
    }

    #[test]
    fn final_collision_triggers_game_over_on_the_same_step() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_hit_system);

        {
            let mut lives = app.world_mut().resource_mut::<PlayerLives>();
            lives.collision_count = lives.max_lives - 1;
        }

        app.world_mut().write_message(PlayerHit {
            pos: Vec2::ZERO,
            token: None,
        });
        app.update();

        let lives = app.world().resource::<PlayerLives>();
        assert_eq!(lives.collision_count, lives.max_lives);
        assert_eq!(lives.effective_lives(), 0);

        app.update(); // let the state transition apply
        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::GameOver
        );
    }

    #[test]
    fn shield_powerup_absorbs_one_hit_without_counting_it() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_hit_system);

        app.world_mut().resource_mut::<ActiveEffects>().shield = true;
        app.world_mut()
            .resource_mut::<ActiveEffects>()
            .shield_secs = 10.0;

        app.world_mut().write_message(PlayerHit {
            pos: Vec2::ZERO,
            token: None,
        });
        app.update();

        let lives = app.world().resource::<PlayerLives>();
        assert_eq!(lives.collision_count, 0);
        assert!(!app.world().resource::<ActiveEffects>().shield);

        // The next hit counts normally.
        app.world_mut().write_message(PlayerHit {
            pos: Vec2::ZERO,
            token: None,
        });
        app.update();
        assert_eq!(app.world().resource::<PlayerLives>().collision_count, 1);
    }

    #[test]
    fn duplicate_hit_tokens_cost_only_one_life() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_hit_system);

        for _ in 0..3 {
            app.world_mut().write_message(PlayerHit {
                pos: Vec2::ZERO,
                token: Some(42),
            });
        }
        app.update();

        assert_eq!(app.world().resource::<PlayerLives>().collision_count, 1);
    }

    #[test]
    fn special_ring_fires_seventy_two_bullets_and_empties_the_bank() {
        let mut app = combat_test_app();
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.add_systems(Update, special_weapon_system);

        app.world_mut().spawn((
            Player,
            Hitbox::square(54.0),
            Transform::from_translation(Vec3::new(0.0, -300.0, 0.0)),
        ));
        app.world_mut().resource_mut::<SpecialWeapon>().count = 1;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyB);

        app.update();

        let bullets = app
            .world_mut()
            .query_filtered::<&PlayerBullet, ()>()
            .iter(app.world())
            .filter(|b| b.special)
            .count();
        assert_eq!(bullets, 72);
        assert_eq!(app.world().resource::<SpecialWeapon>().count, 0);
    }

    #[test]
    fn special_ring_doubles_with_an_escort_plane() {
        let mut app = combat_test_app();
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.add_systems(Update, special_weapon_system);

        app.world_mut().spawn((
            Player,
            Hitbox::square(54.0),
            Transform::from_translation(Vec3::new(0.0, -300.0, 0.0)),
        ));
        app.world_mut().spawn((
            EscortPlane::default(),
            Hitbox::square(54.0),
            Transform::from_translation(Vec3::new(-60.0, -300.0, 0.0)),
        ));
        app.world_mut().resource_mut::<SpecialWeapon>().count = 1;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyB);

        app.update();

        let bullets = app
            .world_mut()
            .query_filtered::<&PlayerBullet, ()>()
            .iter(app.world())
            .count();
        assert_eq!(bullets, 144);
    }

    #[test]
    fn player_bullet_neutralises_helicopter_bullet_without_score() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, bullet_neutralise_system);

        let bullet = spawn_player_bullet(&mut app, Vec2::ZERO, false);
        let hostile = app
            .world_mut()
            .spawn((
                HelicopterBullet,
                Hitbox::new(36.0, 8.0),
                Transform::from_translation(Vec3::ZERO),
            ))
            .id();

        app.update();

        assert!(app.world().get_entity(bullet).is_err());
        assert!(app.world().get_entity(hostile).is_err());
        assert_eq!(app.world().resource::<ScoreBoard>().score, 0);

        let pulses = app
            .world_mut()
            .query_filtered::<Entity, With<crate::effects::CollisionPulse>>()
            .iter(app.world())
            .count();
        assert_eq!(pulses, 1);
    }

    #[test]
    fn boss_takes_flat_damage_and_dies_to_the_special_weapon() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_bullet_hit_system);

        let config = GameConfig::default();
        let boss = app
            .world_mut()
            .spawn((
                Boss {
                    health: config.boss_health,
                    max_health: config.boss_health,
                    phase: 0,
                    speed: config.boss_speed,
                    bullet_speed: config.boss_bullet_speed,
                    pattern_running: false,
                    hover_y: 0.0,
                    wander_target: Vec2::ZERO,
                    jitter_t: 0.0,
                    being_hit: false,
                    secs_since_hit: 0.0,
                    time_under_fire: 0.0,
                    exit_dir: None,
                },
                Hitbox::square(68.0),
                Transform::from_translation(Vec3::ZERO),
            ))
            .id();

        spawn_player_bullet(&mut app, Vec2::ZERO, false);
        app.update();
        let health = app.world().get::<Boss>(boss).unwrap().health;
        assert_eq!(health, config.boss_health - config.boss_bullet_damage);

        let lives_before = app.world().resource::<PlayerLives>().max_lives;
        spawn_player_bullet(&mut app, Vec2::ZERO, true);
        app.update();

        assert!(app.world().get_entity(boss).is_err(), "special is an instant kill");
        assert_eq!(
            app.world().resource::<ScoreBoard>().score,
            config.boss_bonus_score
        );
        assert_eq!(
            app.world().resource::<PlayerLives>().max_lives,
            lives_before + 1
        );
    }

    #[test]
    fn collisions_in_the_top_zone_are_suppressed() {
        let mut app = combat_test_app();
        app.add_systems(PostUpdate, player_bullet_hit_system);

        let config = GameConfig::default();
        let top_y = config.arena_top() - 5.0;
        let enemy = spawn_plane_enemy(&mut app, Vec2::new(0.0, top_y), 1.0);
        let bullet = spawn_player_bullet(&mut app, Vec2::new(0.0, top_y), false);

        app.update();

        assert!(app.world().get_entity(enemy).is_ok(), "top zone protects spawns");
        assert!(app.world().get_entity(bullet).is_ok());
        assert_eq!(app.world().resource::<ScoreBoard>().score, 0);
    }
}
