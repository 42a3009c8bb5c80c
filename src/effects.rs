//! Transient visual effects: explosions, particle bursts, neutralisation
//! pulses, and the screen-flash timers.
//!
//! ## Design
//!
//! Effects are lightweight ECS entities.  Spawn helpers take only
//! `&mut Commands`, so combat code can create effects without touching
//! `Assets`; the mesh/material pair is attached one frame later by an
//! `Added<T>` system, which is imperceptible at 60 Hz.  A single shared
//! circle mesh is created at plugin startup to avoid per-effect mesh
//! allocation; each effect receives its own `ColorMaterial` so alpha can be
//! faded individually.
//!
//! Explosions inside the top effect zone are suppressed at the spawn helper,
//! matching the collision rule for that strip.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

use crate::constants::{
    EXPLOSION_FINAL_GROWTH_SPEED, EXPLOSION_FINAL_MAX_RADIUS, EXPLOSION_GROWTH_SPEED,
    EXPLOSION_MAX_RADIUS, EXPLOSION_PARTICLE_COUNT, EXPLOSION_SHIELD_BREAK_RADIUS, TOP_EFFECT_ZONE,
};
use crate::menu::GameState;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Shared unit-circle mesh used by all effect entities (created at startup).
#[derive(Resource)]
pub struct EffectMesh(pub Handle<Mesh>);

/// Screen-feedback timers driven by player hits; read by the HUD overlay.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FlashState {
    /// Remaining red full-screen flash (s).
    pub hit_flash_secs: f32,
    /// Remaining low-life warning blink (s).
    pub life_blink_secs: f32,
}

// ── Components ────────────────────────────────────────────────────────────────

/// Explosion size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Small pop: bullet impacts, shield hits.
    Normal,
    /// Large blast with a particle burst: destroyed hulls, hazards.
    Final,
    /// Mid-size blast for a collapsing helicopter shield.
    ShieldBreak,
}

/// Expanding ring effect.  Radius grows by `growth` per second until
/// `max_radius`, fading out along the way.
#[derive(Component, Debug)]
pub struct Explosion {
    pub radius: f32,
    pub max_radius: f32,
    pub growth: f32,
    pub kind: ExplosionKind,
    material: Option<Handle<ColorMaterial>>,
}

/// Short-lived spark from a final explosion's radial burst.
#[derive(Component)]
pub struct Particle {
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    material: Option<Handle<ColorMaterial>>,
}

/// Pulse ring marking a bullet-vs-bullet neutralisation.
#[derive(Component)]
pub struct CollisionPulse {
    pub age: f32,
    pub lifetime: f32,
    material: Option<Handle<ColorMaterial>>,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlashState>()
            .add_systems(Startup, init_effect_mesh)
            .add_systems(
                Update,
                (
                    attach_effect_mesh_system,
                    explosion_update_system,
                    particle_update_system,
                    collision_pulse_update_system,
                    flash_tick_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Create the shared unit circle mesh.
fn init_effect_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(1.0, 16));
    commands.insert_resource(EffectMesh(handle));
}

/// Fan-triangulated filled circle.
pub fn circle_mesh(radius: f32, segments: usize) -> Mesh {
    let mut positions: Vec<[f32; 3]> = vec![[0.0, 0.0, 0.0]];
    for i in 0..=segments {
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        positions.push([angle.cos() * radius, angle.sin() * radius, 0.0]);
    }
    let n = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [p[0] / (2.0 * radius) + 0.5, p[1] / (2.0 * radius) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity(segments * 3);
    for i in 1..(n as u32 - 1) {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// ── Spawn helpers ─────────────────────────────────────────────────────────────

/// Spawn an explosion at `pos`, unless it falls inside the top effect zone.
///
/// Final explosions also emit their radial particle burst here so the two
/// always appear together.
pub fn spawn_explosion(commands: &mut Commands, pos: Vec2, kind: ExplosionKind, arena_top: f32) {
    if pos.y > arena_top - TOP_EFFECT_ZONE {
        return;
    }

    let (max_radius, growth) = match kind {
        ExplosionKind::Normal => (EXPLOSION_MAX_RADIUS, EXPLOSION_GROWTH_SPEED),
        ExplosionKind::Final => (EXPLOSION_FINAL_MAX_RADIUS, EXPLOSION_FINAL_GROWTH_SPEED),
        ExplosionKind::ShieldBreak => (EXPLOSION_SHIELD_BREAK_RADIUS, EXPLOSION_GROWTH_SPEED),
    };

    commands.spawn((
        Explosion {
            radius: 1.0,
            max_radius,
            growth,
            kind,
            material: None,
        },
        Transform::from_translation(pos.extend(0.5)),
        Visibility::default(),
    ));

    if kind == ExplosionKind::Final {
        spawn_burst_particles(commands, pos);
    }
}

/// Radial 20-spark burst used by final explosions.
fn spawn_burst_particles(commands: &mut Commands, pos: Vec2) {
    let mut rng = rand::thread_rng();
    for i in 0..EXPLOSION_PARTICLE_COUNT {
        let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLE_COUNT as f32;
        let speed: f32 = rng.gen_range(120.0..600.0);
        commands.spawn((
            Particle {
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                lifetime: rng.gen_range(0.5..0.9),
                r: 1.0,
                g: rng.gen_range(0.5..0.9),
                b: 0.0,
                material: None,
            },
            Transform::from_translation(pos.extend(0.6)).with_scale(Vec3::splat(
                rng.gen_range(2.0..6.0),
            )),
            Visibility::default(),
        ));
    }
}

/// Spawn the pulse ring marking two bullets cancelling each other out.
pub fn spawn_collision_pulse(commands: &mut Commands, pos: Vec2) {
    commands.spawn((
        CollisionPulse {
            age: 0.0,
            lifetime: 0.5,
            material: None,
        },
        Transform::from_translation(pos.extend(0.55)),
        Visibility::default(),
    ));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach the shared mesh and a per-effect material to freshly spawned
/// explosions, particles, and pulses.
#[allow(clippy::type_complexity)]
pub fn attach_effect_mesh_system(
    mut commands: Commands,
    effect_mesh: Res<EffectMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut q_explosions: Query<(Entity, &mut Explosion), Added<Explosion>>,
    mut q_particles: Query<(Entity, &mut Particle), Added<Particle>>,
    mut q_pulses: Query<(Entity, &mut CollisionPulse), Added<CollisionPulse>>,
) {
    for (entity, mut explosion) in q_explosions.iter_mut() {
        let color = match explosion.kind {
            ExplosionKind::Normal => Color::srgba(1.0, 0.78, 0.0, 0.9),
            ExplosionKind::Final => Color::srgba(1.0, 0.4, 0.0, 0.9),
            ExplosionKind::ShieldBreak => Color::srgba(0.4, 0.8, 1.0, 0.9),
        };
        let mat = materials.add(ColorMaterial::from_color(color));
        explosion.material = Some(mat.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(effect_mesh.0.clone()), MeshMaterial2d(mat)));
    }

    for (entity, mut particle) in q_particles.iter_mut() {
        let mat = materials.add(ColorMaterial::from_color(Color::srgba(
            particle.r, particle.g, particle.b, 1.0,
        )));
        particle.material = Some(mat.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(effect_mesh.0.clone()), MeshMaterial2d(mat)));
    }

    for (entity, mut pulse) in q_pulses.iter_mut() {
        let mat = materials.add(ColorMaterial::from_color(Color::srgba(0.6, 0.9, 1.0, 0.8)));
        pulse.material = Some(mat.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(effect_mesh.0.clone()), MeshMaterial2d(mat)));
    }
}

/// Grow explosion radii, fade them out, and despawn the finished ones.
pub fn explosion_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Explosion, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut explosion, mut transform) in query.iter_mut() {
        explosion.radius += explosion.growth * dt;

        if explosion.radius >= explosion.max_radius {
            commands.entity(entity).despawn();
            continue;
        }

        transform.scale = Vec3::splat(explosion.radius);

        let alpha = 1.0 - explosion.radius / explosion.max_radius;
        if let Some(ref handle) = explosion.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color.set_alpha(alpha);
            }
        }
    }
}

/// Advance burst particles: translate, shrink, fade, expire.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;

        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;
        transform.scale *= 0.98_f32.powf(dt * 60.0);

        // Quadratic ease-out alpha: bright at birth, rapid fade at the end.
        let t = particle.age / particle.lifetime;
        let alpha = (1.0 - t).powi(2);

        if let Some(ref handle) = particle.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::srgba(particle.r, particle.g, particle.b, alpha);
            }
        }
    }
}

/// Expand and fade neutralisation pulses.
pub fn collision_pulse_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut CollisionPulse, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut pulse, mut transform) in query.iter_mut() {
        pulse.age += dt;
        if pulse.age >= pulse.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        let t = pulse.age / pulse.lifetime;
        // Pulsing radius: expand with a sine wobble layered on top.
        let radius = 30.0 * t + 4.0 * (pulse.age * 25.0).sin();
        transform.scale = Vec3::splat(radius.max(1.0));

        if let Some(ref handle) = pulse.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color.set_alpha(0.8 * (1.0 - t));
            }
        }
    }
}

/// Count the screen-feedback timers down.
pub fn flash_tick_system(time: Res<Time>, mut flash: ResMut<FlashState>) {
    let dt = time.delta_secs();
    flash.hit_flash_secs = (flash.hit_flash_secs - dt).max(0.0);
    flash.life_blink_secs = (flash.life_blink_secs - dt).max(0.0);
}
