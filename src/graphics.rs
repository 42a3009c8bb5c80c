use bevy::prelude::*;

/// Setup camera for 2D rendering.
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d at the origin frames the whole arena.
    commands.spawn(Camera2d);
    info!("[SETUP] Camera spawned");
}
