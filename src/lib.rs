//! Thunderbolt — a vertical-scrolling arcade shooter.
//!
//! A player-controlled aircraft fights waves of scripted enemies (planes,
//! shielded helicopters, a multi-phase boss) over a fixed arena.  The crate
//! is organised as one Bevy plugin per gameplay concern; `main.rs` assembles
//! them into the running app.

pub mod audio;
pub mod boss;
pub mod collision;
pub mod combat;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod effects;
pub mod enemy;
pub mod error;
pub mod formation;
pub mod graphics;
pub mod hazard;
pub mod hud;
pub mod menu;
pub mod motion;
pub mod player;
pub mod powerup;
pub mod schedule;
pub mod score;
pub mod sprites;
