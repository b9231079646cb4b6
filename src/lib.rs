//! Interstellar - a vertical arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, projectiles, obstacles, collisions)
//! - `audio`: Sound cue playback driven by simulation events
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Default play area (matches the launcher's window)
    pub const DISPLAY_WIDTH: f32 = 800.0;
    pub const DISPLAY_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: Vec2 = Vec2::new(64.0, 64.0);
    pub const PLAYER_SPEED: f32 = 15.0;
    pub const PLAYER_HEALTH: i32 = 100;
    pub const PLAYER_DAMAGE: i32 = 5;

    /// Projectiles
    pub const PROJECTILE_SIZE: Vec2 = Vec2::new(4.0, 12.0);
    pub const PROJECTILE_SPEED: f32 = 20.0;
    /// Maximum projectiles in flight before firing is refused
    pub const MAX_PROJECTILES: usize = 15;

    /// Obstacles
    pub const ASTEROID_SMALL_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const ASTEROID_BIG_SIZE: Vec2 = Vec2::new(64.0, 64.0);
    pub const ICON_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const OBSTACLE_MAX_SPEED: f32 = 25.0;
    pub const OBSTACLE_HEALTH: i32 = 10;
    pub const OBSTACLE_DAMAGE: i32 = 1;

    /// Spawn one obstacle every N ticks (0 = host-driven only)
    pub const SPAWN_INTERVAL_TICKS: u64 = 30;

    /// How long a granted attachment stays active (ticks)
    pub const ATTACHMENT_DURATION_TICKS: u32 = 600;

    /// Damage dealt while the instant-kill attachment is active
    pub const INSTANT_KILL_DAMAGE: i32 = i32::MAX;
}
