//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies
//!
//! The host feeds a `TickInput` per frame and consumes `GameEvent`s.

pub mod attachment;
pub mod collision;
pub mod controller;
pub mod entity;
pub mod error;
pub mod input;
pub mod obstacle;
pub mod projectile;
pub mod sprite;
pub mod state;
pub mod tick;

pub use attachment::{Attachment, AttachmentKind};
pub use collision::{resolve_player_contacts, resolve_projectile_hits};
pub use controller::{Motion, MoveContext, Movable, Player, ShipController};
pub use entity::{Bounds, Entity, EntityId, Lifecycle, PlayArea, Visual, VisualKind};
pub use error::{SimError, SpriteError};
pub use input::{InputEvent, InputSource, InputState, Key};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleManager, ObstacleSpawner};
pub use projectile::{Projectile, ProjectileManager};
pub use sprite::{GrantOutcome, HurtOutcome, Sprite};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
