//! Movement policies and the player's ship controller
//!
//! Controllers never hold references back to their sprite or the round;
//! everything they need arrives through `MoveContext`.

use glam::Vec2;
use rand::Rng;

use super::entity::{Bounds, Entity, EntityId, IdAllocator, Lifecycle, PlayArea};
use super::input::InputState;
use super::projectile::ProjectileManager;
use super::sprite::Sprite;
use crate::tuning::Tuning;

/// Per-tick context shared by all movers
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub area: PlayArea,
    pub input: &'a InputState,
}

/// What happened to a mover this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Moved,
    /// Left the play area; remove without death effects
    Despawn,
}

/// Per-entity-type movement policy
pub trait Movable {
    fn advance<R: Rng + ?Sized>(&mut self, ctx: &MoveContext<'_>, rng: &mut R) -> Motion;
}

/// Movement and firing state for the player's ship
#[derive(Debug, Clone)]
pub struct ShipController {
    pub speed: f32,
    /// Score counter: grows every tick, shrinks when backing up
    pub current_distance: f32,
    /// Intents read this tick
    pub intents: InputState,
    pub projectiles: ProjectileManager,
}

impl ShipController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.player_speed,
            current_distance: 0.0,
            intents: InputState::default(),
            projectiles: ProjectileManager::new(
                tuning.max_projectiles,
                tuning.projectile_speed,
                tuning.projectile_size,
            ),
        }
    }

    /// Release all projectiles and held intents
    pub fn destroy(&mut self) {
        self.projectiles.destroy_all();
        self.intents = InputState::default();
        self.speed = 0.0;
    }
}

/// The player's ship: a sprite plus the controller that drives it
#[derive(Debug, Clone)]
pub struct Player {
    pub sprite: Sprite,
    pub controller: ShipController,
}

impl Player {
    /// Place a new ship centered horizontally, one ship-height above the bottom
    pub fn new(id: EntityId, area: PlayArea, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        let center = Vec2::new(area.width / 2.0, area.height - size.y);
        Self {
            sprite: Sprite::new(
                id,
                Bounds::new(center, size),
                tuning.player_health,
                tuning.player_damage,
            ),
            controller: ShipController::new(tuning),
        }
    }

    /// Fire a pair if the fire intent is held and the cap allows it
    pub fn try_fire(&mut self, ids: &mut IdAllocator) -> Option<[EntityId; 2]> {
        if !self.controller.intents.fire {
            return None;
        }
        self.controller.projectiles.fire(&self.sprite.bounds, ids)
    }
}

impl Movable for Player {
    fn advance<R: Rng + ?Sized>(&mut self, ctx: &MoveContext<'_>, _rng: &mut R) -> Motion {
        let controller = &mut self.controller;
        controller.intents = *ctx.input;
        let speed = controller.speed;
        let bounds = &mut self.sprite.bounds;

        controller.current_distance += speed;

        // Within each axis the first intent wins, even when blocked
        if controller.intents.forward {
            let step = speed.min(bounds.top());
            if step > 0.0 {
                bounds.center.y -= step;
            }
        } else if controller.intents.backward {
            let step = (speed / 2.0).min(ctx.area.height - bounds.bottom());
            if step > 0.0 {
                bounds.center.y += step;
                controller.current_distance -= speed / 2.0;
            }
        }

        if controller.intents.right {
            let step = speed.min(ctx.area.width - bounds.right());
            if step > 0.0 {
                bounds.center.x += step;
            }
        } else if controller.intents.left {
            let step = speed.min(bounds.left());
            if step > 0.0 {
                bounds.center.x -= step;
            }
        }

        Motion::Moved
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.sprite.id
    }

    fn lifecycle(&self) -> Lifecycle {
        self.sprite.lifecycle()
    }

    fn bounds(&self) -> Bounds {
        self.sprite.bounds
    }

    fn destroy(&mut self) {
        self.controller.destroy();
        self.sprite.destroy();
    }
}
