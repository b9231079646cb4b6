//! Bullets fired by the ship
//!
//! The manager owns the in-flight list. Removal is always two-phase: a
//! projectile is marked destroyed where the decision is made, and `prune`
//! drops marked entries afterwards, so a pass never removes from the list it
//! is walking.

use glam::Vec2;
use rand::Rng;

use super::controller::{Motion, MoveContext, Movable};
use super::entity::{Bounds, Entity, EntityId, IdAllocator, Lifecycle};

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Base speed; the actual step is re-rolled every tick
    pub base_speed: f32,
    lifecycle: Lifecycle,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, base_speed: f32) -> Self {
        Self {
            id,
            pos,
            size,
            base_speed,
            lifecycle: Lifecycle::Alive,
        }
    }
}

impl Movable for Projectile {
    fn advance<R: Rng + ?Sized>(&mut self, _ctx: &MoveContext<'_>, rng: &mut R) -> Motion {
        self.pos.y -= rng.random::<f32>() * self.base_speed * 2.0;
        if self.pos.y <= 0.0 {
            Motion::Despawn
        } else {
            Motion::Moved
        }
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }

    fn destroy(&mut self) {
        self.lifecycle = Lifecycle::Destroyed;
    }
}

/// In-flight projectile list with a firing cap
#[derive(Debug, Clone)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    max_in_flight: usize,
    base_speed: f32,
    size: Vec2,
}

impl ProjectileManager {
    pub fn new(max_in_flight: usize, base_speed: f32, size: Vec2) -> Self {
        Self {
            projectiles: Vec::with_capacity(max_in_flight + 1),
            max_in_flight,
            base_speed,
            size,
        }
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.iter()
    }

    /// Live projectiles, for collision passes
    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut Projectile> + '_ {
        self.projectiles.iter_mut().filter(|p| p.is_alive())
    }

    /// Spawn a left/right muzzle pair at the firer's edges
    ///
    /// Refused once the in-flight count reaches the cap. The check is per
    /// call and a pair is never split, so the count can end one past the cap.
    pub fn fire(&mut self, firer: &Bounds, ids: &mut IdAllocator) -> Option<[EntityId; 2]> {
        if self.projectiles.len() >= self.max_in_flight {
            return None;
        }

        let offset = Vec2::new(firer.size.x / 2.0, 0.0);
        let (size, speed) = (self.size, self.base_speed);
        let left = Projectile::new(ids.next_id(), firer.center - offset, size, speed);
        let right = Projectile::new(ids.next_id(), firer.center + offset, size, speed);
        let fired = [left.id, right.id];
        self.projectiles.push(left);
        self.projectiles.push(right);
        log::trace!("Fired {} and {} ({} in flight)", fired[0], fired[1], self.projectiles.len());
        Some(fired)
    }

    /// Move every projectile; returns the IDs that left through the top
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        ctx: &MoveContext<'_>,
        rng: &mut R,
    ) -> Vec<EntityId> {
        let mut expired = Vec::new();
        for projectile in self.projectiles.iter_mut().filter(|p| p.is_alive()) {
            if projectile.advance(ctx, rng) == Motion::Despawn {
                projectile.destroy();
                expired.push(projectile.id);
            }
        }
        self.prune();
        expired
    }

    /// Drop destroyed projectiles
    pub fn prune(&mut self) {
        self.projectiles.retain(|p| p.is_alive());
    }

    pub fn destroy_all(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.destroy();
        }
        self.projectiles.clear();
    }
}
