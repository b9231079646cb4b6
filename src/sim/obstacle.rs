//! Falling obstacles and weighted spawning
//!
//! Every variant is the same record; what differs per variant lives in a
//! static table keyed by `ObstacleKind`.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::attachment::AttachmentKind;
use super::controller::{Motion, MoveContext, Movable};
use super::entity::{Bounds, Entity, EntityId, IdAllocator, Lifecycle, PlayArea, VisualKind};
use super::error::SimError;
use super::sprite::Sprite;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Plain,
    Shield,
    InstantKill,
    FullHealth,
    DoubleHealth,
}

/// Static per-variant data
#[derive(Debug)]
pub struct ObstacleSpec {
    /// Relative spawn weight used when tuning does not override it
    pub default_weight: f64,
    /// Attachment handed over on pickup (`None` for plain obstacles)
    pub attachment: Option<AttachmentKind>,
}

static OBSTACLE_TABLE: [ObstacleSpec; 5] = [
    ObstacleSpec {
        default_weight: 100.0,
        attachment: None,
    },
    ObstacleSpec {
        default_weight: 0.5,
        attachment: Some(AttachmentKind::Shield),
    },
    ObstacleSpec {
        default_weight: 0.1,
        attachment: Some(AttachmentKind::InstantKill),
    },
    ObstacleSpec {
        default_weight: 0.3,
        attachment: Some(AttachmentKind::FullHealth),
    },
    ObstacleSpec {
        default_weight: 0.5,
        attachment: Some(AttachmentKind::DoubleHealth),
    },
];

impl ObstacleKind {
    /// All variants, in table order
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Plain,
        ObstacleKind::Shield,
        ObstacleKind::InstantKill,
        ObstacleKind::FullHealth,
        ObstacleKind::DoubleHealth,
    ];

    pub fn spec(self) -> &'static ObstacleSpec {
        &OBSTACLE_TABLE[self as usize]
    }

    pub fn attachment(self) -> Option<AttachmentKind> {
        self.spec().attachment
    }

    /// Carriers grant an attachment instead of trading damage
    pub fn is_carrier(self) -> bool {
        self.attachment().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub sprite: Sprite,
    pub kind: ObstacleKind,
    pub visual: VisualKind,
    /// Downward speed, rolled once at spawn
    pub speed: f32,
}

impl Obstacle {
    pub fn new(sprite: Sprite, kind: ObstacleKind, visual: VisualKind, speed: f32) -> Self {
        Self {
            sprite,
            kind,
            visual,
            speed,
        }
    }
}

impl Movable for Obstacle {
    fn advance<R: Rng + ?Sized>(&mut self, ctx: &MoveContext<'_>, _rng: &mut R) -> Motion {
        self.sprite.bounds.center.y += self.speed;
        if self.sprite.bounds.center.y >= ctx.area.height {
            Motion::Despawn
        } else {
            Motion::Moved
        }
    }
}

impl Entity for Obstacle {
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
        self.sprite.destroy();
    }
}

/// Builds obstacles by weighted random choice
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    index: WeightedIndex<f64>,
    max_speed: f32,
    health: i32,
    damage: i32,
    small_size: Vec2,
    big_size: Vec2,
    icon_size: Vec2,
}

impl ObstacleSpawner {
    pub fn new(tuning: &Tuning) -> Result<Self, SimError> {
        let index = WeightedIndex::new(tuning.spawn_weights.as_array())
            .map_err(|err| SimError::SpawnWeights(err.to_string()))?;
        Ok(Self {
            index,
            max_speed: tuning.obstacle_max_speed,
            health: tuning.obstacle_health,
            damage: tuning.obstacle_damage,
            small_size: tuning.asteroid_small_size,
            big_size: tuning.asteroid_big_size,
            icon_size: tuning.icon_size,
        })
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> ObstacleKind {
        ObstacleKind::ALL[self.index.sample(rng)]
    }

    /// Build an obstacle of `kind` at a random x along the top edge
    pub fn build<R: Rng + ?Sized>(
        &self,
        kind: ObstacleKind,
        id: EntityId,
        area: PlayArea,
        rng: &mut R,
    ) -> Obstacle {
        let (visual, size, health, damage) = match kind.attachment() {
            Some(attachment) => (VisualKind::Icon(attachment), self.icon_size, 0, 0),
            None => {
                // Purely cosmetic
                let (visual, size) = if rng.random_bool(0.5) {
                    (VisualKind::AsteroidBig, self.big_size)
                } else {
                    (VisualKind::AsteroidSmall, self.small_size)
                };
                (visual, size, self.health, self.damage)
            }
        };
        let center = Vec2::new(rng.random_range(0.0..area.width), 0.0);
        let speed = rng.random::<f32>() * self.max_speed;
        let sprite = Sprite::new(id, Bounds::new(center, size), health, damage);
        Obstacle::new(sprite, kind, visual, speed)
    }

    pub fn spawn<R: Rng + ?Sized>(&self, id: EntityId, area: PlayArea, rng: &mut R) -> Obstacle {
        let kind = self.choose(rng);
        self.build(kind, id, area, rng)
    }
}

/// Live obstacles owned by the round
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    spawner: ObstacleSpawner,
}

impl ObstacleManager {
    pub fn new(spawner: ObstacleSpawner) -> Self {
        Self {
            obstacles: Vec::new(),
            spawner,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter()
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> + '_ {
        self.obstacles.iter_mut().filter(|o| o.is_alive())
    }

    pub fn get(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    /// Spawn a weighted-random obstacle at the top edge
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        ids: &mut IdAllocator,
        area: PlayArea,
        rng: &mut R,
    ) -> &Obstacle {
        let obstacle = self.spawner.spawn(ids.next_id(), area, rng);
        self.push(obstacle)
    }

    /// Add an already built obstacle
    pub fn push(&mut self, obstacle: Obstacle) -> &Obstacle {
        log::debug!(
            "Spawned {:?} {} at x={:.0} speed={:.1}",
            obstacle.kind,
            obstacle.id(),
            obstacle.sprite.bounds.center.x,
            obstacle.speed
        );
        let index = self.obstacles.len();
        self.obstacles.push(obstacle);
        &self.obstacles[index]
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    /// Move every obstacle down; returns the IDs that fell off the bottom
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        ctx: &MoveContext<'_>,
        rng: &mut R,
    ) -> Vec<EntityId> {
        let mut despawned = Vec::new();
        for obstacle in self.obstacles.iter_mut().filter(|o| o.is_alive()) {
            if obstacle.advance(ctx, rng) == Motion::Despawn {
                obstacle.destroy();
                despawned.push(obstacle.id());
            }
        }
        self.prune();
        despawned
    }

    /// Drop destroyed obstacles
    pub fn prune(&mut self) {
        self.obstacles.retain(|o| o.is_alive());
    }

    pub fn destroy_all(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.destroy();
        }
        self.obstacles.clear();
    }
}
