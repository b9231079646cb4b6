//! Round state and the events it reports to the host

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::attachment::{Attachment, AttachmentKind};
use super::controller::Player;
use super::entity::{Entity, EntityId, IdAllocator, PlayArea, Visual, VisualKind};
use super::error::SimError;
use super::obstacle::{ObstacleKind, ObstacleManager, ObstacleSpawner};
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// The ship died
    GameOver,
    /// An invariant was violated; the host must reset
    Aborted,
}

/// Something the host may want to react to (sound, visuals, UI)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ProjectilesFired { left: EntityId, right: EntityId },
    /// Left through the top edge
    ProjectileExpired { id: EntityId },
    ProjectileHit { projectile: EntityId, obstacle: EntityId },
    ObstacleSpawned { id: EntityId, kind: ObstacleKind },
    /// Fell off the bottom edge
    ObstacleDespawned { id: EntityId },
    ObstacleDestroyed { id: EntityId, exploded: bool },
    Explosion { at: Vec2 },
    PlayerHurt { by: EntityId, health: i32 },
    PlayerDied { killer: EntityId },
    AttachmentGranted { kind: AttachmentKind },
    AttachmentDenied { offered: AttachmentKind, held: AttachmentKind },
    AttachmentExpired { kind: AttachmentKind },
    RoundEnded { distance: f32 },
    RoundAborted { reason: String },
}

/// Complete round state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub area: PlayArea,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub obstacles: ObstacleManager,
    /// Events queued since the last `drain_events`
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) ids: IdAllocator,
}

impl GameState {
    /// Start a round with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;
        let area = PlayArea::new(tuning.display_width, tuning.display_height);
        let mut ids = IdAllocator::default();
        let player = Player::new(ids.next_id(), area, &tuning);
        let obstacles = ObstacleManager::new(ObstacleSpawner::new(&tuning)?);

        log::info!("Round started (seed {seed}, area {}x{})", area.width, area.height);

        Ok(Self {
            seed,
            tuning,
            area,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            obstacles,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ids,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Spawn one weighted-random obstacle at the top edge
    pub fn spawn_obstacle(&mut self) -> EntityId {
        let obstacle = self.obstacles.spawn(&mut self.ids, self.area, &mut self.rng);
        let (id, kind) = (obstacle.id(), obstacle.kind);
        self.events.push(GameEvent::ObstacleSpawned { id, kind });
        id
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Distance score so far
    pub fn distance(&self) -> f32 {
        self.player.controller.current_distance
    }

    /// One positioned visual per live entity, ship first
    pub fn visuals(&self) -> Vec<Visual> {
        let projectiles = &self.player.controller.projectiles;
        let mut visuals = Vec::with_capacity(2 + projectiles.len() + self.obstacles.len());

        if self.player.is_alive() {
            let bounds = self.player.bounds();
            visuals.push(Visual {
                id: self.player.id(),
                kind: VisualKind::Ship,
                bounds,
            });
            if let Some(kind) = self.player.sprite.attachment().map(Attachment::kind) {
                visuals.push(Visual {
                    id: self.player.id(),
                    kind: VisualKind::Attachment(kind),
                    bounds,
                });
            }
        }

        visuals.extend(projectiles.iter().filter(|p| p.is_alive()).map(|p| Visual {
            id: p.id(),
            kind: VisualKind::Projectile,
            bounds: p.bounds(),
        }));
        visuals.extend(self.obstacles.iter().filter(|o| o.is_alive()).map(|o| Visual {
            id: o.id(),
            kind: o.visual,
            bounds: o.bounds(),
        }));
        visuals
    }

    /// Tear the round down: ship, controller, projectiles, attachment, obstacles
    pub fn destroy(&mut self) {
        self.player.destroy();
        self.obstacles.destroy_all();
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
        }
        log::info!("Round destroyed after {} ticks", self.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round() {
        let state = GameState::new(1, Tuning::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.sprite.health, 100);
        assert_eq!(state.player.sprite.damage, 5);
        assert!(state.obstacles.is_empty());
        assert!(state.player.controller.projectiles.is_empty());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            display_height: -1.0,
            ..Default::default()
        };
        assert!(matches!(GameState::new(1, tuning), Err(SimError::Config(_))));
    }

    #[test]
    fn test_spawn_obstacle_queues_event() {
        let mut state = GameState::new(2, Tuning::default()).unwrap();
        let id = state.spawn_obstacle();
        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::ObstacleSpawned { id: spawned, .. }] if *spawned == id
        ));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_visuals_cover_live_entities() {
        let mut state = GameState::new(3, Tuning::default()).unwrap();
        state.player.sprite.grant(Attachment::new(AttachmentKind::Shield, 10)).unwrap();
        state.player.controller.intents.fire = true;
        state.player.try_fire(&mut state.ids);
        state.spawn_obstacle();

        let kinds: Vec<VisualKind> = state.visuals().iter().map(|v| v.kind).collect();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[0], VisualKind::Ship);
        assert_eq!(kinds[1], VisualKind::Attachment(AttachmentKind::Shield));
        assert_eq!(kinds[2], VisualKind::Projectile);
        assert_eq!(kinds[3], VisualKind::Projectile);
    }

    #[test]
    fn test_destroy_cascades() {
        let mut state = GameState::new(4, Tuning::default()).unwrap();
        state.player.sprite.grant(Attachment::new(AttachmentKind::Shield, 10)).unwrap();
        state.player.controller.intents.fire = true;
        state.player.try_fire(&mut state.ids);
        state.spawn_obstacle();

        state.destroy();

        assert!(!state.player.is_alive());
        assert!(state.player.sprite.attachment().is_none());
        assert!(state.player.controller.projectiles.is_empty());
        assert!(state.obstacles.is_empty());
        assert!(state.visuals().is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
