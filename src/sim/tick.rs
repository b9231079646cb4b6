//! Fixed timestep simulation tick
//!
//! One call advances the round by exactly one frame in a fixed order:
//! ship, attachment, projectiles, obstacles, collisions, cleanup.

use super::collision::{resolve_player_contacts, resolve_projectile_hits};
use super::controller::{Movable, MoveContext};
use super::entity::Entity;
use super::error::{SimError, SpriteError};
use super::input::InputState;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement and fire intents
    pub intents: InputState,
    /// Spawn one extra obstacle this tick (debug/testing)
    pub spawn_obstacle: bool,
}

/// Advance the game state by one fixed timestep
///
/// Does nothing once the round has ended. An invariant violation aborts the
/// round: the phase becomes `Aborted`, a `RoundAborted` event is queued and
/// the error is returned to the host.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    if let Err(err) = step(state, input) {
        log::error!("Round aborted at tick {}: {err}", state.time_ticks);
        state.phase = GamePhase::Aborted;
        state.events.push(GameEvent::RoundAborted {
            reason: err.to_string(),
        });
        return Err(err.into());
    }
    Ok(())
}

fn step(state: &mut GameState, input: &TickInput) -> Result<(), SpriteError> {
    state.time_ticks += 1;
    let ctx = MoveContext {
        area: state.area,
        input: &input.intents,
    };

    // Ship first so firing uses the post-move position
    state.player.advance(&ctx, &mut state.rng);
    if let Some(kind) = state.player.sprite.update_attachment()? {
        state.events.push(GameEvent::AttachmentExpired { kind });
    }

    if let Some([left, right]) = state.player.try_fire(&mut state.ids) {
        state.events.push(GameEvent::ProjectilesFired { left, right });
    }
    for id in state.player.controller.projectiles.advance(&ctx, &mut state.rng) {
        state.events.push(GameEvent::ProjectileExpired { id });
    }

    let interval = state.tuning.spawn_interval_ticks;
    if input.spawn_obstacle || (interval > 0 && state.time_ticks % interval == 0) {
        state.spawn_obstacle();
    }
    for id in state.obstacles.advance(&ctx, &mut state.rng) {
        state.events.push(GameEvent::ObstacleDespawned { id });
    }

    let attachment_ticks = state.tuning.attachment_duration_ticks;
    resolve_projectile_hits(
        &mut state.player,
        &mut state.obstacles,
        attachment_ticks,
        &mut state.events,
    )?;
    let player_died = resolve_player_contacts(
        &mut state.player,
        &mut state.obstacles,
        attachment_ticks,
        &mut state.events,
    )?;

    state.player.controller.projectiles.prune();
    state.obstacles.prune();

    if player_died {
        let distance = state.distance();
        log::info!(
            "Round over after {} ticks, distance {distance:.0}",
            state.time_ticks
        );
        // Death releases the controller, its projectiles and the attachment
        state.player.destroy();
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::RoundEnded { distance });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::attachment::{Attachment, AttachmentKind};
    use crate::sim::entity::{Entity, EntityId};
    use crate::sim::obstacle::ObstacleKind;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_interval_ticks: 0,
            obstacle_max_speed: 0.0,
            ..Default::default()
        }
    }

    fn hold(intents: InputState) -> TickInput {
        TickInput {
            intents,
            ..Default::default()
        }
    }

    fn fire() -> TickInput {
        hold(InputState {
            fire: true,
            ..Default::default()
        })
    }

    /// Place a stationary obstacle of `kind` at `center`
    fn place(state: &mut GameState, kind: ObstacleKind, center: Vec2) -> EntityId {
        let id = state.next_entity_id();
        let mut obstacle = state
            .obstacles
            .spawner()
            .build(kind, id, state.area, &mut state.rng);
        obstacle.sprite.bounds.center = center;
        obstacle.speed = 0.0;
        state.obstacles.push(obstacle);
        id
    }

    #[test]
    fn test_fire_spawns_pair() {
        let mut state = GameState::new(1, quiet_tuning()).unwrap();
        tick(&mut state, &fire()).unwrap();

        assert_eq!(state.player.controller.projectiles.len(), 2);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ProjectilesFired { .. }))
        );
    }

    #[test]
    fn test_held_fire_respects_cap() {
        let mut state = GameState::new(2, quiet_tuning()).unwrap();
        let cap = state.tuning.max_projectiles;
        for _ in 0..20 {
            tick(&mut state, &fire()).unwrap();
            assert!(state.player.controller.projectiles.len() <= cap + 1);
        }
    }

    #[test]
    fn test_fire_at_fourteen_peaks_at_sixteen() {
        let mut state = GameState::new(12, quiet_tuning()).unwrap();
        // No projectile can reach the top edge within nine ticks
        let muzzle_y = state.player.sprite.bounds.center.y;
        assert!(muzzle_y > 9.0 * state.tuning.projectile_speed * 2.0);

        for _ in 0..7 {
            tick(&mut state, &fire()).unwrap();
        }
        assert_eq!(state.player.controller.projectiles.len(), 14);
        state.drain_events();

        tick(&mut state, &fire()).unwrap();
        assert_eq!(state.player.controller.projectiles.len(), 16);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ProjectilesFired { .. }))
        );

        tick(&mut state, &fire()).unwrap();
        assert_eq!(state.player.controller.projectiles.len(), 16);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ProjectilesFired { .. }))
        );
    }

    #[test]
    fn test_interval_spawning() {
        let tuning = Tuning {
            spawn_interval_ticks: 5,
            obstacle_max_speed: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning).unwrap();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default()).unwrap();
        }
        let spawned = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_one_shot_spawn() {
        let mut state = GameState::new(4, quiet_tuning()).unwrap();
        let input = TickInput {
            spawn_obstacle: true,
            ..Default::default()
        };
        tick(&mut state, &input).unwrap();
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_contact_hurts_every_tick() {
        let mut state = GameState::new(5, quiet_tuning()).unwrap();
        let center = state.player.sprite.bounds.center;
        place(&mut state, ObstacleKind::Plain, center);

        tick(&mut state, &TickInput::default()).unwrap();
        tick(&mut state, &TickInput::default()).unwrap();

        assert_eq!(state.player.sprite.health, 98);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_death_ends_round() {
        let mut state = GameState::new(6, quiet_tuning()).unwrap();
        state.player.sprite.health = 1;
        let center = state.player.sprite.bounds.center;
        let rock = place(&mut state, ObstacleKind::Plain, center);

        tick(&mut state, &TickInput::default()).unwrap();

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Explosion { at: center }));
        assert!(events.contains(&GameEvent::PlayerDied { killer: rock }));
        assert!(matches!(events.last(), Some(GameEvent::RoundEnded { .. })));

        // Terminal: further ticks are no-ops
        let ticks = state.time_ticks;
        tick(&mut state, &fire()).unwrap();
        assert_eq!(state.time_ticks, ticks);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_death_releases_ship_resources() {
        let mut state = GameState::new(13, quiet_tuning()).unwrap();
        state
            .player
            .sprite
            .grant(Attachment::new(AttachmentKind::DoubleHealth, 100))
            .unwrap();
        state.player.sprite.health = 1;
        let center = state.player.sprite.bounds.center;
        let rock = place(&mut state, ObstacleKind::Plain, center);

        tick(&mut state, &fire()).unwrap();

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.is_alive());
        assert!(state.player.sprite.attachment().is_none());
        assert!(state.player.controller.projectiles.is_empty());
        assert!(state.events.contains(&GameEvent::Explosion { at: center }));
        let ids: Vec<EntityId> = state.visuals().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![rock]);
    }

    #[test]
    fn test_attachment_expires() {
        let tuning = Tuning {
            attachment_duration_ticks: 3,
            ..quiet_tuning()
        };
        let mut state = GameState::new(7, tuning).unwrap();
        let center = state.player.sprite.bounds.center;
        place(&mut state, ObstacleKind::Shield, center);

        tick(&mut state, &TickInput::default()).unwrap();
        assert!(!state.player.sprite.can_damage);

        for _ in 0..3 {
            tick(&mut state, &TickInput::default()).unwrap();
        }
        assert!(state.player.sprite.attachment().is_none());
        assert!(state.player.sprite.can_damage);
        assert!(state.events.contains(&GameEvent::AttachmentExpired {
            kind: AttachmentKind::Shield
        }));
    }

    #[test]
    fn test_instant_kill_one_shots() {
        let mut state = GameState::new(8, quiet_tuning()).unwrap();
        state
            .player
            .sprite
            .grant(Attachment::new(AttachmentKind::InstantKill, 100))
            .unwrap();
        let muzzle = state.player.sprite.bounds.center - Vec2::new(32.0, 40.0);
        let target = place(&mut state, ObstacleKind::Plain, muzzle);
        if let Some(obstacle) = state.obstacles.iter_alive_mut().next() {
            obstacle.sprite.bounds.size = Vec2::new(64.0, 200.0);
        }

        tick(&mut state, &fire()).unwrap();

        assert!(state.obstacles.get(target).is_none());
        assert!(state.events.contains(&GameEvent::ObstacleDestroyed {
            id: target,
            exploded: true
        }));
    }

    #[test]
    fn test_destroyed_ship_aborts_round() {
        let mut state = GameState::new(9, quiet_tuning()).unwrap();
        state.player.sprite.destroy();

        let result = tick(&mut state, &TickInput::default());

        assert!(matches!(result, Err(SimError::Sprite(SpriteError::Destroyed(_)))));
        assert_eq!(state.phase, GamePhase::Aborted);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::RoundAborted { .. })
        ));
        assert!(tick(&mut state, &TickInput::default()).is_ok());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default()).unwrap();
        let mut state2 = GameState::new(99999, Tuning::default()).unwrap();

        let inputs = [
            fire(),
            hold(InputState {
                left: true,
                fire: true,
                ..Default::default()
            }),
            TickInput {
                spawn_obstacle: true,
                ..Default::default()
            },
            hold(InputState {
                forward: true,
                ..Default::default()
            }),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input).unwrap();
                tick(&mut state2, input).unwrap();
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.events, state2.events);
        assert_eq!(state1.visuals(), state2.visuals());
        assert_eq!(state1.distance(), state2.distance());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_projectile_removed_once(
            seed in any::<u64>(),
            steps in prop::collection::vec(any::<(bool, bool, bool)>(), 1..400)
        ) {
            let tuning = Tuning {
                spawn_interval_ticks: 3,
                ..Default::default()
            };
            let mut state = GameState::new(seed, tuning).unwrap();
            let mut removed = HashSet::new();

            for (fire, left, spawn) in steps {
                let input = TickInput {
                    intents: InputState {
                        fire,
                        left,
                        right: !left,
                        ..Default::default()
                    },
                    spawn_obstacle: spawn,
                };
                tick(&mut state, &input).unwrap();
                let in_flight = state.player.controller.projectiles.len();
                prop_assert!(in_flight <= state.tuning.max_projectiles + 1);
                prop_assert!(state.area.contains(&state.player.sprite.bounds));

                for event in state.drain_events() {
                    let id = match event {
                        GameEvent::ProjectileExpired { id } => id,
                        GameEvent::ProjectileHit { projectile, .. } => projectile,
                        _ => continue,
                    };
                    prop_assert!(removed.insert(id), "projectile {} removed twice", id);
                }
            }
        }
    }
}
