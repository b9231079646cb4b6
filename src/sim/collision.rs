//! Collision and damage resolution
//!
//! Runs once per tick after everything has moved. Nothing is removed from a
//! collection here: hits mark entities destroyed and the tick prunes them
//! afterwards. Entities destroyed earlier in the same pass are skipped.

use super::attachment::{Attachment, AttachmentKind};
use super::controller::Player;
use super::entity::Entity;
use super::error::SpriteError;
use super::obstacle::{Obstacle, ObstacleManager};
use super::sprite::{GrantOutcome, HurtOutcome, Sprite};
use super::state::GameEvent;

/// Projectiles against obstacles
///
/// Each projectile is consumed by the first live obstacle containing its
/// position, whether or not that hit kills the obstacle. Damage comes from
/// the ship that owns the projectile.
pub fn resolve_projectile_hits(
    player: &mut Player,
    obstacles: &mut ObstacleManager,
    attachment_ticks: u32,
    events: &mut Vec<GameEvent>,
) -> Result<(), SpriteError> {
    let Player {
        sprite: shooter,
        controller,
    } = player;

    for projectile in controller.projectiles.iter_alive_mut() {
        let Some(obstacle) = obstacles
            .iter_alive_mut()
            .find(|o| o.sprite.bounds.contains_point(projectile.pos))
        else {
            continue;
        };

        projectile.destroy();
        events.push(GameEvent::ProjectileHit {
            projectile: projectile.id,
            obstacle: obstacle.id(),
        });

        if obstacle.sprite.hurt(shooter)? == HurtOutcome::Killed {
            obstacle_died(obstacle, shooter, attachment_ticks, events)?;
        }
    }
    Ok(())
}

/// Obstacles against the player's ship
///
/// Carriers hand over their attachment and vanish. Plain obstacles hurt the
/// ship on every tick they overlap it. Returns true once the ship dies; no
/// further contacts are processed after that.
pub fn resolve_player_contacts(
    player: &mut Player,
    obstacles: &mut ObstacleManager,
    attachment_ticks: u32,
    events: &mut Vec<GameEvent>,
) -> Result<bool, SpriteError> {
    let ship = &mut player.sprite;

    for obstacle in obstacles.iter_alive_mut() {
        if !obstacle.sprite.bounds.overlaps(&ship.bounds) {
            continue;
        }

        if let Some(kind) = obstacle.kind.attachment() {
            obstacle.destroy();
            offer(ship, kind, attachment_ticks, events)?;
            events.push(GameEvent::ObstacleDestroyed {
                id: obstacle.id(),
                exploded: false,
            });
            continue;
        }

        match ship.hurt(&obstacle.sprite)? {
            HurtOutcome::Killed => {
                log::info!("Ship {} destroyed by {}", ship.id, obstacle.id());
                events.push(GameEvent::Explosion {
                    at: ship.bounds.center,
                });
                events.push(GameEvent::PlayerDied {
                    killer: obstacle.id(),
                });
                return Ok(true);
            }
            HurtOutcome::Damaged { health } => events.push(GameEvent::PlayerHurt {
                by: obstacle.id(),
                health,
            }),
            HurtOutcome::Immune => {}
        }
    }
    Ok(false)
}

/// Death effects for an obstacle killed by `killer`
fn obstacle_died(
    obstacle: &Obstacle,
    killer: &mut Sprite,
    attachment_ticks: u32,
    events: &mut Vec<GameEvent>,
) -> Result<(), SpriteError> {
    match obstacle.kind.attachment() {
        None => {
            events.push(GameEvent::Explosion {
                at: obstacle.sprite.bounds.center,
            });
            events.push(GameEvent::ObstacleDestroyed {
                id: obstacle.id(),
                exploded: true,
            });
        }
        Some(kind) => {
            offer(killer, kind, attachment_ticks, events)?;
            events.push(GameEvent::ObstacleDestroyed {
                id: obstacle.id(),
                exploded: false,
            });
        }
    }
    Ok(())
}

fn offer(
    sprite: &mut Sprite,
    kind: AttachmentKind,
    attachment_ticks: u32,
    events: &mut Vec<GameEvent>,
) -> Result<(), SpriteError> {
    let event = match sprite.grant(Attachment::new(kind, attachment_ticks))? {
        GrantOutcome::Accepted(kind) => GameEvent::AttachmentGranted { kind },
        GrantOutcome::Denied { offered, held } => GameEvent::AttachmentDenied { offered, held },
    };
    events.push(event);
    Ok(())
}
