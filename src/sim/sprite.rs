//! Damageable entities: health/damage exchange and the attachment slot

use super::attachment::{Attachment, AttachmentKind};
use super::entity::{Bounds, Entity, EntityId, Lifecycle};
use super::error::SpriteError;

/// Result of `Sprite::hurt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HurtOutcome {
    /// `can_damage` was off; nothing changed
    Immune,
    /// Health was reduced and the sprite survives
    Damaged { health: i32 },
    /// The death transition ran; the sprite is now destroyed
    Killed,
}

/// Result of `Sprite::grant`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Accepted(AttachmentKind),
    /// The slot was taken; the offered attachment was discarded
    Denied {
        offered: AttachmentKind,
        held: AttachmentKind,
    },
}

/// A playable/damageable entity
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: EntityId,
    pub bounds: Bounds,
    pub health: i32,
    pub max_health: i32,
    /// Damage inflicted on whatever this sprite hits
    pub damage: i32,
    /// Damage-immunity gate
    pub can_damage: bool,
    lifecycle: Lifecycle,
    attachment: Option<Attachment>,
}

impl Sprite {
    pub fn new(id: EntityId, bounds: Bounds, health: i32, damage: i32) -> Self {
        Self {
            id,
            bounds,
            health,
            max_health: health,
            damage,
            can_damage: true,
            lifecycle: Lifecycle::Alive,
            attachment: None,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    fn ensure_alive(&self) -> Result<(), SpriteError> {
        match self.lifecycle {
            Lifecycle::Alive => Ok(()),
            Lifecycle::Destroyed => Err(SpriteError::Destroyed(self.id)),
        }
    }

    /// Take a hit from `attacker`
    ///
    /// A blow that would leave health at or below zero kills without being
    /// subtracted, so the stored health keeps its pre-hit value. A sprite
    /// already at or below zero dies on any hit.
    pub fn hurt(&mut self, attacker: &Sprite) -> Result<HurtOutcome, SpriteError> {
        self.ensure_alive()?;

        if !self.can_damage {
            return Ok(HurtOutcome::Immune);
        }

        if self.health <= 0 || self.health.saturating_sub(attacker.damage) <= 0 {
            self.lifecycle = Lifecycle::Destroyed;
            log::debug!("Sprite {} killed by {} (health {})", self.id, attacker.id, self.health);
            return Ok(HurtOutcome::Killed);
        }

        self.health -= attacker.damage;
        Ok(HurtOutcome::Damaged {
            health: self.health,
        })
    }

    /// Offer an attachment; only an empty slot accepts
    pub fn grant(&mut self, mut offered: Attachment) -> Result<GrantOutcome, SpriteError> {
        self.ensure_alive()?;

        if let Some(held) = &self.attachment {
            log::debug!(
                "Sprite {} denied {:?} (holding {:?})",
                self.id,
                offered.kind(),
                held.kind()
            );
            return Ok(GrantOutcome::Denied {
                offered: offered.kind(),
                held: held.kind(),
            });
        }

        let kind = offered.kind();
        offered.setup(self);
        self.attachment = Some(offered);
        log::debug!("Sprite {} accepted {:?}", self.id, kind);
        Ok(GrantOutcome::Accepted(kind))
    }

    /// Advance the attachment countdown; returns the kind that expired, if any
    pub fn update_attachment(&mut self) -> Result<Option<AttachmentKind>, SpriteError> {
        self.ensure_alive()?;

        let expired = match self.attachment.as_mut() {
            Some(attachment) => attachment.tick(),
            None => false,
        };
        if !expired {
            return Ok(None);
        }
        Ok(self.detach())
    }

    /// Tear down and remove the current attachment
    pub fn detach(&mut self) -> Option<AttachmentKind> {
        let attachment = self.attachment.take()?;
        let kind = attachment.kind();
        attachment.teardown(self);
        Some(kind)
    }
}

impl Entity for Sprite {
    fn id(&self) -> EntityId {
        self.id
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn destroy(&mut self) {
        self.lifecycle = Lifecycle::Destroyed;
        self.attachment = None;
    }
}
