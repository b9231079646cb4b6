//! Power-up attachments
//!
//! An attachment is bound to exactly one sprite. It modifies the owner's
//! stats on setup, counts down while attached and undoes its changes on
//! teardown.

use serde::{Deserialize, Serialize};

use super::sprite::Sprite;
use crate::consts::INSTANT_KILL_DAMAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Owner ignores all damage
    Shield,
    /// Owner destroys anything in one hit
    InstantKill,
    /// Owner heals to max health
    FullHealth,
    /// Owner's current health doubles
    DoubleHealth,
}

/// Owner state captured at setup so teardown can restore it
#[derive(Debug, Clone, Copy, PartialEq)]
enum Saved {
    Nothing,
    CanDamage(bool),
    Damage(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    kind: AttachmentKind,
    ticks_remaining: u32,
    saved: Saved,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, duration_ticks: u32) -> Self {
        Self {
            kind,
            ticks_remaining: duration_ticks,
            saved: Saved::Nothing,
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    /// Apply the effect to the new owner
    pub(crate) fn setup(&mut self, owner: &mut Sprite) {
        match self.kind {
            AttachmentKind::Shield => {
                self.saved = Saved::CanDamage(owner.can_damage);
                owner.can_damage = false;
            }
            AttachmentKind::InstantKill => {
                self.saved = Saved::Damage(owner.damage);
                owner.damage = INSTANT_KILL_DAMAGE;
            }
            AttachmentKind::FullHealth => {
                owner.health = owner.health.max(owner.max_health);
            }
            AttachmentKind::DoubleHealth => {
                owner.health = owner.health.saturating_mul(2);
            }
        }
    }

    /// Count down one tick; true once expired
    pub(crate) fn tick(&mut self) -> bool {
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        self.ticks_remaining == 0
    }

    /// Undo whatever setup changed on the owner
    pub(crate) fn teardown(self, owner: &mut Sprite) {
        match self.saved {
            Saved::CanDamage(can_damage) => owner.can_damage = can_damage,
            Saved::Damage(damage) => owner.damage = damage,
            Saved::Nothing => {}
        }
    }
}
