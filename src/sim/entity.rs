//! Entity identity, lifecycle and screen-space geometry
//!
//! Screen coordinates: origin at the top-left of the play area, y grows
//! downward. Bounds are centered on the entity position.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attachment::AttachmentKind;

/// Stable identity of a simulated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out entity IDs in creation order
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    /// Terminal; the entity is pruned at the end of the tick
    Destroyed,
}

/// Contract shared by everything the simulation updates
pub trait Entity {
    fn id(&self) -> EntityId;

    fn lifecycle(&self) -> Lifecycle;

    /// Current visual bounds
    fn bounds(&self) -> Bounds;

    /// Mark the entity destroyed and release everything it owns
    fn destroy(&mut self);

    fn is_alive(&self) -> bool {
        self.lifecycle() == Lifecycle::Alive
    }
}

/// Axis-aligned box centered on an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Point-in-box test (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let delta = (point - self.center).abs();
        let half = self.half_extents();
        delta.x <= half.x && delta.y <= half.y
    }

    /// Box-box overlap test (touching edges count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let delta = (other.center - self.center).abs();
        let reach = self.half_extents() + other.half_extents();
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Read-only display bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if the whole box lies inside the area
    pub fn contains(&self, bounds: &Bounds) -> bool {
        bounds.left() >= 0.0
            && bounds.top() >= 0.0
            && bounds.right() <= self.width
            && bounds.bottom() <= self.height
    }
}

/// What the renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Ship,
    /// Overlay drawn on the ship while an attachment is active
    Attachment(AttachmentKind),
    Projectile,
    AsteroidSmall,
    AsteroidBig,
    /// Power-up carrier icon
    Icon(AttachmentKind),
}

/// A positioned visual for the external renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub id: EntityId,
    pub kind: VisualKind,
    pub bounds: Bounds,
}
