//! Simulation error types

use thiserror::Error;

use super::entity::EntityId;
use crate::error::ConfigError;

/// Invariant violations local to sprite/attachment logic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("sprite {0} is already destroyed")]
    Destroyed(EntityId),
}

/// Errors surfaced by the round controller
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error("invalid tuning: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot build obstacle spawn table: {0}")]
    SpawnWeights(String),
}
