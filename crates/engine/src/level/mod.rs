//! Level templates and the live state built from them.

mod builtin;
mod loaded;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::{EntityKind, Field, TileCoord};

pub use builtin::{builtin_levels, BUILTIN_FIELD_TILES};
pub use loaded::LoadedState;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LevelId(pub usize);

impl LevelId {
    pub const FIRST: LevelId = LevelId(0);

    pub fn next(self) -> LevelId {
        LevelId(self.0.saturating_add(1))
    }
}

/// Initial layout of one level, in tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub player: TileCoord,
    pub boxes: Vec<TileCoord>,
    pub walls: Vec<TileCoord>,
    pub goals: Vec<TileCoord>,
}

impl LevelTemplate {
    fn tiles(&self) -> impl Iterator<Item = (EntityKind, TileCoord)> + '_ {
        std::iter::once((EntityKind::Player, self.player))
            .chain(self.boxes.iter().map(|tile| (EntityKind::Box, *tile)))
            .chain(self.walls.iter().map(|tile| (EntityKind::Wall, *tile)))
            .chain(self.goals.iter().map(|tile| (EntityKind::Goal, *tile)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelTableError {
    #[error("level table is empty; level 0 is required as the fallback level")]
    Empty,
    #[error("level {level}: {kind:?} at tile ({}, {}) lies outside the field", .tile.x, .tile.y)]
    OutOfField {
        level: usize,
        kind: EntityKind,
        tile: TileCoord,
    },
}

/// Read-only level templates indexed by [`LevelId`].
///
/// Construction checks that every template fits the field. Box and goal
/// counts are left to the level author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelTemplate>,
}

impl LevelTable {
    pub fn new(levels: Vec<LevelTemplate>, field: &Field) -> Result<Self, LevelTableError> {
        if levels.is_empty() {
            return Err(LevelTableError::Empty);
        }
        for (level, template) in levels.iter().enumerate() {
            if let Some((kind, tile)) = template.tiles().find(|(_, tile)| !field.contains_tile(*tile))
            {
                return Err(LevelTableError::OutOfField { level, kind, tile });
            }
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Looks up `id`, falling back to level 0 when it does not exist.
    pub fn resolve(&self, id: LevelId) -> (LevelId, &LevelTemplate) {
        match self.levels.get(id.0) {
            Some(template) => (id, template),
            None => (LevelId::FIRST, &self.levels[0]),
        }
    }
}
