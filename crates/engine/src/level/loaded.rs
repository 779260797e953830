use serde::{Deserialize, Serialize};

use super::{LevelId, LevelTemplate};
use crate::world::{solved, Entity, EntityKind, Field, Obstacles, TileCoord};

/// Live working set of the active level. Walls and goals never change after
/// construction; the player and boxes are repositioned in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedState {
    pub level_id: LevelId,
    pub player: Entity,
    pub boxes: Vec<Entity>,
    pub walls: Vec<Entity>,
    pub goals: Vec<Entity>,
}

impl LoadedState {
    pub fn from_template(level_id: LevelId, template: &LevelTemplate, field: &Field) -> Self {
        let place = |kind: EntityKind, tiles: &[TileCoord]| -> Vec<Entity> {
            tiles
                .iter()
                .map(|tile| Entity::new(kind, field.tile_to_position(*tile)))
                .collect()
        };

        Self {
            level_id,
            player: Entity::new(EntityKind::Player, field.tile_to_position(template.player)),
            boxes: place(EntityKind::Box, &template.boxes),
            walls: place(EntityKind::Wall, &template.walls),
            goals: place(EntityKind::Goal, &template.goals),
        }
    }

    pub fn obstacles<'a>(&'a self, field: &'a Field) -> Obstacles<'a> {
        Obstacles::new(field, &self.walls, &self.boxes)
    }

    pub fn is_solved(&self) -> bool {
        solved(&self.boxes, &self.goals)
    }
}
