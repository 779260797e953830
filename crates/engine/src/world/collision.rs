use super::grid::{Axis, Entity, Field, Heading, Position};

/// Everything that can stop a subject: walls, boxes and the field edge.
#[derive(Debug, Clone, Copy)]
pub struct Obstacles<'a> {
    field: &'a Field,
    walls: &'a [Entity],
    boxes: &'a [Entity],
    excluded_box: Option<usize>,
}

impl<'a> Obstacles<'a> {
    pub fn new(field: &'a Field, walls: &'a [Entity], boxes: &'a [Entity]) -> Self {
        Self {
            field,
            walls,
            boxes,
            excluded_box: None,
        }
    }

    /// Same obstacle set without the box at `index`, used when that box is
    /// the subject of a push test or is being pushed by the subject.
    pub fn excluding_box(self, index: usize) -> Self {
        Self {
            excluded_box: Some(index),
            ..self
        }
    }

    pub fn field(&self) -> &Field {
        self.field
    }

    pub fn boxes(&self) -> &'a [Entity] {
        self.boxes
    }

    fn iter(&self) -> impl Iterator<Item = &'a Entity> {
        let excluded = self.excluded_box;
        let boxes = self
            .boxes
            .iter()
            .enumerate()
            .filter(move |(index, _)| Some(*index) != excluded)
            .map(|(_, entity)| entity);
        self.walls
            .iter()
            .chain(boxes)
            .filter(|entity| entity.kind.is_blocking())
    }
}

/// Whether `subject` cannot advance one step along `axis` in `heading`.
pub fn blocked(subject: Position, axis: Axis, heading: Heading, obstacles: &Obstacles<'_>) -> bool {
    let tile = obstacles.field().tile_size();
    at_field_edge(subject, axis, heading, obstacles.field())
        || obstacles
            .iter()
            .any(|obstacle| adjacent_ahead(subject, obstacle.position, axis, heading, tile))
}

/// Edge of the subject footprint facing the direction of travel.
pub fn leading_edge(subject: Position, axis: Axis, heading: Heading, tile: i32) -> i32 {
    match heading {
        Heading::Positive => subject.along(axis) + tile,
        Heading::Negative => subject.along(axis),
    }
}

/// Edge of an obstacle footprint that faces a subject travelling in `heading`.
pub fn trailing_edge(obstacle: Position, axis: Axis, heading: Heading, tile: i32) -> i32 {
    match heading {
        Heading::Positive => obstacle.along(axis),
        Heading::Negative => obstacle.along(axis) + tile,
    }
}

/// Half-open `[start, start + tile)` span intersection on one axis.
pub fn spans_overlap(a: i32, b: i32, tile: i32) -> bool {
    a < b + tile && b < a + tile
}

/// The obstacle occupies the cell directly ahead: it overlaps the subject
/// on the side axis and its near edge meets the subject's leading edge.
pub fn adjacent_ahead(
    subject: Position,
    obstacle: Position,
    axis: Axis,
    heading: Heading,
    tile: i32,
) -> bool {
    let side = axis.side();
    spans_overlap(subject.along(side), obstacle.along(side), tile)
        && leading_edge(subject, axis, heading, tile) == trailing_edge(obstacle, axis, heading, tile)
}

// Touching the edge only: a subject half way through a crossing is never
// stopped by the field edge.
fn at_field_edge(subject: Position, axis: Axis, heading: Heading, field: &Field) -> bool {
    let edge = leading_edge(subject, axis, heading, field.tile_size());
    match heading {
        Heading::Positive => edge >= field.extent(axis),
        Heading::Negative => edge <= 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::EntityKind;

    const TILE: i32 = 32;

    fn field() -> Field {
        Field::new(32, 10, 9).expect("field")
    }

    fn wall(x: i32, y: i32) -> Entity {
        Entity::new(EntityKind::Wall, Position::new(x, y))
    }

    fn crate_box(x: i32, y: i32) -> Entity {
        Entity::new(EntityKind::Box, Position::new(x, y))
    }

    #[test]
    fn spans_overlap_is_half_open() {
        assert!(spans_overlap(0, 0, TILE));
        assert!(spans_overlap(0, 16, TILE));
        assert!(spans_overlap(16, 0, TILE));
        assert!(!spans_overlap(0, 32, TILE));
        assert!(!spans_overlap(32, 0, TILE));
    }

    #[test]
    fn field_edges_block_outward_moves() {
        let field = field();
        let obstacles = Obstacles::new(&field, &[], &[]);

        assert!(blocked(Position::new(0, 64), Axis::X, Heading::Negative, &obstacles));
        assert!(blocked(Position::new(64, 0), Axis::Y, Heading::Negative, &obstacles));
        assert!(blocked(Position::new(288, 64), Axis::X, Heading::Positive, &obstacles));
        assert!(blocked(Position::new(64, 256), Axis::Y, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(0, 64), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(288, 64), Axis::X, Heading::Negative, &obstacles));
    }

    #[test]
    fn second_half_of_crossing_is_not_stopped_by_field_edge() {
        let field = field();
        let obstacles = Obstacles::new(&field, &[], &[]);

        assert!(!blocked(Position::new(272, 0), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(16, 0), Axis::X, Heading::Negative, &obstacles));
    }

    #[test]
    fn wall_one_tile_ahead_blocks() {
        let field = field();
        let walls = [wall(96, 64)];
        let obstacles = Obstacles::new(&field, &walls, &[]);

        assert!(blocked(Position::new(64, 64), Axis::X, Heading::Positive, &obstacles));
        assert!(blocked(Position::new(128, 64), Axis::X, Heading::Negative, &obstacles));
        assert!(blocked(Position::new(96, 32), Axis::Y, Heading::Positive, &obstacles));
        assert!(blocked(Position::new(96, 96), Axis::Y, Heading::Negative, &obstacles));
    }

    #[test]
    fn wall_two_tiles_ahead_or_mid_crossing_does_not_block() {
        let field = field();
        let walls = [wall(96, 64)];
        let obstacles = Obstacles::new(&field, &walls, &[]);

        assert!(!blocked(Position::new(32, 64), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(48, 64), Axis::X, Heading::Positive, &obstacles));
    }

    #[test]
    fn partial_side_overlap_blocks() {
        let field = field();
        let walls = [wall(96, 64)];
        let obstacles = Obstacles::new(&field, &walls, &[]);

        assert!(blocked(Position::new(64, 48), Axis::X, Heading::Positive, &obstacles));
        assert!(blocked(Position::new(64, 80), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(64, 96), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(Position::new(64, 32), Axis::X, Heading::Positive, &obstacles));
    }

    #[test]
    fn boxes_block_unless_excluded() {
        let field = field();
        let boxes = [crate_box(96, 64)];
        let obstacles = Obstacles::new(&field, &[], &boxes);

        assert!(blocked(Position::new(64, 64), Axis::X, Heading::Positive, &obstacles));
        assert!(!blocked(
            Position::new(64, 64),
            Axis::X,
            Heading::Positive,
            &obstacles.excluding_box(0)
        ));
    }

    #[test]
    fn box_never_blocks_itself() {
        let field = field();
        let boxes = [crate_box(96, 64)];
        let obstacles = Obstacles::new(&field, &[], &boxes);

        for axis in Axis::ALL {
            for heading in [Heading::Negative, Heading::Positive] {
                assert!(!blocked(boxes[0].position, axis, heading, &obstacles));
            }
        }
    }
}
