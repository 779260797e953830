use super::collision::{adjacent_ahead, blocked, Obstacles};
use super::grid::{MoveIntent, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResolution {
    /// No box involved; ordinary collision rules apply.
    NoPush,
    /// The box at this index moves in lock-step with the player.
    Push(usize),
    /// A box is in the way and cannot move, so the player cannot either.
    Blocked,
}

impl PushResolution {
    pub fn pushed_box(self) -> Option<usize> {
        match self {
            PushResolution::Push(index) => Some(index),
            PushResolution::NoPush | PushResolution::Blocked => None,
        }
    }
}

/// Decides whether a player step pushes a box.
///
/// Only purely orthogonal intents push. The box directly ahead is tested
/// against walls, other boxes and the field edge; it never pushes another
/// box in turn. A player straddling two cells with a box ahead in each is
/// blocked, since only one box moves per step.
pub fn resolve_push(
    player: Position,
    intent: MoveIntent,
    obstacles: &Obstacles<'_>,
) -> PushResolution {
    let Some((axis, heading)) = intent.orthogonal() else {
        return PushResolution::NoPush;
    };
    let tile = obstacles.field().tile_size();

    let mut ahead = obstacles
        .boxes()
        .iter()
        .enumerate()
        .filter(|(_, entity)| entity.kind.is_pushable())
        .filter(|(_, entity)| adjacent_ahead(player, entity.position, axis, heading, tile))
        .map(|(index, _)| index);

    let Some(index) = ahead.next() else {
        return PushResolution::NoPush;
    };
    if ahead.next().is_some() {
        return PushResolution::Blocked;
    }

    let box_position = obstacles.boxes()[index].position;
    if blocked(box_position, axis, heading, &obstacles.excluding_box(index)) {
        PushResolution::Blocked
    } else {
        PushResolution::Push(index)
    }
}
