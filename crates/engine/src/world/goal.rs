use super::grid::Entity;

/// True when every goal cell holds a box. Positions must match exactly, so
/// a box half way across a cell never counts.
pub fn solved(boxes: &[Entity], goals: &[Entity]) -> bool {
    goals
        .iter()
        .filter(|goal| goal.kind.is_goal())
        .all(|goal| boxes.iter().any(|entity| entity.position == goal.position))
}
