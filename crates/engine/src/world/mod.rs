//! Pure grid rules: the entity model, collision, pushing and the goal check.

mod collision;
mod goal;
mod grid;
mod push;

pub use collision::{
    adjacent_ahead, blocked, leading_edge, spans_overlap, trailing_edge, Obstacles,
};
pub use goal::solved;
pub use grid::{
    Axis, Entity, EntityKind, Field, FieldError, Heading, MoveIntent, Position, TileCoord,
};
pub use push::{resolve_push, PushResolution};
