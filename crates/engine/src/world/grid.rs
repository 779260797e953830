use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The perpendicular axis.
    pub const fn side(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Negative,
    Positive,
}

impl Heading {
    pub const fn sign(self) -> i32 {
        match self {
            Heading::Negative => -1,
            Heading::Positive => 1,
        }
    }
}

/// Per-axis movement intent for one tick. `None` on an axis means no input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub x: Option<Heading>,
    pub y: Option<Heading>,
}

impl MoveIntent {
    pub const IDLE: MoveIntent = MoveIntent { x: None, y: None };

    pub const fn new(x: Option<Heading>, y: Option<Heading>) -> Self {
        Self { x, y }
    }

    pub fn along(axis: Axis, heading: Heading) -> Self {
        match axis {
            Axis::X => Self::new(Some(heading), None),
            Axis::Y => Self::new(None, Some(heading)),
        }
    }

    pub fn component(&self, axis: Axis) -> Option<Heading> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }

    /// The single travel axis when exactly one component is set.
    pub fn orthogonal(&self) -> Option<(Axis, Heading)> {
        match (self.x, self.y) {
            (Some(heading), None) => Some((Axis::X, heading)),
            (None, Some(heading)) => Some((Axis::Y, heading)),
            _ => None,
        }
    }

    pub fn vector(&self) -> (i32, i32) {
        (
            self.x.map_or(0, Heading::sign),
            self.y.map_or(0, Heading::sign),
        )
    }
}

/// Top-left corner of an entity footprint, in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn shifted(self, axis: Axis, delta: i32) -> Self {
        match axis {
            Axis::X => Self::new(self.x + delta, self.y),
            Axis::Y => Self::new(self.x, self.y + delta),
        }
    }
}

/// Level geometry is authored in whole tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("tile size must be positive")]
    ZeroTileSize,
    #[error("tile size {tile_size} must be even so entities can move by half a tile")]
    OddTileSize { tile_size: u32 },
    #[error("field must be at least one tile wide and tall, got {width_tiles}x{height_tiles}")]
    EmptyField { width_tiles: u32, height_tiles: u32 },
    #[error("field of {width_tiles}x{height_tiles} tiles of size {tile_size} exceeds i32 display units")]
    TooLarge {
        tile_size: u32,
        width_tiles: u32,
        height_tiles: u32,
    },
}

/// Bounded play field. Every footprint is one `tile_size` square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    tile_size: i32,
    width: i32,
    height: i32,
}

impl Field {
    pub fn new(tile_size: u32, width_tiles: u32, height_tiles: u32) -> Result<Self, FieldError> {
        if tile_size == 0 {
            return Err(FieldError::ZeroTileSize);
        }
        if tile_size % 2 != 0 {
            return Err(FieldError::OddTileSize { tile_size });
        }
        if width_tiles == 0 || height_tiles == 0 {
            return Err(FieldError::EmptyField {
                width_tiles,
                height_tiles,
            });
        }

        let too_large = FieldError::TooLarge {
            tile_size,
            width_tiles,
            height_tiles,
        };
        let tile = i32::try_from(tile_size).map_err(|_| too_large)?;
        let width = i32::try_from(width_tiles)
            .ok()
            .and_then(|tiles| tiles.checked_mul(tile))
            .ok_or(too_large)?;
        let height = i32::try_from(height_tiles)
            .ok()
            .and_then(|tiles| tiles.checked_mul(tile))
            .ok_or(too_large)?;

        Ok(Self {
            tile_size: tile,
            width,
            height,
        })
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Distance covered by one discrete step.
    pub fn move_distance(&self) -> i32 {
        self.tile_size / 2
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn tile_to_position(&self, tile: TileCoord) -> Position {
        Position::new(
            tile.x as i32 * self.tile_size,
            tile.y as i32 * self.tile_size,
        )
    }

    /// `Some` only when the position sits exactly on a cell.
    pub fn position_to_tile(&self, position: Position) -> Option<TileCoord> {
        if !self.contains(position)
            || position.x % self.tile_size != 0
            || position.y % self.tile_size != 0
        {
            return None;
        }
        Some(TileCoord::new(
            (position.x / self.tile_size) as u32,
            (position.y / self.tile_size) as u32,
        ))
    }

    /// Whether a whole footprint at `position` lies inside the field.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x + self.tile_size <= self.width
            && position.y + self.tile_size <= self.height
    }

    pub fn contains_tile(&self, tile: TileCoord) -> bool {
        i64::from(tile.x) * i64::from(self.tile_size) < i64::from(self.width)
            && i64::from(tile.y) * i64::from(self.tile_size) < i64::from(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Box,
    Wall,
    Goal,
}

impl EntityKind {
    pub const fn is_pushable(self) -> bool {
        matches!(self, EntityKind::Box)
    }

    pub const fn is_blocking(self) -> bool {
        matches!(self, EntityKind::Box | EntityKind::Wall)
    }

    pub const fn is_goal(self) -> bool {
        matches!(self, EntityKind::Goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Position,
}

impl Entity {
    pub const fn new(kind: EntityKind, position: Position) -> Self {
        Self { kind, position }
    }
}
