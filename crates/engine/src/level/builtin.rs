use super::LevelTemplate;
use crate::world::TileCoord;

const fn t(x: u32, y: u32) -> TileCoord {
    TileCoord::new(x, y)
}

/// Field size the built-in levels are authored for.
pub const BUILTIN_FIELD_TILES: (u32, u32) = (10, 9);

pub fn builtin_levels() -> Vec<LevelTemplate> {
    vec![
        LevelTemplate {
            player: t(4, 0),
            boxes: vec![t(3, 3), t(3, 5)],
            walls: vec![
                t(1, 1),
                t(2, 1),
                t(7, 1),
                t(8, 1),
                t(1, 2),
                t(8, 2),
                t(5, 4),
                t(1, 6),
                t(8, 6),
                t(1, 7),
                t(2, 7),
                t(7, 7),
                t(8, 7),
            ],
            goals: vec![t(7, 2), t(7, 6)],
        },
        LevelTemplate {
            player: t(7, 0),
            boxes: vec![t(4, 4), t(8, 4)],
            walls: vec![t(1, 1), t(8, 1), t(1, 7), t(8, 7)],
            goals: vec![t(2, 2), t(2, 6)],
        },
    ]
}
