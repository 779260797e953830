use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::world::{Heading, MoveIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

const DIRECTION_COUNT: usize = 4;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Fixed raw-key table. Anything else is ignored.
pub const KEY_BINDINGS: [(&str, Direction); DIRECTION_COUNT] = [
    ("ArrowUp", Direction::Up),
    ("ArrowDown", Direction::Down),
    ("ArrowLeft", Direction::Left),
    ("ArrowRight", Direction::Right),
];

pub fn direction_for_key(raw_key: &str) -> Option<Direction> {
    KEY_BINDINGS
        .iter()
        .find(|(key, _)| *key == raw_key)
        .map(|(_, direction)| *direction)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Unpressed,
    PressedAt(Instant),
}

impl KeyState {
    pub fn is_pressed(self) -> bool {
        matches!(self, KeyState::PressedAt(_))
    }
}

/// Tracks when each direction went down so that, of two opposing keys held
/// together, the one pressed last wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    keys: [KeyState; DIRECTION_COUNT],
}

impl InputTracker {
    /// Key repeat while held keeps the original press time.
    pub fn on_key_down(&mut self, direction: Direction, now: Instant) {
        let slot = &mut self.keys[direction.index()];
        if !slot.is_pressed() {
            *slot = KeyState::PressedAt(now);
        }
    }

    pub fn on_key_up(&mut self, direction: Direction) {
        self.keys[direction.index()] = KeyState::Unpressed;
    }

    pub fn state(&self, direction: Direction) -> KeyState {
        self.keys[direction.index()]
    }

    pub fn current_move(&self) -> MoveIntent {
        MoveIntent::new(
            resolve_axis(self.state(Direction::Left), self.state(Direction::Right)),
            resolve_axis(self.state(Direction::Up), self.state(Direction::Down)),
        )
    }
}

/// Picks the more recently pressed of two opposing keys. Equal press times
/// resolve to the negative key.
pub fn resolve_axis(negative: KeyState, positive: KeyState) -> Option<Heading> {
    match (negative, positive) {
        (KeyState::Unpressed, KeyState::Unpressed) => None,
        (KeyState::PressedAt(_), KeyState::Unpressed) => Some(Heading::Negative),
        (KeyState::Unpressed, KeyState::PressedAt(_)) => Some(Heading::Positive),
        (KeyState::PressedAt(negative_at), KeyState::PressedAt(positive_at)) => {
            if positive_at > negative_at {
                Some(Heading::Positive)
            } else {
                Some(Heading::Negative)
            }
        }
    }
}
