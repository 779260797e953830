use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use super::input::{direction_for_key, Direction, InputTracker};
use super::movement::{MovementController, StepOutcome};
use crate::config::{ConfigError, EngineConfig};
use crate::level::{builtin_levels, LevelId, LevelTable, LevelTableError, LevelTemplate, LoadedState};
use crate::world::Field;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Levels(#[from] LevelTableError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// `Some` when a discrete step was attempted this tick.
    pub step: Option<StepOutcome>,
    pub solved: bool,
}

/// One playable game: the level table, the live state of the current level,
/// key state and step timing.
///
/// Key events only touch the input tracker; entities move exclusively inside
/// [`GameSession::tick`].
#[derive(Debug)]
pub struct GameSession {
    config: EngineConfig,
    field: Field,
    levels: LevelTable,
    state: LoadedState,
    input: InputTracker,
    movement: MovementController,
}

impl GameSession {
    pub fn new(config: EngineConfig, templates: Vec<LevelTemplate>) -> Result<Self, SessionError> {
        let field = config.validate()?;
        let levels = LevelTable::new(templates, &field)?;
        let (level_id, template) = levels.resolve(LevelId::FIRST);
        let state = LoadedState::from_template(level_id, template, &field);

        Ok(Self {
            config,
            field,
            levels,
            state,
            input: InputTracker::default(),
            movement: MovementController::new(config.step_interval),
        })
    }

    pub fn with_builtin_levels(config: EngineConfig) -> Result<Self, SessionError> {
        Self::new(config, builtin_levels())
    }

    /// Rebuilds the live state from a template. Unknown ids load level 0.
    /// Held keys stay held across the load.
    pub fn load_level(&mut self, requested: LevelId) -> LevelId {
        let (level_id, template) = self.levels.resolve(requested);
        if level_id != requested {
            warn!(
                requested = requested.0,
                level_count = self.levels.len(),
                "level_fallback"
            );
        }

        self.state = LoadedState::from_template(level_id, template, &self.field);
        self.movement.reset();
        info!(
            level_id = level_id.0,
            boxes = self.state.boxes.len(),
            walls = self.state.walls.len(),
            goals = self.state.goals.len(),
            "level_loaded"
        );
        level_id
    }

    /// Returns `false` for keys outside the binding table.
    pub fn on_key_down(&mut self, raw_key: &str, now: Instant) -> bool {
        match direction_for_key(raw_key) {
            Some(direction) => {
                self.press(direction, now);
                true
            }
            None => false,
        }
    }

    pub fn on_key_up(&mut self, raw_key: &str) -> bool {
        match direction_for_key(raw_key) {
            Some(direction) => {
                self.release(direction);
                true
            }
            None => false,
        }
    }

    pub fn press(&mut self, direction: Direction, now: Instant) {
        self.input.on_key_down(direction, now);
    }

    pub fn release(&mut self, direction: Direction) {
        self.input.on_key_up(direction);
    }

    pub fn tick(&mut self, now: Instant) -> TickReport {
        let intent = self.input.current_move();
        let step = self
            .movement
            .update(intent, now, &mut self.state, &self.field);
        TickReport {
            step,
            solved: self.state.is_solved(),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_solved()
    }

    pub fn level_id(&self) -> LevelId {
        self.state.level_id
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn state(&self) -> &LoadedState {
        &self.state
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> LoadedState {
        self.state.clone()
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::world::{EntityKind, Position, TileCoord};

    fn session() -> GameSession {
        GameSession::with_builtin_levels(EngineConfig::default()).expect("session")
    }

    fn ms(base: Instant, offset: u64) -> Instant {
        base + Duration::from_millis(offset)
    }

    fn tile_of(session: &GameSession, position: Position) -> Option<TileCoord> {
        session.field().position_to_tile(position)
    }

    /// Holds `key` long enough for exactly one cell (two half steps).
    fn walk_one_cell(session: &mut GameSession, key: &str, clock: &mut Instant) {
        assert!(session.on_key_down(key, *clock));
        session.tick(*clock);
        *clock += Duration::from_millis(100);
        session.tick(*clock);
        assert!(session.on_key_up(key));
        *clock += Duration::from_millis(16);
        session.tick(*clock);
        *clock += Duration::from_millis(16);
    }

    fn walk(session: &mut GameSession, moves: &[(&str, usize)], clock: &mut Instant) {
        for (key, cells) in moves {
            for _ in 0..*cells {
                walk_one_cell(session, key, clock);
            }
        }
    }

    fn assert_invariants(session: &GameSession) {
        let state = session.state();
        let field = session.field();
        let blocking: Vec<Position> = state
            .walls
            .iter()
            .chain(state.boxes.iter())
            .map(|entity| entity.position)
            .collect();
        for (index, position) in blocking.iter().enumerate() {
            assert!(field.contains(*position), "{position:?} left the field");
            assert!(
                !blocking[index + 1..].contains(position),
                "two blocking entities share {position:?}"
            );
        }
        assert!(field.contains(state.player.position));
        assert!(!state
            .walls
            .iter()
            .any(|wall| wall.position == state.player.position));
    }

    #[test]
    fn new_session_starts_on_first_level() {
        let session = session();
        assert_eq!(session.level_id(), LevelId(0));
        assert_eq!(session.level_count(), 2);
        assert_eq!(session.state().player.position, Position::new(128, 0));
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = EngineConfig {
            tile_size: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameSession::with_builtin_levels(config),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn empty_level_table_is_reported() {
        assert!(matches!(
            GameSession::new(EngineConfig::default(), Vec::new()),
            Err(SessionError::Levels(LevelTableError::Empty))
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut session = session();
        let now = Instant::now();
        assert!(!session.on_key_down("KeyQ", now));
        assert!(!session.on_key_up("Escape"));
        assert_eq!(session.tick(now).step, None);
    }

    #[test]
    fn unknown_level_falls_back_to_first() {
        let mut session = session();
        assert_eq!(session.load_level(LevelId(1)), LevelId(1));
        assert_eq!(session.load_level(LevelId(99)), LevelId(0));
        assert_eq!(session.state().player.position, Position::new(128, 0));
    }

    #[test]
    fn reloading_discards_play_state() {
        let mut session = session();
        session.load_level(LevelId(0));
        let fresh = session.snapshot();

        let mut clock = Instant::now();
        walk(
            &mut session,
            &[("ArrowDown", 2), ("ArrowLeft", 2), ("ArrowDown", 1), ("ArrowRight", 1)],
            &mut clock,
        );
        assert_ne!(session.snapshot(), fresh);

        session.load_level(LevelId(0));
        assert_eq!(session.snapshot(), fresh);
    }

    #[test]
    fn key_events_never_move_entities_between_ticks() {
        let mut session = session();
        let before = session.snapshot();
        let now = Instant::now();
        session.on_key_down("ArrowDown", now);
        session.on_key_down("ArrowLeft", now);
        session.on_key_up("ArrowLeft");
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn idle_reset_steps_on_first_tick_after_repress() {
        let mut session = session();
        let base = Instant::now();

        session.on_key_down("ArrowRight", ms(base, 0));
        assert!(session.tick(ms(base, 0)).step.expect("step").moved_x);
        session.on_key_up("ArrowRight");
        assert_eq!(session.tick(ms(base, 16)).step, None);

        session.on_key_down("ArrowRight", ms(base, 150));
        let report = session.tick(ms(base, 150));
        assert!(report.step.expect("step").moved_x);
        assert_eq!(session.state().player.position, Position::new(160, 0));
    }

    #[test]
    fn recency_priority_reverses_direction_while_both_held() {
        let mut session = session();
        let base = Instant::now();

        session.on_key_down("ArrowLeft", ms(base, 0));
        session.tick(ms(base, 0));
        assert_eq!(session.state().player.position, Position::new(112, 0));

        session.on_key_down("ArrowRight", ms(base, 50));
        session.tick(ms(base, 100));
        assert_eq!(session.state().player.position, Position::new(128, 0));

        session.on_key_up("ArrowRight");
        session.tick(ms(base, 200));
        assert_eq!(session.state().player.position, Position::new(112, 0));
    }

    #[test]
    fn solving_first_level_reports_solved() {
        let mut session = session();
        let mut clock = Instant::now();

        walk(
            &mut session,
            &[
                ("ArrowDown", 2),
                ("ArrowLeft", 2),
                ("ArrowDown", 1),
                ("ArrowRight", 4),
                ("ArrowDown", 1),
                ("ArrowRight", 1),
                ("ArrowUp", 1),
            ],
            &mut clock,
        );
        assert_eq!(tile_of(&session, session.state().boxes[0].position), Some(TileCoord::new(7, 2)));
        assert!(!session.is_solved());
        assert_invariants(&session);

        walk(
            &mut session,
            &[
                ("ArrowLeft", 5),
                ("ArrowDown", 2),
                ("ArrowRight", 4),
                ("ArrowUp", 1),
                ("ArrowRight", 1),
                ("ArrowDown", 1),
            ],
            &mut clock,
        );
        assert_eq!(tile_of(&session, session.state().boxes[1].position), Some(TileCoord::new(7, 6)));
        assert!(session.is_solved());
        assert!(session.tick(clock).solved);
        assert_invariants(&session);
    }

    #[test]
    fn push_into_second_box_keeps_everything_in_place() {
        let mut session = session();
        let mut clock = Instant::now();
        walk(
            &mut session,
            &[("ArrowLeft", 1), ("ArrowDown", 2)],
            &mut clock,
        );
        assert_eq!(tile_of(&session, session.state().player.position), Some(TileCoord::new(3, 2)));
        walk(&mut session, &[("ArrowDown", 1)], &mut clock);
        assert_eq!(tile_of(&session, session.state().boxes[0].position), Some(TileCoord::new(3, 4)));

        let before = session.snapshot();
        walk(&mut session, &[("ArrowDown", 1)], &mut clock);
        assert_eq!(session.snapshot(), before);
        assert_invariants(&session);
    }

    #[test]
    fn snapshot_json_names_entity_kinds() {
        let session = session();
        let json = session.snapshot_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["level_id"], 0);
        assert_eq!(value["player"]["kind"], "player");
        assert_eq!(value["boxes"][0]["position"]["x"], 96);
        assert_eq!(value["goals"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            value["walls"][0]["kind"],
            serde_json::json!(EntityKind::Wall)
        );
    }
}
