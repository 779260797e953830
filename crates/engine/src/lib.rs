pub mod app;
pub mod config;
pub mod level;
pub mod world;

pub use app::{
    direction_for_key, CallbackToken, Direction, GameSession, InputTracker, KeyState, LoopConfig,
    LoopDriver, LoopEvent, LoopMetricsSnapshot, MetricsHandle, MovementController, SessionError,
    StepOutcome, TickReport,
};
pub use config::{ConfigError, EngineConfig, STEP_INTERVAL_ENV_VAR, TILE_SIZE_ENV_VAR};
pub use level::{builtin_levels, LevelId, LevelTable, LevelTableError, LevelTemplate, LoadedState};
pub use world::{Entity, EntityKind, Field, FieldError, Position, TileCoord};
