//! Per-tick orchestration on top of the pure grid rules.

mod input;
mod loop_runner;
mod metrics;
mod movement;
mod session;

pub use input::{direction_for_key, resolve_axis, Direction, InputTracker, KeyState, KEY_BINDINGS};
pub use loop_runner::{CallbackToken, LoopConfig, LoopDriver, LoopEvent};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use movement::{apply_step, MovementController, StepOutcome};
pub use session::{GameSession, SessionError, TickReport};
