use std::time::{Duration, Instant};

use tracing::debug;

use crate::level::LoadedState;
use crate::world::{blocked, resolve_push, Axis, Field, Heading, MoveIntent, PushResolution};

/// Result of one discrete step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved_x: bool,
    pub moved_y: bool,
    pub pushed_box: Option<usize>,
}

impl StepOutcome {
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }

    fn mark(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.moved_x = true,
            Axis::Y => self.moved_y = true,
        }
    }
}

/// Rate-limits discrete steps while a direction is held.
#[derive(Debug, Clone, Copy)]
pub struct MovementController {
    step_interval: Duration,
    last_step: Option<Instant>,
}

impl MovementController {
    pub fn new(step_interval: Duration) -> Self {
        Self {
            step_interval,
            last_step: None,
        }
    }

    pub fn step_interval(&self) -> Duration {
        self.step_interval
    }

    pub fn last_step(&self) -> Option<Instant> {
        self.last_step
    }

    pub fn reset(&mut self) {
        self.last_step = None;
    }

    /// Runs one tick. Returns `None` when idle or still inside the step
    /// interval, otherwise the outcome of the attempted step.
    pub fn update(
        &mut self,
        intent: MoveIntent,
        now: Instant,
        state: &mut LoadedState,
        field: &Field,
    ) -> Option<StepOutcome> {
        if intent.is_idle() {
            self.last_step = None;
            return None;
        }
        if let Some(last_step) = self.last_step {
            if now.saturating_duration_since(last_step) < self.step_interval {
                return None;
            }
        }

        let outcome = apply_step(intent, state, field);
        // A fully blocked attempt leaves the timer alone so it retries next tick.
        if outcome.moved() {
            self.last_step = Some(now);
        }
        Some(outcome)
    }
}

/// Applies one discrete step, resolving x then y.
///
/// An axis moves only if it was free before either axis moved and is still
/// free after the x component has been applied.
pub fn apply_step(intent: MoveIntent, state: &mut LoadedState, field: &Field) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let free_at_start =
        Axis::ALL.map(|axis| plan_axis(intent, axis, state, field).is_some());

    for (axis, was_free) in Axis::ALL.into_iter().zip(free_at_start) {
        if !was_free {
            continue;
        }
        let Some((heading, push)) = plan_axis(intent, axis, state, field) else {
            continue;
        };

        let delta = heading.sign() * field.move_distance();
        state.player.position = state.player.position.shifted(axis, delta);
        if let Some(index) = push.pushed_box() {
            let pushed = &mut state.boxes[index];
            pushed.position = pushed.position.shifted(axis, delta);
            outcome.pushed_box = Some(index);
            debug!(
                level_id = state.level_id.0,
                box_index = index,
                x = pushed.position.x,
                y = pushed.position.y,
                "push_applied"
            );
        }
        outcome.mark(axis);
    }

    if outcome.moved() {
        debug!(
            level_id = state.level_id.0,
            x = state.player.position.x,
            y = state.player.position.y,
            "step_applied"
        );
    }
    outcome
}

// `None` when the player cannot move along `axis` this step.
fn plan_axis(
    intent: MoveIntent,
    axis: Axis,
    state: &LoadedState,
    field: &Field,
) -> Option<(Heading, PushResolution)> {
    let heading = intent.component(axis)?;
    let player = state.player.position;
    let obstacles = state.obstacles(field);

    let push = resolve_push(player, intent, &obstacles);
    let player_blocked = match push {
        PushResolution::Blocked => true,
        PushResolution::Push(index) => {
            blocked(player, axis, heading, &obstacles.excluding_box(index))
        }
        PushResolution::NoPush => blocked(player, axis, heading, &obstacles),
    };

    (!player_blocked).then_some((heading, push))
}
