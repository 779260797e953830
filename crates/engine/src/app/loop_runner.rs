use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::metrics::{MetricsAccumulator, MetricsHandle};
use super::session::{GameSession, TickReport};
use crate::level::LevelId;

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);
const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_METRICS_LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Gap between two scheduled ticks.
    pub frame_interval: Duration,
    /// Pause between a solved level and loading the next one.
    pub transition_delay: Duration,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            metrics_log_interval: DEFAULT_METRICS_LOG_INTERVAL,
        }
    }
}

impl LoopConfig {
    pub fn normalized(self) -> Self {
        Self {
            frame_interval: normalize_non_zero_duration(self.frame_interval, DEFAULT_FRAME_INTERVAL),
            transition_delay: normalize_non_zero_duration(
                self.transition_delay,
                DEFAULT_TRANSITION_DELAY,
            ),
            metrics_log_interval: normalize_non_zero_duration(
                self.metrics_log_interval,
                DEFAULT_METRICS_LOG_INTERVAL,
            ),
        }
    }
}

/// Identifies one scheduled callback. Only the most recently issued token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Tick,
    LoadLevel(LevelId),
}

#[derive(Debug, Clone, Copy)]
struct PendingCallback {
    token: CallbackToken,
    due: Instant,
    action: PendingAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Nothing was due.
    Idle,
    /// The token no longer matches the pending callback and was ignored.
    Superseded(CallbackToken),
    Ticked(TickReport),
    /// The tick solved the level; a load of `next` is now pending.
    LevelComplete { level_id: LevelId, next: LevelId },
    LevelLoaded { requested: LevelId, level_id: LevelId },
}

/// Drives a [`GameSession`] through a single pending-callback slot.
///
/// Every schedule replaces the slot, so a level load always cancels the tick
/// that was queued before it and two tick chains can never run side by side.
#[derive(Debug)]
pub struct LoopDriver {
    session: GameSession,
    config: LoopConfig,
    pending: Option<PendingCallback>,
    next_token: u64,
    metrics_accumulator: MetricsAccumulator,
    metrics_handle: MetricsHandle,
}

impl LoopDriver {
    pub fn new(session: GameSession, config: LoopConfig, now: Instant) -> Self {
        Self::with_metrics(session, config, MetricsHandle::default(), now)
    }

    pub fn with_metrics(
        session: GameSession,
        config: LoopConfig,
        metrics_handle: MetricsHandle,
        now: Instant,
    ) -> Self {
        let config = config.normalized();
        info!(
            frame_interval_us = config.frame_interval.as_micros() as u64,
            transition_delay_ms = config.transition_delay.as_millis() as u64,
            metrics_log_interval_ms = config.metrics_log_interval.as_millis() as u64,
            step_interval_ms = session.config().step_interval.as_millis() as u64,
            "loop_config"
        );
        Self {
            session,
            config,
            pending: None,
            next_token: 0,
            metrics_accumulator: MetricsAccumulator::new(config.metrics_log_interval, now),
            metrics_handle,
        }
    }

    /// Schedules an immediate load of `level`, superseding whatever was pending.
    pub fn start(&mut self, level: LevelId, now: Instant) -> CallbackToken {
        self.schedule(PendingAction::LoadLevel(level), now)
    }

    pub fn on_key_down(&mut self, raw_key: &str, now: Instant) -> bool {
        self.session.on_key_down(raw_key, now)
    }

    pub fn on_key_up(&mut self, raw_key: &str) -> bool {
        self.session.on_key_up(raw_key)
    }

    /// Runs the pending callback if it is due at `now`.
    pub fn run_due(&mut self, now: Instant) -> LoopEvent {
        match self.pending {
            Some(pending) if pending.due <= now => self.fire(pending.token, now),
            _ => LoopEvent::Idle,
        }
    }

    /// Runs the callback identified by `token`. Stale tokens are ignored.
    pub fn fire(&mut self, token: CallbackToken, now: Instant) -> LoopEvent {
        let action = match self.pending {
            Some(pending) if pending.token == token => pending.action,
            _ => {
                debug!(token = token.0, "tick_superseded");
                return LoopEvent::Superseded(token);
            }
        };
        self.pending = None;

        match action {
            PendingAction::Tick => self.run_tick(now),
            PendingAction::LoadLevel(requested) => {
                let level_id = self.session.load_level(requested);
                self.schedule(PendingAction::Tick, now);
                LoopEvent::LevelLoaded {
                    requested,
                    level_id,
                }
            }
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    pub fn pending_token(&self) -> Option<CallbackToken> {
        self.pending.map(|pending| pending.token)
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingCallback {
                action: PendingAction::LoadLevel(_),
                ..
            })
        )
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn metrics_handle(&self) -> &MetricsHandle {
        &self.metrics_handle
    }

    fn run_tick(&mut self, now: Instant) -> LoopEvent {
        let report = self.session.tick(now);
        self.metrics_accumulator.record_tick(&report);
        if let Some(snapshot) = self.metrics_accumulator.maybe_snapshot(now) {
            self.metrics_handle.publish(snapshot);
            info!(
                tps = snapshot.tps,
                steps_per_second = snapshot.steps_per_second,
                pushes_total = snapshot.pushes_total,
                level_id = self.session.level_id().0,
                "loop_metrics"
            );
        }

        if report.solved {
            let level_id = self.session.level_id();
            let next = level_id.next();
            info!(
                level_id = level_id.0,
                next_level_id = next.0,
                transition_delay_ms = self.config.transition_delay.as_millis() as u64,
                "level_solved"
            );
            self.schedule(
                PendingAction::LoadLevel(next),
                now + self.config.transition_delay,
            );
            return LoopEvent::LevelComplete { level_id, next };
        }

        self.schedule(PendingAction::Tick, now + self.config.frame_interval);
        LoopEvent::Ticked(report)
    }

    fn schedule(&mut self, action: PendingAction, due: Instant) -> CallbackToken {
        self.next_token = self.next_token.wrapping_add(1);
        let token = CallbackToken(self.next_token);
        self.pending = Some(PendingCallback { token, due, action });
        token
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
