use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use boxpush_engine::{GameSession, LevelId, LoopDriver, LoopEvent, SessionError};
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;
use super::script::KeyEdge;

pub(crate) struct Replay {
    pub(crate) driver: LoopDriver,
    pub(crate) frames: u64,
    pub(crate) solved_levels: Vec<LevelId>,
    pub(crate) loaded_levels: Vec<LevelId>,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let replay = match replay(&app, Instant::now()) {
        Ok(replay) => replay,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let session = replay.driver.session();
    info!(
        frames = replay.frames,
        levels_solved = replay.solved_levels.len(),
        level_id = session.level_id().0,
        solved = session.is_solved(),
        pushes_total = replay.driver.metrics_handle().snapshot().pushes_total,
        "replay_finished"
    );

    if app.options.dump_state {
        match session.snapshot_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!(error = %err, "state_dump_failed");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Plays the script frame by frame. Script events due by a frame are
/// delivered before the driver runs, stamped with their own script time.
pub(crate) fn replay(app: &AppWiring, base: Instant) -> Result<Replay, SessionError> {
    let session = GameSession::new(app.engine_config, boxpush_engine::builtin_levels())?;
    let mut driver = LoopDriver::new(session, app.loop_config, base);
    driver.start(app.start_level(), base);

    let frame_interval = driver.config().frame_interval;
    let end = base + app.script.run_for();
    let wall_clock_start = Instant::now();
    let mut events = app.script.events.iter().peekable();
    let mut replay = Replay {
        driver,
        frames: 0,
        solved_levels: Vec::new(),
        loaded_levels: Vec::new(),
    };

    let mut now = base;
    loop {
        if app.options.realtime {
            let target = wall_clock_start + now.saturating_duration_since(base);
            let wait = target.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }

        while let Some(event) = events.next_if(|event| base + event.offset() <= now) {
            let at = base + event.offset();
            let recognized = match event.state {
                KeyEdge::Down => replay.driver.on_key_down(&event.key, at),
                KeyEdge::Up => replay.driver.on_key_up(&event.key),
            };
            if !recognized {
                warn!(key = event.key.as_str(), at_ms = event.at_ms, "script_key_ignored");
            }
        }

        // A load runs its first tick in the same frame.
        loop {
            match replay.driver.run_due(now) {
                LoopEvent::LevelComplete { level_id, .. } => replay.solved_levels.push(level_id),
                LoopEvent::LevelLoaded { level_id, .. } => {
                    replay.loaded_levels.push(level_id);
                    continue;
                }
                LoopEvent::Idle | LoopEvent::Superseded(_) | LoopEvent::Ticked(_) => {}
            }
            break;
        }
        replay.frames += 1;

        if now >= end {
            break;
        }
        now = (now + frame_interval).min(end);
    }

    Ok(replay)
}
