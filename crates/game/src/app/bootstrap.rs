use std::path::PathBuf;

use boxpush_engine::{EngineConfig, LevelId, LoopConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::script::{load_script, InputScript, ScriptError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HostOptions {
    pub(crate) script_path: PathBuf,
    pub(crate) realtime: bool,
    pub(crate) dump_state: bool,
    /// Overrides the start level named in the script.
    pub(crate) level: Option<LevelId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Run(HostOptions),
    Help,
}

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Script(#[from] ScriptError),
}

pub(crate) struct AppWiring {
    pub(crate) options: HostOptions,
    pub(crate) engine_config: EngineConfig,
    pub(crate) loop_config: LoopConfig,
    pub(crate) script: InputScript,
}

impl AppWiring {
    pub(crate) fn start_level(&self) -> LevelId {
        self.options.level.unwrap_or(LevelId(self.script.level))
    }
}

pub(crate) fn build_app(options: HostOptions) -> Result<AppWiring, StartupError> {
    info!("=== boxpush startup ===");

    let script = load_script(&options.script_path)?;
    let engine_config = EngineConfig::default().with_env_overrides();
    info!(
        script = %options.script_path.display(),
        events = script.events.len(),
        run_for_ms = script.run_for_ms,
        realtime = options.realtime,
        "script_loaded"
    );

    Ok(AppWiring {
        options,
        engine_config,
        loop_config: LoopConfig::default(),
        script,
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub(crate) fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut script_path = None;
    let mut realtime = false;
    let mut dump_state = false;
    let mut level = None;

    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--realtime" => {
                realtime = true;
                index += 1;
            }
            "--dump-state" => {
                dump_state = true;
                index += 1;
            }
            "--level" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --level".to_string())?;
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --level value '{value}' (expected usize)"))?;
                level = Some(LevelId(parsed));
                index += 2;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            path => {
                if script_path.is_some() {
                    return Err(format!("unexpected extra argument '{path}'"));
                }
                script_path = Some(PathBuf::from(path));
                index += 1;
            }
        }
    }

    let script_path = script_path.ok_or_else(|| "missing input script path".to_string())?;
    Ok(Command::Run(HostOptions {
        script_path,
        realtime,
        dump_state,
        level,
    }))
}

pub(crate) fn usage_text() -> String {
    [
        "boxpush - headless box-pushing puzzle host",
        "",
        "Usage:",
        "  boxpush [--realtime] [--dump-state] [--level <usize>] <script.json>",
        "",
        "Options:",
        "  --realtime     sleep between frames instead of using a virtual clock",
        "  --dump-state   print the final level state as JSON",
        "  --level <id>   start level, overriding the script",
        "",
        "Environment:",
        "  BOXPUSH_STEP_INTERVAL_MS, BOXPUSH_TILE_SIZE, RUST_LOG",
    ]
    .join("\n")
}
