use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recorded key edges replayed against the session clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputScript {
    #[serde(default)]
    pub(crate) level: usize,
    pub(crate) run_for_ms: u64,
    #[serde(default)]
    pub(crate) events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptEvent {
    pub(crate) at_ms: u64,
    pub(crate) key: String,
    pub(crate) state: KeyEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum KeyEdge {
    Down,
    Up,
}

impl InputScript {
    pub(crate) fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }
}

impl ScriptEvent {
    pub(crate) fn offset(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse input script '{}'{}: {source}", .path.display(), format_json_path(.at))]
    Parse {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "input script '{}': event {index} at {at_ms} ms comes before the previous event at {previous_ms} ms",
        .path.display()
    )]
    OutOfOrder {
        path: PathBuf,
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

pub(crate) fn load_script(path: &Path) -> Result<InputScript, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&raw, path)
}

pub(crate) fn parse_script(raw: &str, path: &Path) -> Result<InputScript, ScriptError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let script = serde_path_to_error::deserialize::<_, InputScript>(&mut deserializer).map_err(
        |error| {
            let at = error.path().to_string();
            ScriptError::Parse {
                path: path.to_path_buf(),
                at,
                source: error.into_inner(),
            }
        },
    )?;

    for (index, pair) in script.events.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(ScriptError::OutOfOrder {
                path: path.to_path_buf(),
                index: index + 1,
                at_ms: pair[1].at_ms,
                previous_ms: pair[0].at_ms,
            });
        }
    }
    Ok(script)
}

fn format_json_path(at: &str) -> String {
    if at.is_empty() || at == "." {
        String::new()
    } else {
        format!(" at {at}")
    }
}
