use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::level::BUILTIN_FIELD_TILES;
use crate::world::{Field, FieldError};

pub const STEP_INTERVAL_ENV_VAR: &str = "BOXPUSH_STEP_INTERVAL_MS";
pub const TILE_SIZE_ENV_VAR: &str = "BOXPUSH_TILE_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tile_size: u32,
    pub field_width_tiles: u32,
    pub field_height_tiles: u32,
    /// Minimum time between two discrete steps while a direction is held.
    pub step_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            field_width_tiles: BUILTIN_FIELD_TILES.0,
            field_height_tiles: BUILTIN_FIELD_TILES.1,
            step_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid field: {0}")]
    Field(#[from] FieldError),
    #[error("step interval must be non-zero")]
    ZeroStepInterval,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<Field, ConfigError> {
        if self.step_interval.is_zero() {
            return Err(ConfigError::ZeroStepInterval);
        }
        Ok(Field::new(
            self.tile_size,
            self.field_width_tiles,
            self.field_height_tiles,
        )?)
    }

    /// Applies `BOXPUSH_*` overrides. Unreadable or invalid values keep the
    /// current setting.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| env::var(var))
    }

    fn with_overrides(
        self,
        lookup: impl Fn(&'static str) -> Result<String, env::VarError>,
    ) -> Self {
        let step_interval_ms = resolve_override(
            STEP_INTERVAL_ENV_VAR,
            lookup(STEP_INTERVAL_ENV_VAR),
            self.step_interval.as_millis() as u64,
        );
        let config = accept_if_valid(
            STEP_INTERVAL_ENV_VAR,
            Self {
                step_interval: Duration::from_millis(step_interval_ms),
                ..self
            },
            self,
        );

        let tile_size = resolve_override(TILE_SIZE_ENV_VAR, lookup(TILE_SIZE_ENV_VAR), config.tile_size);
        accept_if_valid(TILE_SIZE_ENV_VAR, Self { tile_size, ..config }, config)
    }
}

// An override that parses but leaves the config invalid is treated like one
// that does not parse.
fn accept_if_valid(env_var: &'static str, candidate: EngineConfig, current: EngineConfig) -> EngineConfig {
    if candidate == current {
        return current;
    }
    match candidate.validate() {
        Ok(_) => candidate,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "env var value rejected; falling back to config"
            );
            current
        }
    }
}

fn resolve_override<T>(env_var: &'static str, raw: Result<String, env::VarError>, fallback: T) -> T
where
    T: FromStr + Copy,
{
    match raw {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    env_var,
                    value = value.as_str(),
                    "invalid env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "unable to read env var; falling back to config"
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_to_builtin_field() {
        let field = EngineConfig::default().validate().expect("field");
        assert_eq!(field.width(), 320);
        assert_eq!(field.height(), 288);
        assert_eq!(field.move_distance(), 16);
    }

    #[test]
    fn zero_step_interval_is_rejected() {
        let config = EngineConfig {
            step_interval: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepInterval));
    }

    #[test]
    fn odd_tile_size_is_rejected() {
        let config = EngineConfig {
            tile_size: 33,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Field(FieldError::OddTileSize { tile_size: 33 }))
        );
    }

    #[test]
    fn overrides_apply_parsed_values() {
        let config = EngineConfig::default().with_overrides(|var| match var {
            STEP_INTERVAL_ENV_VAR => Ok("250".to_string()),
            TILE_SIZE_ENV_VAR => Ok(" 16 ".to_string()),
            _ => Err(env::VarError::NotPresent),
        });
        assert_eq!(config.step_interval, Duration::from_millis(250));
        assert_eq!(config.tile_size, 16);
    }

    #[test]
    fn invalid_or_missing_overrides_fall_back() {
        let config = EngineConfig::default().with_overrides(|var| match var {
            STEP_INTERVAL_ENV_VAR => Ok("fast".to_string()),
            _ => Err(env::VarError::NotPresent),
        });
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_that_fail_validation_fall_back() {
        let config = EngineConfig::default().with_overrides(|var| match var {
            STEP_INTERVAL_ENV_VAR => Ok("0".to_string()),
            TILE_SIZE_ENV_VAR => Ok("31".to_string()),
            _ => Err(env::VarError::NotPresent),
        });
        assert_eq!(config, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_override_survives_rejected_sibling() {
        let config = EngineConfig::default().with_overrides(|var| match var {
            STEP_INTERVAL_ENV_VAR => Ok("150".to_string()),
            TILE_SIZE_ENV_VAR => Ok("0".to_string()),
            _ => Err(env::VarError::NotPresent),
        });
        assert_eq!(config.step_interval, Duration::from_millis(150));
        assert_eq!(config.tile_size, 32);
    }
}
