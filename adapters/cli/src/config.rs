//! Loading of rule overrides from TOML files.

use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use path_defence_core::{Rules, TargetingStrategy};
use path_defence_world::grid;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading a rules file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read rules file {}", .path.display())]
    Read {
        /// Location that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The contents are not a valid rules overlay.
    #[error("failed to parse rules file")]
    Parse(#[from] toml::de::Error),
    /// A duration field holds a negative or non-finite number of seconds.
    #[error("`{field}` must be a non-negative number of seconds, got {value}")]
    InvalidDuration {
        /// Name of the offending field.
        field: &'static str,
        /// Value found in the file.
        value: f64,
    },
    /// The grid cannot hold the path.
    #[error("grid of {columns}x{rows} cannot hold the path; minimum is {min_columns}x{min_rows}")]
    GridTooSmall {
        /// Requested columns.
        columns: u32,
        /// Requested rows.
        rows: u32,
        /// Smallest accepted column count.
        min_columns: u32,
        /// Smallest accepted row count.
        min_rows: u32,
    },
    /// The tile length is zero, negative, or not finite.
    #[error("tile length must be positive, got {0}")]
    InvalidTileLength(f32),
}

/// Partial set of rules; absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesOverlay {
    initial_money: Option<u32>,
    initial_lives: Option<u32>,
    wave_duration: Option<f64>,
    wave_auto_start_delay: Option<f64>,
    slow_multiplier: Option<f32>,
    min_speed_fraction: Option<f32>,
    grid_columns: Option<u32>,
    grid_rows: Option<u32>,
    tile_length: Option<f32>,
    max_frame_delta: Option<f64>,
    targeting: Option<TargetingStrategy>,
    sell_refund_percent: Option<u32>,
}

impl RulesOverlay {
    fn apply(self, mut rules: Rules) -> Result<Rules, ConfigError> {
        if let Some(value) = self.initial_money {
            rules.initial_money = value;
        }
        if let Some(value) = self.initial_lives {
            rules.initial_lives = value;
        }
        if let Some(value) = self.wave_duration {
            rules.wave_duration = seconds("wave_duration", value)?;
        }
        if let Some(value) = self.wave_auto_start_delay {
            rules.wave_auto_start_delay = seconds("wave_auto_start_delay", value)?;
        }
        if let Some(value) = self.slow_multiplier {
            rules.slow_multiplier = value;
        }
        if let Some(value) = self.min_speed_fraction {
            rules.min_speed_fraction = value;
        }
        if let Some(value) = self.grid_columns {
            rules.grid_columns = value;
        }
        if let Some(value) = self.grid_rows {
            rules.grid_rows = value;
        }
        if let Some(value) = self.tile_length {
            rules.tile_length = value;
        }
        if let Some(value) = self.max_frame_delta {
            rules.max_frame_delta = seconds("max_frame_delta", value)?;
        }
        if let Some(value) = self.targeting {
            rules.targeting = value;
        }
        if let Some(value) = self.sell_refund_percent {
            rules.sell_refund_percent = value;
        }
        validate(&rules)?;
        Ok(rules)
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}

fn validate(rules: &Rules) -> Result<(), ConfigError> {
    let (min_columns, min_rows) = grid::minimum_dimensions();
    if rules.grid_columns < min_columns || rules.grid_rows < min_rows {
        return Err(ConfigError::GridTooSmall {
            columns: rules.grid_columns,
            rows: rules.grid_rows,
            min_columns,
            min_rows,
        });
    }
    if !rules.tile_length.is_finite() || rules.tile_length <= 0.0 {
        return Err(ConfigError::InvalidTileLength(rules.tile_length));
    }
    Ok(())
}

/// Parses a rules overlay and applies it on top of the reference rules.
pub(crate) fn parse_rules(contents: &str) -> Result<Rules, ConfigError> {
    let overlay: RulesOverlay = toml::from_str(contents)?;
    overlay.apply(Rules::default())
}

/// Reads and parses the rules overlay stored at `path`.
pub(crate) fn load_rules(path: &Path) -> Result<Rules, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overlay_yields_reference_rules() {
        assert_eq!(parse_rules("").expect("parse"), Rules::default());
    }

    #[test]
    fn overlay_replaces_only_present_fields() {
        let rules = parse_rules(
            r#"
                initial_money = 900
                wave_duration = 12.5
                targeting = "strongest"
            "#,
        )
        .expect("parse");

        assert_eq!(rules.initial_money, 900);
        assert_eq!(rules.wave_duration, Duration::from_millis(12_500));
        assert_eq!(rules.targeting, TargetingStrategy::Strongest);
        assert_eq!(rules.initial_lives, 20);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let error = parse_rules("wave_auto_start_delay = -1.0").expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::InvalidDuration {
                field: "wave_auto_start_delay",
                ..
            }
        ));
    }

    #[test]
    fn unknown_fields_and_small_grids_are_rejected() {
        assert!(matches!(parse_rules("lives = 3"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            parse_rules("grid_columns = 10"),
            Err(ConfigError::GridTooSmall { min_columns: 20, .. })
        ));
        assert!(matches!(
            parse_rules("tile_length = 0.0"),
            Err(ConfigError::InvalidTileLength(_))
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = load_rules(Path::new("/definitely/not/here.toml")).expect_err("missing");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
