//! Application configuration from environment variables.
//!
//! Every knob has a validated default; out-of-range or unparsable values are
//! reported on the console and replaced by the default, the process never
//! aborts over configuration.

use std::env;
use std::path::{Path, PathBuf};

use crate::optimizer::PlacementConfig;

/// Complete application configuration, loaded from environment variables or
/// default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub optimizer: OptimizerConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment
    /// variables.
    pub fn from_env() -> Self {
        Self {
            output: OutputConfig::from_env(),
            optimizer: OptimizerConfig::from_env(),
        }
    }
}

/// Configuration for report emission.
#[derive(Clone, Debug)]
pub struct OutputConfig {
    file: PathBuf,
}

impl OutputConfig {
    const FILE_VAR: &'static str = "STACK_IT_NOW_OUTPUT_FILE";
    const DEFAULT_FILE: &'static str = "java_output.txt";

    fn from_env() -> Self {
        let file = env_string(Self::FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_FILE));
        Self { file }
    }

    /// Path of the shared, append-only report file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Configuration for the placement heuristic.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    placement: PlacementConfig,
}

impl OptimizerConfig {
    const GRID_STEP_VAR: &'static str = "STACK_IT_NOW_GRID_STEP";
    const SUPPORT_RATIO_VAR: &'static str = "STACK_IT_NOW_SUPPORT_RATIO";
    const BALANCE_RATIO_VAR: &'static str = "STACK_IT_NOW_BALANCE_LIMIT_RATIO";
    const ALLOW_ROTATION_VAR: &'static str = "STACK_IT_NOW_ALLOW_ROTATIONS";

    fn from_env() -> Self {
        let grid_step = load_i64_with_warning(
            Self::GRID_STEP_VAR,
            PlacementConfig::DEFAULT_GRID_STEP,
            |value| value > 0,
            "must be greater than 0",
            "Warning: Adjusted grid step size may affect packing quality",
        );

        let support_ratio = load_f64_with_warning(
            Self::SUPPORT_RATIO_VAR,
            PlacementConfig::DEFAULT_SUPPORT_RATIO,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "Warning: Adjusted minimum support may lead to unstable stacks",
        );

        let balance_limit_ratio = load_f64_with_warning(
            Self::BALANCE_RATIO_VAR,
            PlacementConfig::DEFAULT_BALANCE_LIMIT_RATIO,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "Warning: Adjusted balance limits may cause stacks to tip over",
        );

        let allow_item_rotation = env_string(Self::ALLOW_ROTATION_VAR)
            .and_then(|raw| parse_bool(&raw, Self::ALLOW_ROTATION_VAR))
            .unwrap_or(PlacementConfig::DEFAULT_ALLOW_ITEM_ROTATION);

        let placement = PlacementConfig::builder()
            .grid_step(grid_step)
            .support_ratio(support_ratio)
            .balance_limit_ratio(balance_limit_ratio)
            .allow_item_rotation(allow_item_rotation)
            .build();

        Self { placement }
    }

    /// Returns the configured PlacementConfig.
    pub fn placement_config(&self) -> PlacementConfig {
        self.placement
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            eprintln!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    if (value - default).abs() > (default.abs().max(1.0)) * 1e-9 {
                        println!("⚠️ {} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

fn load_i64_with_warning(
    var_name: &str,
    default: i64,
    validator: impl Fn(i64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> i64 {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    if value != default {
                        println!("⚠️ {} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as integer: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        assert_eq!(parse_bool("1", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("true", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("yes", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("on", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("TRUE", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool(" true ", "TEST_VAR"), Some(true));
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert_eq!(parse_bool("0", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("false", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("no", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("OFF", "TEST_VAR"), Some(false));
    }

    #[test]
    fn test_parse_bool_invalid_values() {
        assert_eq!(parse_bool("invalid", "TEST_VAR"), None);
        assert_eq!(parse_bool("2", "TEST_VAR"), None);
        assert_eq!(parse_bool("", "TEST_VAR"), None);
    }

    #[test]
    fn default_output_file_matches_the_boundary() {
        assert_eq!(OutputConfig::DEFAULT_FILE, "java_output.txt");
    }
}
