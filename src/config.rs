//! # Pathfinder Configuration
//!
//! Tunables for the search and the worker loop. Every field has a default, so
//! a configuration document only needs to name the values it changes:
//!
//! ```json
//! { "max_search_steps": 250, "enforce_agent_height": true }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PathfindingError, PathfindingResult};

/// Number of expansion steps after which a search gives up.
pub const DEFAULT_MAX_SEARCH_STEPS: u32 = 100;
/// How long the worker sleeps when its queue is empty.
pub const DEFAULT_IDLE_SLEEP_MS: u64 = 1;
/// Heuristic distances are multiplied by this before flooring.
pub const DEFAULT_HEURISTIC_SCALE: f32 = 10.0;
/// Movement distances are multiplied by this before flooring.
pub const DEFAULT_MOVEMENT_COST_SCALE: f32 = 1.0;
/// Name given to the worker thread.
pub const DEFAULT_THREAD_NAME: &str = "Pathfinder worker thread";

/// Configuration for a [`crate::pathfinding::PathfindingWorker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Hard cap on expansion steps per search.
    pub max_search_steps: u32,
    /// Sleep interval of the idle worker, in milliseconds.
    pub idle_sleep_ms: u64,
    /// Scale applied to the euclidean distance to the goal (`h_cost`).
    pub heuristic_scale: f32,
    /// Scale applied to the euclidean length of a single move (`g_cost`).
    ///
    /// The default of 1 keeps movement unscaled while the heuristic is scaled
    /// by 10. Setting both to the same value makes the heuristic admissible
    /// but changes which routes are produced.
    pub movement_cost_scale: f32,
    /// When set, the cells above a candidate up to the request's agent height
    /// must be empty as well.
    pub enforce_agent_height: bool,
    /// Name of the worker thread.
    pub thread_name: String,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        PathfinderConfig {
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
            idle_sleep_ms: DEFAULT_IDLE_SLEEP_MS,
            heuristic_scale: DEFAULT_HEURISTIC_SCALE,
            movement_cost_scale: DEFAULT_MOVEMENT_COST_SCALE,
            enforce_agent_height: false,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PathfinderConfig {
    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> PathfindingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> PathfindingResult<Self> {
        let config: PathfinderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PathfindingResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Checks that the values describe a usable worker.
    pub fn validate(&self) -> PathfindingResult<()> {
        if self.max_search_steps == 0 {
            return Err(PathfindingError::Config(
                "max_search_steps must be greater than zero".to_string(),
            ));
        }
        if self.idle_sleep_ms == 0 {
            return Err(PathfindingError::Config(
                "idle_sleep_ms must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("heuristic_scale", self.heuristic_scale),
            ("movement_cost_scale", self.movement_cost_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PathfindingError::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.thread_name.trim().is_empty() {
            return Err(PathfindingError::Config(
                "thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The idle sleep as a [`Duration`].
    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = PathfinderConfig::default();
        assert_eq!(config.max_search_steps, 100);
        assert_eq!(config.idle_sleep(), Duration::from_millis(1));
        assert_eq!(config.heuristic_scale, 10.0);
        assert_eq!(config.movement_cost_scale, 1.0);
        assert!(!config.enforce_agent_height);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            PathfinderConfig::from_json_str(r#"{ "max_search_steps": 250, "enforce_agent_height": true }"#)
                .unwrap();
        assert_eq!(config.max_search_steps, 250);
        assert!(config.enforce_agent_height);
        assert_eq!(config.heuristic_scale, DEFAULT_HEURISTIC_SCALE);
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn zero_step_cap_is_rejected() {
        let err = PathfinderConfig::from_json_str(r#"{ "max_search_steps": 0 }"#).unwrap_err();
        assert!(matches!(err, PathfindingError::Config(_)));
    }

    #[test]
    fn negative_scale_is_rejected() {
        let config = PathfinderConfig {
            movement_cost_scale: -1.0,
            ..PathfinderConfig::default()
        };
        assert!(matches!(config.validate(), Err(PathfindingError::Config(_))));
    }

    #[test]
    fn zero_idle_sleep_is_rejected() {
        let err = PathfinderConfig::from_json_str(r#"{ "idle_sleep_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, PathfindingError::Config(_)));
    }

    #[test]
    fn written_config_reads_back() {
        let config = PathfinderConfig {
            max_search_steps: 40,
            enforce_agent_height: true,
            thread_name: "Route planner".to_string(),
            ..PathfinderConfig::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(PathfinderConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = PathfinderConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PathfindingError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PathfinderConfig::from_json_file("/nonexistent/pathfinder.json").unwrap_err();
        assert!(matches!(err, PathfindingError::Io(_)));
    }
}
