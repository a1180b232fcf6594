// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub game_rules: GameRulesConfig,
    pub scores: ScoresConfig,
    pub debug: DebugConfig,
}

/// Timing and search depth constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    /// Depth of the first iterative deepening pass, always completed
    pub initial_depth: u8,
    pub max_search_depth: u8,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Game rules constants used by the turn simulator
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameRulesConfig {
    pub max_health: i32,
    pub turn_damage: i32,
    /// Used when the ruleset does not announce its own hazard damage
    pub default_hazard_damage: i32,
}

/// Position evaluator weights
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoresConfig {
    /// Divided by the number of living opponents
    pub opponent_weight: f64,

    // Food urgency: food_weight * atan(health - path_len * cost / food_softness)
    pub food_weight: f64,
    pub food_softness: f64,
    /// Flat credit per food item we eat along a searched line
    pub eaten_food_weight: f64,

    pub territory_weight: f64,

    // One-ply lookahead around the cell we move into
    pub threat_penalty: f64,
    pub kill_bonus: f64,

    /// Divided by current health while standing in a hazard
    pub hazard_penalty: f64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                initial_depth: 2,
                max_search_depth: 20,
            },
            game_rules: GameRulesConfig {
                max_health: 100,
                turn_damage: 1,
                default_hazard_damage: 14,
            },
            scores: ScoresConfig {
                opponent_weight: 10000.0,
                food_weight: 55.0,
                food_softness: 2.0,
                eaten_food_weight: 100.0,
                territory_weight: 1.0,
                threat_penalty: -1.0e12,
                kill_bonus: 10.0,
                hazard_penalty: 16.0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
