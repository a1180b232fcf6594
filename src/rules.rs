// Ruleset variants understood by the turn simulator

use crate::config::GameRulesConfig;
use crate::types::Ruleset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Standard,
    /// No last-survivor win
    Solo,
    /// Toroidal board
    Wrapped,
    /// Extra damage on hazard cells
    Hazard,
}

/// Variant tag plus the per-variant constants the simulator needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub variant: Variant,
    pub max_health: i32,
    pub turn_damage: i32,
    pub hazard_damage: i32,
}

impl Rules {
    pub fn from_ruleset(ruleset: &Ruleset, config: &GameRulesConfig) -> Self {
        let name = ruleset.name.to_lowercase();
        let announced_damage = ruleset.settings.hazard_damage_per_turn;

        let variant = match name.as_str() {
            "solo" => Variant::Solo,
            "wrapped" => Variant::Wrapped,
            "royale" => Variant::Hazard,
            n if n.contains("hazard") => Variant::Hazard,
            _ if announced_damage.map_or(false, |d| d > 0) && name != "standard" => {
                Variant::Hazard
            }
            _ => Variant::Standard,
        };

        Rules {
            variant,
            max_health: config.max_health,
            turn_damage: config.turn_damage,
            hazard_damage: announced_damage.unwrap_or(config.default_hazard_damage),
        }
    }

    /// Standard rules with the configured constants
    pub fn standard(config: &GameRulesConfig) -> Self {
        Self::from_ruleset(&Ruleset::named("standard"), config)
    }

    pub fn is_wrapped(&self) -> bool {
        self.variant == Variant::Wrapped
    }

    /// Whether a lone survivor ends (and wins) the game
    pub fn last_survivor_wins(&self) -> bool {
        self.variant != Variant::Solo
    }
}
