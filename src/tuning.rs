//! Data-driven game balance
//!
//! Every speed is in pixels per tick, every rate is a per-tick probability.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Difficulty tier for a special target, picked once when it spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialTier {
    /// Added to `item_speed` for the fall speed
    pub extra_fall_speed: f32,
    /// Horizontal oscillation per tick
    pub zigzag_speed: f32,
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub thief_speed: f32,
    pub thief_size: f32,
    /// Gap between the thief's feet and the bottom of the field
    pub floor_margin: f32,

    pub item_size: f32,
    pub obstacle_size: f32,
    pub special_size: f32,

    /// Base fall speed shared by all kinds
    pub item_speed: f32,
    pub item_speed_jitter: f32,
    pub obstacle_speed_jitter: f32,

    pub item_spawn_rate: f64,
    pub obstacle_spawn_rate: f64,
    pub special_spawn_rate: f64,

    pub special_points: u64,
    /// Score at which special targets switch to the eased tier
    pub eased_threshold: u64,
    pub hard_tier: SpecialTier,
    pub eased_tier: SpecialTier,

    /// Ticks before another special may spawn after a catch
    pub caught_cooldown: u32,
    /// Ticks before another special may spawn after one falls out
    pub missed_cooldown: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            thief_speed: 10.0,
            thief_size: 100.0,
            floor_margin: 20.0,

            item_size: 80.0,
            obstacle_size: 90.0,
            special_size: 85.0,

            item_speed: 2.5,
            item_speed_jitter: 1.0,
            obstacle_speed_jitter: 1.5,

            item_spawn_rate: 0.015,
            obstacle_spawn_rate: 0.006,
            special_spawn_rate: 0.003,

            special_points: 1000,
            eased_threshold: 30,
            hard_tier: SpecialTier {
                extra_fall_speed: 3.5,
                zigzag_speed: 2.5,
            },
            eased_tier: SpecialTier {
                extra_fall_speed: 1.0,
                zigzag_speed: 0.8,
            },

            caught_cooldown: 1200,
            missed_cooldown: 600,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults.
    /// The result is validated, so it is always safe to hand to `GameState`.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tier used for a special spawned at `score`
    pub fn special_tier(&self, score: u64) -> SpecialTier {
        if score >= self.eased_threshold {
            self.eased_tier
        } else {
            self.hard_tier
        }
    }

    /// Check balance values, returning the first problem found
    pub fn validate(&self) -> Result<(), TuningError> {
        for (name, value) in [
            ("item_spawn_rate", self.item_spawn_rate),
            ("obstacle_spawn_rate", self.obstacle_spawn_rate),
            ("special_spawn_rate", self.special_spawn_rate),
        ] {
            // NaN fails `contains` too
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::RateOutOfRange { name, value });
            }
        }
        if self.missed_cooldown >= self.caught_cooldown {
            return Err(TuningError::CooldownOrder {
                missed: self.missed_cooldown,
                caught: self.caught_cooldown,
            });
        }
        for (name, value) in [
            ("thief_size", self.thief_size),
            ("item_size", self.item_size),
            ("obstacle_size", self.obstacle_size),
            ("special_size", self.special_size),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NonPositiveSize { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_tier_switches_at_threshold() {
        let tuning = Tuning::default();
        assert_eq!(tuning.special_tier(25), tuning.hard_tier);
        assert_eq!(tuning.special_tier(29), tuning.hard_tier);
        assert_eq!(tuning.special_tier(30), tuning.eased_tier);
        assert!(tuning.eased_tier.zigzag_speed < tuning.hard_tier.zigzag_speed);
        assert!(tuning.eased_tier.extra_fall_speed < tuning.hard_tier.extra_fall_speed);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "thief_speed": 14.0 }"#).unwrap();
        assert_eq!(tuning.thief_speed, 14.0);
        assert_eq!(tuning.caught_cooldown, 1200);
    }

    #[test]
    fn test_validate_rejects_inverted_cooldowns() {
        let tuning = Tuning {
            missed_cooldown: 2000,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::CooldownOrder {
                missed: 2000,
                caught: 1200
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let tuning = Tuning {
            obstacle_spawn_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::RateOutOfRange {
                name: "obstacle_spawn_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_rate() {
        let tuning = Tuning {
            special_spawn_rate: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::RateOutOfRange {
                name: "special_spawn_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_checks_every_size() {
        let obstacle = Tuning {
            obstacle_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            obstacle.validate(),
            Err(TuningError::NonPositiveSize {
                name: "obstacle_size",
                ..
            })
        ));

        let special = Tuning {
            special_size: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            special.validate(),
            Err(TuningError::NonPositiveSize {
                name: "special_size",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_rate() {
        let err = Tuning::from_json(r#"{ "item_spawn_rate": 1.5 }"#).unwrap_err();
        assert_eq!(
            err,
            TuningError::RateOutOfRange {
                name: "item_spawn_rate",
                value: 1.5
            }
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
