use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::effects::EffectKind;

/// Data-driven configuration for the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightpathConfig {
    /// Playable arena width.
    pub arena_width: f32,
    /// Playable arena height.
    pub arena_height: f32,
    /// Base cycle speed (units/step).
    pub base_speed: f32,
    /// Heading change per step while a turn input is held (radians).
    pub turn_speed: f32,
    /// Head radius, also the collidable radius around every trail point.
    pub radius: f32,
    /// Rendered trail width before thin/thick multipliers.
    pub base_trail_width: f32,
    /// Per-step chance of starting a hole while not in one.
    pub hole_probability: f64,
    /// Length of a hole episode in steps.
    pub hole_duration_steps: u32,
    /// Most recent own trail points ignored by the self-collision test.
    pub self_exclusion_points: usize,
    /// Inset from every arena edge for spawns and teleports.
    pub spawn_buffer: f32,
    /// Pickup radius.
    pub powerup_radius: f32,
    /// How long an uncollected pickup stays in the arena (ms).
    pub powerup_lifetime_ms: u64,
    /// Shortest gap between pickup spawns (ms).
    pub spawn_interval_min_ms: u64,
    /// Longest gap between pickup spawns (ms).
    pub spawn_interval_max_ms: u64,
    /// Cap on simultaneously lying pickups.
    pub max_active_powerups: usize,
    pub effect_durations: EffectDurations,
    pub speed_boost_multiplier: f32,
    pub slow_multiplier: f32,
    pub thin_trail_multiplier: f32,
    pub thick_trail_multiplier: f32,
    /// Points by finishing position, best first. Positions past the end earn 0.
    pub points_table: Vec<u32>,
    /// Score a leader must reach to win the session.
    pub winning_score: u32,
    /// Lead over the runner-up required to win the session.
    pub winning_margin: u32,
    pub max_players: usize,
}

impl Default for LightpathConfig {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            base_speed: 2.0,
            turn_speed: 0.06,
            radius: 3.0,
            base_trail_width: 6.0,
            hole_probability: 0.01,
            hole_duration_steps: 10,
            self_exclusion_points: 20,
            spawn_buffer: 100.0,
            powerup_radius: 12.0,
            powerup_lifetime_ms: 10_000,
            spawn_interval_min_ms: 3_000,
            spawn_interval_max_ms: 8_000,
            max_active_powerups: 3,
            effect_durations: EffectDurations::default(),
            speed_boost_multiplier: 1.5,
            slow_multiplier: 0.5,
            thin_trail_multiplier: 0.5,
            thick_trail_multiplier: 2.0,
            points_table: vec![3, 2, 1],
            winning_score: 30,
            winning_margin: 2,
            max_players: 8,
        }
    }
}

/// Duration of each timed effect (ms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub speed_boost_ms: u64,
    pub thin_trail_ms: u64,
    pub invincible_ms: u64,
    pub reverse_controls_ms: u64,
    pub ghost_mode_ms: u64,
    pub thick_trail_ms: u64,
    pub slow_others_ms: u64,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            speed_boost_ms: 5_000,
            thin_trail_ms: 5_000,
            invincible_ms: 5_000,
            reverse_controls_ms: 5_000,
            ghost_mode_ms: 5_000,
            thick_trail_ms: 5_000,
            slow_others_ms: 5_000,
        }
    }
}

impl EffectDurations {
    pub fn for_kind(&self, kind: EffectKind) -> Duration {
        let ms = match kind {
            EffectKind::SpeedBoost => self.speed_boost_ms,
            EffectKind::ThinTrail => self.thin_trail_ms,
            EffectKind::Invincible => self.invincible_ms,
            EffectKind::ReverseControls => self.reverse_controls_ms,
            EffectKind::GhostMode => self.ghost_mode_ms,
            EffectKind::ThickTrail => self.thick_trail_ms,
            EffectKind::Slowed => self.slow_others_ms,
        };
        Duration::from_millis(ms)
    }
}

impl LightpathConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("LIGHTPATH_CONFIG")
            && let Some(config) = Self::read(&path)
        {
            return config;
        }
        Self::read("config/lightpath.toml").unwrap_or_default()
    }

    fn read(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Self::parse(&contents, path)
    }

    /// Parse TOML, rejecting files whose numeric tuning is not finite.
    fn parse(contents: &str, source: &str) -> Option<Self> {
        let config = match toml::from_str::<Self>(contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(source, error = %e, "Ignoring malformed lightpath config");
                return None;
            },
        };
        if let Some(field) = config.non_finite_field() {
            tracing::warn!(source, field, "Ignoring lightpath config with non-finite value");
            return None;
        }
        Some(config)
    }

    /// First float tunable that is NaN or infinite.
    fn non_finite_field(&self) -> Option<&'static str> {
        let floats = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("base_speed", self.base_speed),
            ("turn_speed", self.turn_speed),
            ("radius", self.radius),
            ("base_trail_width", self.base_trail_width),
            ("spawn_buffer", self.spawn_buffer),
            ("powerup_radius", self.powerup_radius),
            ("speed_boost_multiplier", self.speed_boost_multiplier),
            ("slow_multiplier", self.slow_multiplier),
            ("thin_trail_multiplier", self.thin_trail_multiplier),
            ("thick_trail_multiplier", self.thick_trail_multiplier),
        ];
        if !self.hole_probability.is_finite() {
            return Some("hole_probability");
        }
        floats
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
    }

    pub fn powerup_lifetime(&self) -> Duration {
        Duration::from_millis(self.powerup_lifetime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped: LightpathConfig =
            toml::from_str(include_str!("../../../config/lightpath.toml")).unwrap();
        assert_eq!(shipped, LightpathConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LightpathConfig = toml::from_str(
            r#"
            arena_width = 400.0
            winning_score = 10

            [effect_durations]
            ghost_mode_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.arena_width, 400.0);
        assert_eq!(config.winning_score, 10);
        assert_eq!(config.arena_height, 600.0);
        assert_eq!(
            config.effect_durations.for_kind(EffectKind::GhostMode),
            Duration::from_millis(1500)
        );
        assert_eq!(
            config.effect_durations.for_kind(EffectKind::SpeedBoost),
            Duration::from_millis(5_000)
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(LightpathConfig::parse("hole_probability = nan", "inline").is_none());
        assert!(LightpathConfig::parse("slow_multiplier = inf", "inline").is_none());
        assert!(LightpathConfig::parse("arena_width = -inf", "inline").is_none());
        let ok = LightpathConfig::parse("hole_probability = 0.5", "inline");
        assert_eq!(ok.map(|c| c.hole_probability), Some(0.5));
    }

    #[test]
    fn unparsable_toml_is_rejected() {
        assert!(LightpathConfig::parse("winning_score = \"lots\"", "inline").is_none());
    }

    #[test]
    fn load_without_file_is_default() {
        // No config/lightpath.toml relative to the crate test cwd.
        let config = LightpathConfig::read("definitely/missing/lightpath.toml");
        assert!(config.is_none());
    }
}
