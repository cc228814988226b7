//! Effect tuning, loaded once at page start.
//!
//! Every field has a default equal to the look the effects were tuned for,
//! so an empty TOML document is a valid configuration.
//!
//! ```toml
//! seed = 7
//!
//! [trail]
//! max_markers = 15
//!
//! [rain]
//! batch_min = 5
//! batch_max = 14
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GlimmerError, GlimmerResult};

/// Largest accepted `trail.max_markers`.
pub const MAX_TRAIL_MARKERS: usize = 500;
/// Largest accepted `rain.max_drops`.
pub const MAX_RAIN_DROPS: usize = 2_000;

/// Cursor trail tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailConfig {
    /// Population cap; the oldest marker is evicted past this.
    pub max_markers: usize,
    /// Pointer samples inside this window after an accepted one are dropped.
    pub throttle_ms: u32,
    /// Period of the age sweep.
    pub sweep_interval_ms: u32,
    /// Markers older than this are removed by the sweep.
    pub max_age_ms: u32,
    /// Fade before detaching a count-evicted marker.
    pub evict_fade_ms: u32,
    /// Fade before detaching an age-swept marker.
    pub sweep_fade_ms: u32,
    /// Fade animation length at zero pointer speed, in seconds.
    pub base_fade_secs: f64,
    /// Milliseconds per degree of hue rotation.
    pub hue_period_ms: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_markers: 15,
            throttle_ms: 8,
            sweep_interval_ms: 800,
            max_age_ms: 800,
            evict_fade_ms: 150,
            sweep_fade_ms: 100,
            base_fade_secs: 0.6,
            hue_period_ms: 40.0,
        }
    }
}

/// Click ripple tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RippleConfig {
    /// Ripple lifetime; the element is removed when it elapses.
    pub duration_ms: u32,
    /// Milliseconds per degree of hue rotation.
    pub hue_period_ms: f64,
    /// Half of the ring's initial size, used to centre it on the click.
    pub radius_px: f64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            hue_period_ms: 20.0,
            radius_px: 10.0,
        }
    }
}

/// Ambient rain tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainConfig {
    /// Population cap, enforced on every generation tick.
    pub max_drops: usize,
    /// Generation tick period.
    pub tick_ms: u32,
    /// Smallest batch added per tick.
    pub batch_min: usize,
    /// Largest batch added per tick (inclusive).
    pub batch_max: usize,
    /// Delay before rain starts on its own on the home page.
    pub autostart_delay_ms: u32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            max_drops: 80,
            tick_ms: 200,
            batch_min: 5,
            batch_max: 14,
            autostart_delay_ms: 1000,
        }
    }
}

/// Page utility tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Flash messages dismiss themselves after this long.
    pub flash_dismiss_ms: u32,
    /// Length of the flash slide-out transition.
    pub flash_transition_ms: u32,
    /// Delay between `display:block` and the card fade-in.
    pub card_reveal_delay_ms: u32,
    /// Delay between the card fade-out and `display:none`.
    pub card_collapse_delay_ms: u32,
    /// Toast lifetime.
    pub toast_duration_ms: u32,
    /// Annotation shown under an empty required field.
    pub required_message: String,
    /// Toast shown when a submission is blocked.
    pub blocked_message: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            flash_dismiss_ms: 5000,
            flash_transition_ms: 500,
            card_reveal_delay_ms: 50,
            card_collapse_delay_ms: 300,
            toast_duration_ms: 3000,
            required_message: "This field is required".to_owned(),
            blocked_message: "Please fill in all required fields".to_owned(),
        }
    }
}

/// Complete effect configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Fixed RNG seed. `None` seeds from the host clock.
    pub seed: Option<u64>,
    /// Cursor trail.
    pub trail: TrailConfig,
    /// Click ripple.
    pub ripple: RippleConfig,
    /// Ambient rain.
    pub rain: RainConfig,
    /// Page utilities.
    pub page: PageConfig,
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::ConfigParse`] for malformed TOML or unknown
    /// keys, and [`GlimmerError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> GlimmerResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        tracing::debug!(seed = ?config.seed, "effects config loaded");
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::ConfigRead`] when the file cannot be read,
    /// otherwise the same errors as [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> GlimmerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GlimmerError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> GlimmerResult<()> {
        let checks: [(bool, &'static str, &'static str); 11] = [
            (self.trail.max_markers > 0, "trail.max_markers", "must be positive"),
            (
                self.trail.max_markers <= MAX_TRAIL_MARKERS,
                "trail.max_markers",
                "must not exceed 500",
            ),
            (self.trail.sweep_interval_ms > 0, "trail.sweep_interval_ms", "must be positive"),
            (self.trail.base_fade_secs > 0.0, "trail.base_fade_secs", "must be positive"),
            (self.trail.hue_period_ms > 0.0, "trail.hue_period_ms", "must be positive"),
            (self.ripple.hue_period_ms > 0.0, "ripple.hue_period_ms", "must be positive"),
            (self.rain.max_drops > 0, "rain.max_drops", "must be positive"),
            (self.rain.max_drops <= MAX_RAIN_DROPS, "rain.max_drops", "must not exceed 2000"),
            (self.rain.tick_ms > 0, "rain.tick_ms", "must be positive"),
            (self.rain.batch_min > 0, "rain.batch_min", "must be positive"),
            (
                self.rain.batch_min <= self.rain.batch_max,
                "rain.batch_max",
                "must not be below rain.batch_min",
            ),
        ];

        match checks.iter().find(|(ok, _, _)| !ok) {
            Some(&(_, field, reason)) => Err(GlimmerError::InvalidConfig { field, reason }),
            None => Ok(()),
        }
    }
}
