//! Visual parameter mapping.
//!
//! Pure functions from (time, speed, random samples) to the numbers an
//! effect writes into element styles. Nothing here touches a surface, so
//! the look can be tested without one.

use rand::Rng;

use crate::config::{RippleConfig, TrailConfig};

/// HSL color as CSS understands it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees (0-360).
    pub h: f64,
    /// Saturation in percent.
    pub s: f64,
    /// Lightness in percent.
    pub l: f64,
}

impl Hsl {
    /// Creates a color, wrapping the hue into 0-360.
    #[must_use]
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s,
            l,
        }
    }

    /// CSS `hsl()` notation.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("hsl({:.1}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

/// Hue that rotates one degree every `period_ms`.
#[must_use]
pub fn hue_at(now_ms: f64, period_ms: f64) -> f64 {
    (now_ms / period_ms).rem_euclid(360.0)
}

/// Euclidean distance between two pointer samples.
#[must_use]
pub fn speed(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.0 - from.0).hypot(to.1 - from.1)
}

/// Random samples in `[0, 1)` feeding one trail marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailJitter {
    /// Scales the base size between 3 and 5 px.
    pub size: f64,
    /// Scales the blur radius.
    pub blur: f64,
    /// Scales the opacity between 0.7 and 1.0.
    pub opacity: f64,
}

impl TrailJitter {
    /// Draws fresh samples.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            size: rng.gen(),
            blur: rng.gen(),
            opacity: rng.gen(),
        }
    }
}

/// Everything needed to draw one trail marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailVisual {
    /// Gradient stops, inner to outer.
    pub layers: [Hsl; 3],
    /// Diameter in px.
    pub size: f64,
    /// Blur radius in px.
    pub blur: f64,
    /// Initial opacity.
    pub opacity: f64,
    /// Fade animation length in seconds.
    pub fade_secs: f64,
}

impl TrailVisual {
    /// Hue offset between gradient layers.
    pub const LAYER_SHIFT: f64 = 20.0;
    /// Speed at which the size factor saturates at 2.
    const SIZE_SPEED_SCALE: f64 = 10.0;
    /// Speed at which the fade shortening saturates.
    const FADE_SPEED_SCALE: f64 = 50.0;
    /// Fastest motion keeps at least 70% of the base fade.
    const MAX_FADE_CUT: f64 = 0.3;

    /// Maps time, pointer speed and jitter to marker visuals.
    #[must_use]
    pub fn compute(now_ms: f64, speed: f64, jitter: TrailJitter, config: &TrailConfig) -> Self {
        let base = Hsl::new(hue_at(now_ms, config.hue_period_ms), 85.0, 65.0);
        let layers = [
            base,
            Hsl::new(base.h + Self::LAYER_SHIFT, 80.0, 55.0),
            Hsl::new(base.h + 2.0 * Self::LAYER_SHIFT, 75.0, 45.0),
        ];

        let base_size = 3.0 + jitter.size * 2.0;
        let speed_factor = (speed / Self::SIZE_SPEED_SCALE).min(2.0);
        let size = base_size * (0.8 + speed_factor * 0.4);

        let cut = (speed / Self::FADE_SPEED_SCALE).min(Self::MAX_FADE_CUT);
        let fade_secs = config.base_fade_secs * (1.0 - cut);

        Self {
            layers,
            size,
            blur: 0.5 + jitter.blur * 0.8,
            opacity: 0.7 + jitter.opacity * 0.3,
            fade_secs,
        }
    }

    /// CSS `background` value.
    #[must_use]
    pub fn gradient(&self) -> String {
        format!(
            "radial-gradient(circle, {} 0%, {} 50%, {} 100%)",
            self.layers[0].to_css(),
            self.layers[1].to_css(),
            self.layers[2].to_css()
        )
    }

    /// Top-left corner that centres the marker on the pointer.
    #[must_use]
    pub fn origin(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.size / 2.0, y - self.size / 2.0)
    }
}

/// Ripple color for a click at `now_ms`.
#[must_use]
pub fn ripple_color(now_ms: f64, config: &RippleConfig) -> Hsl {
    Hsl::new(hue_at(now_ms, config.hue_period_ms), 90.0, 60.0)
}

/// Visual parameters of one rain drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropVisual {
    /// Horizontal position in viewport-width units.
    pub left_vw: f64,
    /// Streak length in px.
    pub length_px: f64,
    /// Opacity, 0.3 to 0.7.
    pub opacity: f64,
    /// Time to fall across the viewport, 1 to 3 s.
    pub fall_secs: f64,
    /// Delay before the fall starts, 0 to 2 s.
    pub delay_secs: f64,
}

impl DropVisual {
    /// Draws an independently randomized drop.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self::from_samples([rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen()])
    }

    /// Maps five samples in `[0, 1)` to a drop.
    #[must_use]
    pub fn from_samples(r: [f64; 5]) -> Self {
        Self {
            left_vw: r[0] * 100.0,
            length_px: 20.0 + r[1] * 30.0,
            opacity: 0.3 + r[2] * 0.4,
            fall_secs: 1.0 + r[3] * 2.0,
            delay_secs: r[4] * 2.0,
        }
    }

    /// Time until the drop has finished falling.
    #[must_use]
    pub fn lifetime_ms(&self) -> u32 {
        ((self.fall_secs + self.delay_secs) * 1000.0).ceil() as u32
    }
}

/// Formats a px length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value:.2}px")
}

/// Formats a seconds duration.
#[must_use]
pub fn secs(value: f64) -> String {
    format!("{value:.3}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STILL: TrailJitter = TrailJitter {
        size: 0.0,
        blur: 0.0,
        opacity: 0.0,
    };

    #[test]
    fn test_hue_rotates_with_time() {
        assert!((hue_at(0.0, 40.0)).abs() < 1e-9);
        assert!((hue_at(400.0, 40.0) - 10.0).abs() < 1e-9);
        assert!((hue_at(40.0 * 370.0, 40.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_layers_shift_and_wrap() {
        let config = TrailConfig::default();
        let visual = TrailVisual::compute(40.0 * 350.0, 0.0, STILL, &config);
        assert!((visual.layers[0].h - 350.0).abs() < 1e-9);
        assert!((visual.layers[1].h - 10.0).abs() < 1e-9);
        assert!((visual.layers[2].h - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_grows_with_speed_and_clamps() {
        let config = TrailConfig::default();
        let still = TrailVisual::compute(0.0, 0.0, STILL, &config);
        let fast = TrailVisual::compute(0.0, 20.0, STILL, &config);
        let faster = TrailVisual::compute(0.0, 500.0, STILL, &config);
        assert!((still.size - 2.4).abs() < 1e-9);
        assert!((fast.size - 3.0 * 1.6).abs() < 1e-9);
        assert!((faster.size - fast.size).abs() < 1e-9);
    }

    #[test]
    fn test_fade_floor_is_seventy_percent() {
        let config = TrailConfig::default();
        let still = TrailVisual::compute(0.0, 0.0, STILL, &config);
        let fast = TrailVisual::compute(0.0, 1_000.0, STILL, &config);
        assert!((still.fade_secs - 0.6).abs() < 1e-9);
        assert!((fast.fade_secs - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_origin_centres_marker() {
        let visual = TrailVisual::compute(0.0, 0.0, STILL, &TrailConfig::default());
        let (left, top) = visual.origin(100.0, 50.0);
        assert!((left - (100.0 - visual.size / 2.0)).abs() < 1e-9);
        assert!((top - (50.0 - visual.size / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drop_ranges() {
        let low = DropVisual::from_samples([0.0; 5]);
        let high = DropVisual::from_samples([0.999; 5]);
        assert!((low.length_px - 20.0).abs() < 1e-9);
        assert!(high.length_px < 50.0);
        assert_eq!(low.lifetime_ms(), 1000);
        assert!(high.lifetime_ms() <= 5000);
    }

    #[test]
    fn test_hsl_css() {
        assert_eq!(Hsl::new(370.0, 90.0, 60.0).to_css(), "hsl(10.0, 90%, 60%)");
    }
}
