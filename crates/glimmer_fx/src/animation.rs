//! CSS transitions used for element exits and entrances.
//!
//! The browser does the interpolation; this module only names the curves
//! and formats the `transition` property. Every exit pairs a transition
//! with a detach timer of the same length.

/// CSS timing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// `linear`
    Linear,
    /// `ease`
    #[default]
    Ease,
    /// `ease-in`
    EaseIn,
    /// `ease-out`
    EaseOut,
    /// `ease-in-out`
    EaseInOut,
}

impl Easing {
    /// CSS keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// A `transition` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Property being transitioned (`all`, `opacity`, ...).
    pub property: &'static str,
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Timing function.
    pub easing: Easing,
}

impl Transition {
    /// Creates a transition over every property.
    #[must_use]
    pub const fn all(duration_ms: u32, easing: Easing) -> Self {
        Self {
            property: "all",
            duration_ms,
            easing,
        }
    }

    /// CSS value, e.g. `all 0.5s ease`.
    #[must_use]
    pub fn to_css(self) -> String {
        let seconds = f64::from(self.duration_ms) / 1000.0;
        format!("{} {}s {}", self.property, seconds, self.easing.as_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_css() {
        assert_eq!(Transition::all(500, Easing::Ease).to_css(), "all 0.5s ease");
        assert_eq!(Transition::all(300, Easing::EaseOut).to_css(), "all 0.3s ease-out");
    }
}
