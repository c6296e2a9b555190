//! Viewport-fit scaling of orbit radii

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fit parameters. Padding is the total margin (both sides) in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleConfig {
    pub padding: f32,
    pub scale_min: f32,
    pub scale_max: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            padding: 100.0,
            scale_min: 0.3,
            scale_max: 2.0,
        }
    }
}

impl ScaleConfig {
    /// Viewport edge length at which the outermost orbit fits exactly at scale 1
    pub fn reference_extent(&self, max_base_radius: f32) -> f32 {
        2.0 * max_base_radius + self.padding
    }

    /// Clamp bounds as `(low, high)`. Swapped bounds are put in order, a NaN
    /// bound defers to the other one, and if both are NaN the defaults apply.
    pub fn bounds(&self) -> (f32, f32) {
        let low = self.scale_min.min(self.scale_max);
        let high = self.scale_max.max(self.scale_min);
        if low.is_nan() {
            let defaults = Self::default();
            return (defaults.scale_min, defaults.scale_max);
        }
        (low, high)
    }
}

/// Multiplier from base orbit radius to on-screen radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScale(f32);

impl ViewportScale {
    pub const UNIT: Self = Self(1.0);

    /// `clamp((min(w, h) - padding) / (2 * max_base_radius), min, max)`.
    ///
    /// Dimensions below one pixel are treated as one pixel. A quotient that is
    /// not a finite positive number (tiny viewport, empty catalog) resolves to
    /// the nearest clamp bound, so the result is always finite.
    pub fn fit(width: f32, height: f32, max_base_radius: f32, config: &ScaleConfig) -> Self {
        let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
        let height = if height.is_finite() { height.max(1.0) } else { 1.0 };
        let available = width.min(height) - config.padding;

        let (low, high) = config.bounds();
        let raw = available / (2.0 * max_base_radius);
        let scale = if raw.is_nan() {
            low
        } else {
            // +inf and -inf clamp to the bounds like any other value
            raw.clamp(low, high)
        };

        if scale.is_finite() {
            Self(scale)
        } else {
            Self::UNIT
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Effective radius for a base orbit radius
    pub fn apply(self, base_radius: f32) -> f32 {
        base_radius * self.0
    }
}

impl Default for ViewportScale {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const MAX_R: f32 = 500.0;

    #[test]
    fn reference_viewport_is_unscaled() {
        let config = ScaleConfig::default();
        let edge = config.reference_extent(MAX_R);
        assert_eq!(edge, 1100.0);

        let scale = ViewportScale::fit(edge, edge, MAX_R, &config);
        assert!((scale.value() - 1.0).abs() < 1e-6);

        // The narrower dimension decides
        let wide = ViewportScale::fit(4000.0, edge, MAX_R, &config);
        assert!((wide.value() - 1.0).abs() < 1e-6);
    }

    #[test_case(0.0, 0.0 ; "zero")]
    #[test_case(-50.0, 300.0 ; "negative")]
    #[test_case(1.0, 1.0 ; "one pixel")]
    #[test_case(640.0, 480.0 ; "small")]
    #[test_case(1920.0, 1080.0 ; "hd")]
    #[test_case(10_000.0, 8_000.0 ; "huge")]
    #[test_case(f32::NAN, f32::INFINITY ; "non finite")]
    fn scale_stays_within_bounds(width: f32, height: f32) {
        let config = ScaleConfig::default();
        let scale = ViewportScale::fit(width, height, MAX_R, &config).value();
        assert!(scale.is_finite());
        assert!(scale >= config.scale_min && scale <= config.scale_max, "{scale}");
    }

    #[test]
    fn degenerate_catalog_does_not_divide_by_zero() {
        let config = ScaleConfig::default();
        let scale = ViewportScale::fit(800.0, 600.0, 0.0, &config).value();
        assert_eq!(scale, config.scale_max);

        let scale = ViewportScale::fit(50.0, 50.0, 0.0, &config).value();
        assert_eq!(scale, config.scale_min);
    }

    #[test]
    fn fit_is_linear_between_bounds() {
        let config = ScaleConfig::default();
        let scale = ViewportScale::fit(800.0, 900.0, MAX_R, &config);
        assert!((scale.value() - 0.7).abs() < 1e-6);
        assert!((scale.apply(100.0) - 70.0).abs() < 1e-4);
    }

    #[test]
    fn bounds_are_configurable() {
        let config = ScaleConfig {
            padding: 0.0,
            scale_min: 0.5,
            scale_max: 1.5,
        };
        assert_eq!(ViewportScale::fit(100.0, 100.0, MAX_R, &config).value(), 0.5);
        assert_eq!(ViewportScale::fit(5000.0, 5000.0, MAX_R, &config).value(), 1.5);
    }

    #[test_case(2.0, 0.3, (0.3, 2.0) ; "swapped")]
    #[test_case(f32::NAN, 1.5, (1.5, 1.5) ; "nan min")]
    #[test_case(0.5, f32::NAN, (0.5, 0.5) ; "nan max")]
    #[test_case(f32::NAN, f32::NAN, (0.3, 2.0) ; "both nan")]
    fn malformed_bounds_are_normalized(scale_min: f32, scale_max: f32, expected: (f32, f32)) {
        let config = ScaleConfig {
            padding: 100.0,
            scale_min,
            scale_max,
        };
        assert_eq!(config.bounds(), expected);

        let (low, high) = expected;
        for (w, h) in [(1.0, 1.0), (800.0, 900.0), (10_000.0, 10_000.0)] {
            let scale = ViewportScale::fit(w, h, MAX_R, &config).value();
            assert!(scale >= low && scale <= high, "{scale}");
        }
    }

    #[test]
    fn unbounded_config_still_yields_a_finite_scale() {
        let config = ScaleConfig {
            padding: 100.0,
            scale_min: f32::NEG_INFINITY,
            scale_max: f32::INFINITY,
        };
        assert!(ViewportScale::fit(800.0, 600.0, 0.0, &config).value().is_finite());
        assert!((ViewportScale::fit(1100.0, 1100.0, MAX_R, &config).value() - 1.0).abs() < 1e-6);
    }
}
