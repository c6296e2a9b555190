//! User-facing animation controls
//!
//! The animator only reads this state; the UI and keyboard handlers are the
//! only writers.

use std::ops::RangeInclusive;

/// Range and step of the speed slider
pub const SPEED_RANGE: RangeInclusive<f32> = 0.1..=10.0;
pub const SPEED_STEP: f32 = 0.1;
/// Keyboard +/- increment
pub const SPEED_KEY_STEP: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationControls {
    pub paused: bool,
    pub speed_multiplier: f32,
    pub orbits_visible: bool,
}

impl Default for AnimationControls {
    fn default() -> Self {
        Self {
            paused: false,
            speed_multiplier: 1.0,
            orbits_visible: true,
        }
    }
}

impl AnimationControls {
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn toggle_orbits(&mut self) {
        self.orbits_visible = !self.orbits_visible;
    }

    /// Set the multiplier, snapped to the slider's step and range
    pub fn set_speed_multiplier(&mut self, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        let snapped = (speed / SPEED_STEP).round() * SPEED_STEP;
        self.speed_multiplier = snapped.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
        log::debug!("Speed: {:.1}x", self.speed_multiplier);
    }

    pub fn speed_up(&mut self) {
        self.set_speed_multiplier(self.speed_multiplier + SPEED_KEY_STEP);
    }

    pub fn slow_down(&mut self) {
        self.set_speed_multiplier(self.speed_multiplier - SPEED_KEY_STEP);
    }

    pub fn pause_label(&self) -> &'static str {
        if self.paused {
            "Play"
        } else {
            "Pause"
        }
    }

    pub fn orbits_label(&self) -> &'static str {
        if self.orbits_visible {
            "Hide Orbits"
        } else {
            "Show Orbits"
        }
    }

    /// Multiplier as shown next to the slider: "1x", "2.5x"
    pub fn speed_label(&self) -> String {
        let tenths = (self.speed_multiplier * 10.0).round() / 10.0;
        format!("{tenths}x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_a_fresh_view() {
        let controls = AnimationControls::default();
        assert!(!controls.paused);
        assert_eq!(controls.speed_multiplier, 1.0);
        assert!(controls.orbits_visible);
        assert_eq!(controls.pause_label(), "Pause");
        assert_eq!(controls.orbits_label(), "Hide Orbits");
    }

    #[test]
    fn toggles_flip_state_and_labels() {
        let mut controls = AnimationControls::default();
        controls.toggle_pause();
        controls.toggle_orbits();
        assert!(controls.paused);
        assert!(!controls.orbits_visible);
        assert_eq!(controls.pause_label(), "Play");
        assert_eq!(controls.orbits_label(), "Show Orbits");
    }

    #[test]
    fn speed_is_kept_inside_slider_range() {
        let mut controls = AnimationControls::default();
        controls.set_speed_multiplier(42.0);
        assert_eq!(controls.speed_multiplier, 10.0);
        controls.set_speed_multiplier(0.0);
        assert!((controls.speed_multiplier - 0.1).abs() < 1e-6);
        controls.set_speed_multiplier(f32::NAN);
        assert!((controls.speed_multiplier - 0.1).abs() < 1e-6);
    }

    #[test]
    fn keyboard_steps() {
        let mut controls = AnimationControls::default();
        controls.speed_up();
        assert!((controls.speed_multiplier - 1.5).abs() < 1e-5);
        for _ in 0..10 {
            controls.slow_down();
        }
        assert!((controls.speed_multiplier - 0.1).abs() < 1e-5);
    }

    #[test_case(1.0, "1x")]
    #[test_case(2.5, "2.5x")]
    #[test_case(0.1, "0.1x")]
    #[test_case(10.0, "10x")]
    fn speed_label_drops_trailing_zeroes(speed: f32, expected: &str) {
        let mut controls = AnimationControls::default();
        controls.set_speed_multiplier(speed);
        assert_eq!(controls.speed_label(), expected);
    }

    #[test]
    fn speed_label_hides_float_noise_from_key_steps() {
        let mut controls = AnimationControls::default();
        controls.speed_up();
        controls.speed_up();
        controls.speed_up();
        assert_eq!(controls.speed_label(), "2.5x");
    }
}
