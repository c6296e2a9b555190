//! Frame scheduling
//!
//! The window's redraw request is the "next frame" primitive. At most one
//! request is outstanding, the next one is made only after the current
//! frame has been handled, and `cancel` stops the loop before the scene is
//! torn down. Slow frames are dropped by the host rather than queued.

use std::time::Instant;

/// Elapsed time reported for a single frame is capped at this many seconds
pub const MAX_FRAME_SECONDS: f32 = 0.1;

#[derive(Debug, Default)]
pub struct FrameDriver {
    pending: bool,
    cancelled: bool,
    last_frame: Option<Instant>,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for another frame. Returns `true` if the caller should issue the
    /// platform request (nothing pending and not cancelled).
    pub fn request(&mut self) -> bool {
        if self.pending || self.cancelled {
            return false;
        }
        self.pending = true;
        true
    }

    /// Start a frame, consuming the pending request. Returns the elapsed
    /// seconds since the previous frame (0 for the first one), or `None` if
    /// no frame was requested or the driver has been cancelled.
    pub fn begin(&mut self, now: Instant) -> Option<f32> {
        if self.cancelled || !self.pending {
            return None;
        }
        self.pending = false;
        self.frames += 1;

        let elapsed = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32().min(MAX_FRAME_SECONDS))
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        Some(elapsed)
    }

    /// Drop an outstanding request the platform may never deliver (window
    /// hidden or resized mid-frame) so the next `request` issues a fresh one.
    pub fn rearm(&mut self) {
        self.pending = false;
    }

    /// Stop scheduling. Any outstanding request is dropped.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::info!("Frame loop cancelled after {} frames", self.frames);
        }
        self.cancelled = true;
        self.pending = false;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn one_request_outstanding_at_a_time() {
        let mut driver = FrameDriver::new();
        assert!(driver.request());
        assert!(!driver.request());
        assert!(driver.is_pending());

        let t0 = Instant::now();
        assert_eq!(driver.begin(t0), Some(0.0));
        // Spurious redraw without a request does not tick
        assert_eq!(driver.begin(t0), None);
        assert!(driver.request());
    }

    #[test]
    fn elapsed_is_measured_and_capped() {
        let mut driver = FrameDriver::new();
        let t0 = Instant::now();
        driver.request();
        driver.begin(t0);

        driver.request();
        let elapsed = driver.begin(t0 + Duration::from_millis(16)).unwrap();
        assert!((elapsed - 0.016).abs() < 1e-4);

        driver.request();
        let elapsed = driver.begin(t0 + Duration::from_secs(5)).unwrap();
        assert_eq!(elapsed, MAX_FRAME_SECONDS);
        assert_eq!(driver.frames(), 3);
    }

    #[test]
    fn cancel_stops_pending_and_future_frames() {
        let mut driver = FrameDriver::new();
        driver.request();
        driver.cancel();

        assert!(driver.is_cancelled());
        assert_eq!(driver.begin(Instant::now()), None);
        assert!(!driver.request());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn rearm_recovers_from_a_dropped_request() {
        let mut driver = FrameDriver::new();
        assert!(driver.request());
        // The platform swallowed that redraw; nothing new can be requested
        assert!(!driver.request());

        driver.rearm();
        assert!(!driver.is_pending());
        assert!(driver.request());
        assert!(driver.begin(Instant::now()).is_some());
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn unrequested_redraws_do_not_disturb_timing() {
        let mut driver = FrameDriver::new();
        let t0 = Instant::now();
        driver.request();
        driver.begin(t0);

        assert_eq!(driver.begin(t0 + Duration::from_millis(8)), None);
        driver.request();
        let elapsed = driver.begin(t0 + Duration::from_millis(16)).unwrap();
        assert!((elapsed - 0.016).abs() < 1e-4);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn rearm_does_not_revive_a_cancelled_driver() {
        let mut driver = FrameDriver::new();
        driver.cancel();
        driver.rearm();
        assert!(!driver.request());
        assert!(driver.is_cancelled());
    }
}
