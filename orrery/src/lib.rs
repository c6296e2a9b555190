//! Animated solar-system orrery
//!
//! Nine bodies circle a central sun. Once per display refresh the
//! [`OrbitAnimator`](animator::OrbitAnimator) advances every body's angle,
//! honoring a global pause flag and speed multiplier, and publishes the
//! resulting positions to a [`Scene`](scene::Scene):
//!
//! - **catalog**: static per-body constants and info-panel facts
//! - **viewport**: fit orbit radii to the window
//! - **controls**: pause, speed and orbit-guide toggles
//! - **animator**: the per-frame orbital update
//! - **scene**: render handles keyed by body id, and picking
//! - **driver**: one-frame-at-a-time scheduling with cancellation
//! - **renderer** / **ui**: wgpu drawing and egui panels

pub mod catalog;
pub mod viewport;
pub mod controls;
pub mod animator;
pub mod scene;
pub mod geometry;
pub mod driver;
pub mod config;
pub mod renderer;
pub mod ui;

pub use animator::{AnimatorConfig, Frame, OrbitAnimator, Projection, RenderCommand, Timing};
pub use catalog::{BodyId, BodySpec, Catalog};
pub use config::OrreryConfig;
pub use controls::AnimationControls;
pub use driver::FrameDriver;
pub use scene::{Scene, SceneGraph};
pub use viewport::{ScaleConfig, ViewportScale};
