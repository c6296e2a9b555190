//! Shared window, GPU and camera utilities
//!
//! Used by the orrery viewer for surface setup, camera math and
//! line-vertex helpers.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
