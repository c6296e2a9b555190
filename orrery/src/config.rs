//! Compile-time defaults for the viewer

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animator::AnimatorConfig;
use crate::viewport::ScaleConfig;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrreryConfig {
    pub window: WindowConfig,
    pub scale: ScaleConfig,
    pub animator: AnimatorConfig,
    pub stars: StarConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarConfig {
    pub count: usize,
    pub seed: u64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 1500,
            seed: 0x5EED,
        }
    }
}
