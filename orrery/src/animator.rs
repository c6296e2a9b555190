//! Per-frame orbital motion
//!
//! The animator owns every body's angle and spin. Each `tick` reads the
//! current controls, advances the accumulators unless paused, and returns a
//! [`Frame`] of render commands for the scene. Bodies are independent of
//! each other, so the order in which they are updated does not matter.

use std::f64::consts::TAU;

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::{BodyId, Catalog};
use crate::controls::AnimationControls;
use crate::scene::Scene;
use crate::viewport::ViewportScale;

/// Plane the orbits are drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Projection {
    /// Top-down view, orbits in the XY plane
    #[default]
    Flat,
    /// Perspective view, orbits in the XZ plane
    Orbital,
}

impl Projection {
    pub fn toggled(self) -> Self {
        match self {
            Projection::Flat => Projection::Orbital,
            Projection::Orbital => Projection::Flat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Projection::Flat => "2D",
            Projection::Orbital => "3D",
        }
    }
}

/// How much animation one tick represents
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Timing {
    /// Exactly one nominal frame per tick, regardless of wall-clock jitter
    #[default]
    PerFrame,
    /// Elapsed seconds are converted to nominal frames at `reference_fps`
    RealTime { reference_fps: f32 },
}

impl Timing {
    fn frames(self, elapsed: Option<f32>) -> f64 {
        match (self, elapsed) {
            (Timing::RealTime { reference_fps }, Some(seconds)) if seconds.is_finite() => {
                f64::from(seconds.max(0.0)) * f64::from(reference_fps)
            }
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimatorConfig {
    pub projection: Projection,
    /// Self-rotation in radians per frame at multiplier 1
    pub spin_rate: f32,
    pub timing: Timing,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Flat,
            spin_rate: 0.001,
            timing: Timing::PerFrame,
        }
    }
}

/// Animation state of one body
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    pub id: BodyId,
    pub name: String,
    pub base_orbit_radius: f32,
    pub angular_speed: f32,
    pub effective_radius: f32,
    /// Degrees, accumulated without wraparound. Kept in f64 so slow bodies
    /// still advance after hours of running.
    pub angle: f64,
    /// Radians of self-rotation
    pub spin: f64,
}

impl OrbitalBody {
    pub fn position(&self, projection: Projection) -> Vec3 {
        orbit_position(self.angle, self.effective_radius, projection)
    }
}

/// Point on a circular orbit for an angle in degrees
pub fn orbit_position(angle_deg: f64, radius: f32, projection: Projection) -> Vec3 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (sin, cos) = (sin as f32, cos as f32);
    match projection {
        Projection::Flat => Vec3::new(cos * radius, sin * radius, 0.0),
        Projection::Orbital => Vec3::new(cos * radius, 0.0, sin * radius),
    }
}

/// Instruction for the scene produced by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    SetPosition { body: BodyId, position: Vec3 },
    SetRotation { body: BodyId, angle: f32 },
    SetOrbitGuideVisible { body: BodyId, visible: bool },
}

/// Commands produced by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<RenderCommand>,
}

impl Frame {
    /// Apply every command to `scene`. Bodies the scene has not mounted are skipped by the scene.
    pub fn publish<S: Scene + ?Sized>(&self, scene: &mut S) {
        for command in &self.commands {
            match *command {
                RenderCommand::SetPosition { body, position } => scene.set_position(body, position),
                RenderCommand::SetRotation { body, angle } => scene.set_rotation(body, angle),
                RenderCommand::SetOrbitGuideVisible { body, visible } => {
                    scene.set_orbit_guide_visible(body, visible)
                }
            }
        }
    }
}

pub struct OrbitAnimator {
    bodies: Vec<OrbitalBody>,
    scale: ViewportScale,
    config: AnimatorConfig,
    ticks: u64,
}

impl OrbitAnimator {
    pub fn new(catalog: &Catalog, scale: ViewportScale, config: AnimatorConfig) -> Self {
        let bodies = catalog
            .iter()
            .map(|(id, spec)| OrbitalBody {
                id,
                name: spec.name.clone(),
                base_orbit_radius: spec.base_orbit_radius,
                angular_speed: spec.angular_speed,
                effective_radius: scale.apply(spec.base_orbit_radius),
                angle: 0.0,
                spin: 0.0,
            })
            .collect();

        Self {
            bodies,
            scale,
            config,
            ticks: 0,
        }
    }

    /// Recompute effective radii. Angles are kept.
    pub fn rescale(&mut self, scale: ViewportScale) {
        if scale == self.scale {
            return;
        }
        self.scale = scale;
        for body in &mut self.bodies {
            body.effective_radius = scale.apply(body.base_orbit_radius);
        }
        log::info!("Viewport scale set to {:.3}", scale.value());
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.config.projection = projection;
    }

    /// Advance one tick. `elapsed` is only consulted with [`Timing::RealTime`].
    pub fn tick(&mut self, controls: &AnimationControls, elapsed: Option<f32>) -> Frame {
        if !controls.paused {
            let frames = self.config.timing.frames(elapsed) * f64::from(controls.speed_multiplier);
            let spin_step = f64::from(self.config.spin_rate) * frames;
            for body in &mut self.bodies {
                body.angle += f64::from(body.angular_speed) * frames;
                body.spin += spin_step;
            }
        }
        self.ticks += 1;

        let projection = self.config.projection;
        let mut commands = Vec::with_capacity(self.bodies.len() * 3);
        for body in &self.bodies {
            commands.push(RenderCommand::SetPosition {
                body: body.id,
                position: body.position(projection),
            });
            commands.push(RenderCommand::SetRotation {
                body: body.id,
                angle: body.spin.rem_euclid(TAU) as f32,
            });
            commands.push(RenderCommand::SetOrbitGuideVisible {
                body: body.id,
                visible: controls.orbits_visible,
            });
        }

        Frame { commands }
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitalBody> {
        self.bodies.get(id.index())
    }

    pub fn position_of(&self, id: BodyId) -> Option<Vec3> {
        self.body(id).map(|b| b.position(self.config.projection))
    }

    pub fn scale(&self) -> ViewportScale {
        self.scale
    }

    pub fn projection(&self) -> Projection {
        self.config.projection
    }

    /// Ticks processed, paused or not
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
