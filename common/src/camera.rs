//! Cameras for the flat and orbital views

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Top-down orthographic camera. One world unit maps to one physical pixel at zoom 1.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec3,
    pub zoom: f32,
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(width.max(1) as f32, height.max(1) as f32),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let half_width = self.viewport.x * 0.5 / self.zoom;
        let half_height = self.viewport.y * 0.5 / self.zoom;

        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_height,
            half_height,
            -1000.0,
            1000.0,
        );

        projection * Mat4::from_translation(-self.position)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom * (1.0 + delta * 0.1)).clamp(0.1, 10.0);
    }
}

/// Perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 1.0,
            far: 20_000.0,
            distance: 1000.0,
            yaw: 0.0,
            pitch: 0.6,
        };
        camera.update_orbital();
        camera
    }

    /// Recompute the eye position from distance/yaw/pitch
    pub fn update_orbital(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                self.distance * self.pitch.cos() * self.yaw.cos(),
            );
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).max(self.near * 10.0);
        self.update_orbital();
    }

    /// Pull back far enough that a disc of `radius` around the target fits the vertical field of view
    pub fn frame_radius(&mut self, radius: f32) {
        let half_fov = self.fov * 0.5;
        self.distance = (radius.max(1.0) / half_fov.tan()) * 1.1;
        self.far = self.distance * 20.0;
        self.update_orbital();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_3d(camera: &Camera3D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
        }
    }

    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        // Billboards in the flat view face +Z, which the identity view already does.
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            position: (camera.position + Vec3::Z * 500.0).extend(1.0).to_array(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

/// Project a world point to window pixels (origin top-left). `None` if it is behind the camera.
pub fn world_to_screen(view_proj: Mat4, point: Vec3, viewport: Vec2) -> Option<Vec2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    ))
}
