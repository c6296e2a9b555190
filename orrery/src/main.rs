//! Orrery - animated solar system
//!
//! Controls:
//! - Space: Pause/resume
//! - O: Show/hide orbit guides
//! - +/-: Speed multiplier
//! - V: Switch between the 2D and 3D views
//! - Left click: Show info for a planet
//! - Esc: Close the info panel
//! - Right drag: Orbit the 3D camera
//! - Scroll: Zoom

use std::time::Instant;

use anyhow::Context as _;
use common::{Camera2D, Camera3D, CameraUniform, GraphicsContext};
use glam::Vec2;
use orrery::{
    geometry::{orbit_ring, Starfield, ORBIT_SEGMENTS},
    renderer::Renderer,
    scene::pick,
    ui::{draw_body_list, draw_controls, draw_planet_info, draw_status_bar, StatusLine},
    AnimationControls, BodyId, Catalog, FrameDriver, OrbitAnimator, OrreryConfig, Projection,
    SceneGraph, ViewportScale,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const FLAT_STAR_EXTENT: f32 = 2500.0;
const ORBITAL_STAR_SHELL: f32 = 8000.0;
/// Clicks that move further than this are treated as drags
const CLICK_SLOP: f32 = 4.0;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    config: OrreryConfig,
    renderer: Renderer,
    catalog: Catalog,
    animator: OrbitAnimator,
    scene: SceneGraph,
    controls: AnimationControls,
    driver: FrameDriver,
    camera_2d: Camera2D,
    camera_3d: Camera3D,
    flat_stars: Starfield,
    orbital_stars: Starfield,
    selected: Option<BodyId>,

    left_press: Option<Vec2>,
    right_pressed: bool,
    cursor: Vec2,
    last_drag: Option<Vec2>,

    fps: f32,
    fps_frames: u32,
    fps_timer: Instant,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, config: OrreryConfig) -> Self {
        let catalog = Catalog::solar_system();
        let scale = Self::fit_scale(&catalog, &config, ctx.size);
        let animator = OrbitAnimator::new(&catalog, scale, config.animator);
        let scene = SceneGraph::mount_catalog(&catalog);

        let star_count = config.stars.count;
        let max_instances = 1 + catalog.len() + star_count;
        let max_guide_vertices = catalog.len() * (ORBIT_SEGMENTS + 1);
        let renderer = Renderer::new(&ctx, max_instances, max_guide_vertices);

        let camera_2d = Camera2D::new(ctx.size.width, ctx.size.height);
        let mut camera_3d = Camera3D::new(ctx.aspect_ratio());
        camera_3d.frame_radius(scale.apply(catalog.max_base_orbit_radius()));

        let flat_stars = Starfield::generate(star_count, config.stars.seed, FLAT_STAR_EXTENT, Projection::Flat);
        let orbital_stars =
            Starfield::generate(star_count, config.stars.seed, ORBITAL_STAR_SHELL, Projection::Orbital);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        let mut app = Self {
            ctx,
            config,
            renderer,
            catalog,
            animator,
            scene,
            controls: AnimationControls::default(),
            driver: FrameDriver::new(),
            camera_2d,
            camera_3d,
            flat_stars,
            orbital_stars,
            selected: None,
            left_press: None,
            right_pressed: false,
            cursor: Vec2::ZERO,
            last_drag: None,
            fps: 0.0,
            fps_frames: 0,
            fps_timer: Instant::now(),
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        };
        app.rebuild_guides();
        log::info!(
            "Loaded {} bodies, viewport scale {:.3}",
            app.catalog.len(),
            scale.value()
        );
        app
    }

    fn fit_scale(catalog: &Catalog, config: &OrreryConfig, size: PhysicalSize<u32>) -> ViewportScale {
        ViewportScale::fit(
            size.width as f32,
            size.height as f32,
            catalog.max_base_orbit_radius(),
            &config.scale,
        )
    }

    fn rebuild_guides(&mut self) {
        let projection = self.animator.projection();
        let guides: Vec<_> = self
            .animator
            .bodies()
            .iter()
            .map(|b| (b.id, orbit_ring(b.effective_radius, projection, ORBIT_SEGMENTS)))
            .collect();
        self.renderer.set_orbit_guides(&self.ctx.queue, &guides);
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        let size = self.ctx.size;
        self.renderer.resize(&self.ctx.device, size.width, size.height);
        self.camera_2d.resize(size.width, size.height);
        self.camera_3d.update_aspect_ratio(self.ctx.aspect_ratio());

        let scale = Self::fit_scale(&self.catalog, &self.config, size);
        if scale != self.animator.scale() {
            self.animator.rescale(scale);
            self.camera_3d
                .frame_radius(scale.apply(self.catalog.max_base_orbit_radius()));
            self.rebuild_guides();
        }
    }

    fn set_projection(&mut self, projection: Projection) {
        if projection == self.animator.projection() {
            return;
        }
        self.animator.set_projection(projection);
        self.rebuild_guides();
        log::info!("Switched to {} view", projection.label());
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.ctx.size.width as f32, self.ctx.size.height as f32)
    }

    fn camera_uniform(&self) -> CameraUniform {
        match self.animator.projection() {
            Projection::Flat => CameraUniform::from_camera_2d(&self.camera_2d),
            Projection::Orbital => CameraUniform::from_camera_3d(&self.camera_3d),
        }
    }

    /// Screen pixels per world unit around the orbit plane
    fn pixels_per_unit(&self) -> f32 {
        match self.animator.projection() {
            Projection::Flat => self.camera_2d.zoom,
            Projection::Orbital => {
                let half_height = self.camera_3d.distance * (self.camera_3d.fov * 0.5).tan();
                self.viewport().y * 0.5 / half_height.max(f32::EPSILON)
            }
        }
    }

    fn frame(&mut self, elapsed: f32) -> Result<(), wgpu::SurfaceError> {
        let frame = self.animator.tick(&self.controls, Some(elapsed));
        frame.publish(&mut self.scene);

        self.fps_frames += 1;
        let window = self.fps_timer.elapsed().as_secs_f32();
        if window >= 1.0 {
            self.fps = self.fps_frames as f32 / window;
            self.fps_frames = 0;
            self.fps_timer = Instant::now();
        }

        self.render()
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (stars, star_scale) = match self.animator.projection() {
            Projection::Flat => (&self.flat_stars, 1.0),
            Projection::Orbital => (&self.orbital_stars, ORBITAL_STAR_SHELL * 0.0025),
        };
        let render_data = self.renderer.update(
            &self.ctx.queue,
            &self.camera_uniform(),
            &self.scene,
            stars,
            star_scale,
        );

        let mut projection = self.animator.projection();
        let status = StatusLine {
            scale: self.animator.scale().value(),
            fps: self.fps,
            paused: self.controls.paused,
            projection,
        };

        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_status_bar(ctx, &status);
            draw_body_list(ctx, &self.catalog, &mut self.selected);
            draw_controls(ctx, &mut self.controls, &mut projection);

            if let Some(spec) = self.selected.and_then(|id| self.catalog.get(id)) {
                if !draw_planet_info(ctx, spec) {
                    self.selected = None;
                }
            }
        });
        self.set_projection(projection);

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &render_data);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => self.controls.toggle_pause(),
            KeyCode::KeyO => self.controls.toggle_orbits(),
            KeyCode::Equal | KeyCode::NumpadAdd => self.controls.speed_up(),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.controls.slow_down(),
            KeyCode::KeyV => self.set_projection(self.animator.projection().toggled()),
            KeyCode::Escape => self.selected = None,
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left if pressed => self.left_press = Some(self.cursor),
            MouseButton::Left => {
                if let Some(start) = self.left_press.take() {
                    if start.distance(self.cursor) <= CLICK_SLOP {
                        self.select_at(self.cursor);
                    }
                }
            }
            MouseButton::Right => {
                self.right_pressed = pressed;
                self.last_drag = None;
            }
            _ => {}
        }
    }

    fn select_at(&mut self, cursor: Vec2) {
        let view_proj = self.camera_uniform().view_projection();
        let picked = pick(
            &self.scene,
            cursor,
            view_proj,
            self.viewport(),
            self.pixels_per_unit(),
        );
        if let Some(id) = picked {
            log::debug!(
                "Picked {}",
                self.catalog.get(id).map(|b| b.name.as_str()).unwrap_or("?")
            );
            self.selected = Some(id);
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);
        if self.right_pressed && self.animator.projection() == Projection::Orbital {
            if let Some(last) = self.last_drag {
                let delta = (self.cursor - last) * 0.01;
                self.camera_3d.orbit(delta.x, delta.y);
            }
            self.last_drag = Some(self.cursor);
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        match self.animator.projection() {
            Projection::Flat => self.camera_2d.zoom_by(delta),
            Projection::Orbital => self.camera_3d.zoom(delta * self.camera_3d.distance * 0.1),
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = OrreryConfig::default();
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    ))?;
    log::info!("Window {}x{} ready", ctx.size.width, ctx.size.height);

    let mut app = App::new(ctx, config);

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { ref event, .. } => {
                    let consumed = app.handle_window_event(event);

                    match event {
                        WindowEvent::CloseRequested => {
                            app.driver.cancel();
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => {
                            app.resize(*size);
                            app.driver.rearm();
                        }
                        WindowEvent::Occluded(false) => app.driver.rearm(),
                        WindowEvent::RedrawRequested => {
                            if app.driver.is_cancelled() {
                                return;
                            }
                            // Redraws we did not ask for (expose, live resize) repaint without ticking
                            let result = match app.driver.begin(Instant::now()) {
                                Some(elapsed) => app.frame(elapsed),
                                None => app.render(),
                            };
                            match result {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    log::warn!("Surface lost, reconfiguring");
                                    app.ctx.reconfigure();
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("Out of GPU memory, exiting");
                                    app.driver.cancel();
                                    elwt.exit();
                                }
                                Err(e) => log::warn!("Render error: {:?}", e),
                            }
                        }
                        _ if consumed => {}
                        WindowEvent::MouseInput { state, button, .. } => {
                            app.handle_mouse_button(*button, *state);
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if app.driver.request() {
                        app.ctx.window.request_redraw();
                    }
                }
                _ => {}
            }
        })
        .context("event loop error")?;

    Ok(())
}
