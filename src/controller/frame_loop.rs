use std::collections::VecDeque;

use glam::{Mat4, Vec3};

use crate::config::{AppConfig, LightingConfig, ViewConfig};
use crate::controller::NavCommand;
use crate::model::{NavigationPoint, Scene};
use crate::view::{FrameGlobals, ObjectDraw, Renderer};

/// Wall-clock bookkeeping for the frame loop. Latches on the first tick.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous tick; 0 on the first one.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.previous {
            None => 0.0,
            Some(previous) if now_ms < previous => {
                tracing::warn!(previous, now_ms, "frame timestamp went backwards");
                0.0
            }
            Some(previous) => now_ms - previous,
        };
        self.previous = Some(now_ms);
        delta
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub delta_ms: f64,
    pub commands_applied: usize,
    pub objects_drawn: usize,
}

/// Owns the camera and the scene and runs the update/compose/draw cycle.
pub struct FrameDriver {
    camera: NavigationPoint,
    scene: Scene,
    clock: FrameClock,
    pending: VecDeque<NavCommand>,
    view: ViewConfig,
    lighting: LightingConfig,
    aspect: f32,
}

impl FrameDriver {
    pub fn new(scene: Scene, config: &AppConfig) -> Self {
        Self {
            camera: NavigationPoint::new(),
            scene,
            clock: FrameClock::new(),
            pending: VecDeque::new(),
            view: config.view.clone(),
            lighting: config.lighting.clone(),
            aspect: config.canvas.width as f32 / config.canvas.height.max(1) as f32,
        }
    }

    pub fn camera(&self) -> &NavigationPoint {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue one input command; applied in arrival order on the next tick.
    pub fn enqueue(&mut self, command: NavCommand) {
        tracing::trace!(?command, "queued");
        self.pending.push_back(command);
    }

    /// One-time upload of the scene geometry.
    pub fn register<R: Renderer>(&self, renderer: &mut R) {
        let buffers = self.scene.buffers();
        tracing::debug!(vertices = buffers.positions.len(), indices = buffers.indices.len(), "registering geometry");
        renderer.register_geometry(buffers);
    }

    /// Viewport size changed. Zero-sized viewports keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        tracing::debug!(width, height, aspect = self.aspect, "viewport resized");
    }

    /// Camera matrix composed with the perspective projection.
    pub fn view_projection(&self) -> Mat4 {
        let eye = self.camera.position;
        let direction = self.camera.direction();
        // World up is degenerate when looking straight up or down.
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-8 {
            self.camera.up_vector()
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(eye, eye + direction, up);
        let proj = Mat4::perspective_rh(self.view.fov_y, self.aspect, self.view.z_near, self.view.z_far);
        proj * view
    }

    /// Runs one frame: time step, input, object updates, view composition, draw submission.
    pub fn tick<R: Renderer>(&mut self, now_ms: f64, renderer: &mut R) -> FrameReport {
        let delta_ms = self.clock.tick(now_ms);

        let commands_applied = self.pending.len();
        while let Some(command) = self.pending.pop_front() {
            if !self.camera.apply(command) {
                tracing::trace!(?command, "tilt clamped");
            }
        }

        self.scene.update(delta_ms, now_ms);

        let globals = FrameGlobals {
            view_proj: self.view_projection(),
            light_direction: self.lighting.direction_at(now_ms),
            ambient_color: self.lighting.ambient,
            diffuse_color: self.lighting.diffuse,
        };
        renderer.set_globals(&globals);

        let mut objects_drawn = 0;
        for (id, object, range) in self.scene.iter() {
            renderer.draw(&ObjectDraw {
                id,
                view_transform: object.view_transform(),
                world_transform: object.world_transform(),
                material_color: object.material_color(),
                range,
            });
            objects_drawn += 1;
        }
        renderer.present();

        tracing::trace!(delta_ms, commands_applied, objects_drawn, "frame");

        FrameReport { delta_ms, commands_applied, objects_drawn }
    }
}
