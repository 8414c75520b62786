use std::f32::consts::PI;

use glam::Vec3;

/// Top-level settings, grouped by the part of the program that reads them.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub view: ViewConfig,
    pub lighting: LightingConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Id of an existing `<canvas>` to render into; one is created if absent.
    pub element_id: String,
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            element_id: "glcanvas".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub clear_color: [f64; 4],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_y: 45f32.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightingConfig {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    /// Angular speed of the light around the Y axis, radians per millisecond.
    pub orbit_rate: f64,
    pub elevation: f32,
}

impl LightingConfig {
    /// Light direction at absolute time `time_ms`.
    pub fn direction_at(&self, time_ms: f64) -> Vec3 {
        let angle = self.orbit_rate * time_ms;
        Vec3::new(angle.sin() as f32, self.elevation, angle.cos() as f32)
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.6),
            diffuse: Vec3::splat(0.8),
            orbit_rate: 0.0005,
            elevation: 0.5,
        }
    }
}

/// Fixed step sizes applied per key press.
#[derive(Debug, Clone)]
pub struct NavigationConfig {
    pub step: f32,
    pub turn_step: f32,
    pub tilt_step: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step: 0.2,
            turn_step: PI / 24.0,
            tilt_step: PI / 48.0,
        }
    }
}
