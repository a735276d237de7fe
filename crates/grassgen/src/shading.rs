//! CPU reference of the grass shading contract.
//!
//! `assets/shaders/grass_vertex.wgsl`, `grass_fill.wgsl` and
//! `grass_outline.wgsl` implement the same math on the GPU. Keep them in
//! step when changing anything here.

use glam::{Vec2, Vec3};

pub const BASE_COLOR: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const TIP_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.1);
pub const OUTLINE_COLOR: Vec3 = Vec3::ZERO;

pub const AMBIENT_COLOR: Vec3 = Vec3::new(0.2, 0.35, 0.2);
pub const AMBIENT_INTENSITY: f32 = 0.5;

/// Shared by every vertex instead of a true per-vertex normal
pub const APPROX_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);
/// Normalized (0.3, 1.0, 0.5)
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(0.259_157, 0.863_868, 0.431_934);

const LEAN_AMPLITUDE: f32 = 0.3;
const GUST_FREQUENCY: f32 = 0.35;

/// Uniform set bound to both the fill and the outline layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindUniforms {
    pub time: f32,
    pub wind_strength: f32,
    pub wind_direction: Vec2,
}

impl WindUniforms {
    pub fn new(wind_strength: f32) -> Self {
        Self {
            time: 0.0,
            wind_strength,
            wind_direction: Vec2::X,
        }
    }
}

impl Default for WindUniforms {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Bend angle (radians about local X) for a vertex at height `height`
pub fn curve_amount(height: f32, uniforms: &WindUniforms) -> f32 {
    let random_lean = (uniforms.time + height).sin() * LEAN_AMPLITUDE;
    let mut curve = (random_lean * height).sin();
    curve += (uniforms.time * GUST_FREQUENCY + height).sin() * uniforms.wind_strength;
    curve * uniforms.wind_direction.x
}

/// Displaced blade-local position, before the instance transform.
///
/// A positive curve tips the blade towards -Z.
pub fn displace(position: Vec3, uniforms: &WindUniforms) -> Vec3 {
    let (sin, cos) = curve_amount(position.y, uniforms).sin_cos();
    Vec3::new(position.x, position.y * cos, -position.y * sin)
}

/// Base-to-tip gradient at blade-local height `height`
pub fn blade_color(height: f32) -> Vec3 {
    BASE_COLOR.lerp(TIP_COLOR, height.clamp(0.0, 1.0))
}

/// Opaque fill color: fixed ambient plus a single fixed-direction diffuse term
pub fn fill_color(height: f32) -> [f32; 4] {
    let ambient = AMBIENT_COLOR * AMBIENT_INTENSITY;
    let diffuse = APPROX_NORMAL.dot(LIGHT_DIRECTION).max(0.0);
    let color = ambient + diffuse * blade_color(height);
    color.extend(1.0).to_array()
}

pub fn outline_color() -> [f32; 4] {
    OUTLINE_COLOR.extend(1.0).to_array()
}
