use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_STEP: f32 = 0.1;
/// Stops short of the poles
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

pub struct OrbitInput {
    pub rotating: bool,
    pub mouse_delta: Vec2,
    pub mouse_wheel_delta: f32,
}

/// Spherical camera position around a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

pub struct CameraTransformUpdate {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl OrbitState {
    pub fn from_position(position: Vec3, target: Vec3, min_radius: f32, max_radius: f32) -> Self {
        let offset = position - target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            min_radius,
            max_radius,
        }
    }
}

/// Drag rotates around the target, wheel zooms towards it
pub fn apply_orbit_input(state: OrbitState, input: &OrbitInput) -> OrbitState {
    let mut next = state;

    if input.rotating && input.mouse_delta.length_squared() > 0.0 {
        next.yaw -= input.mouse_delta.x * ROTATE_SPEED;
        next.pitch = (next.pitch + input.mouse_delta.y * ROTATE_SPEED)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    if input.mouse_wheel_delta.abs() > 0.0 {
        next.radius = (next.radius * (1.0 - input.mouse_wheel_delta * ZOOM_STEP))
            .clamp(next.min_radius, next.max_radius);
    }

    next
}

pub fn orbit_transform(state: &OrbitState) -> CameraTransformUpdate {
    let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = state.pitch.sin_cos();
    let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * state.radius;

    CameraTransformUpdate {
        translation: state.target + offset,
        rotation: Quat::from_euler(EulerRot::YXZ, state.yaw, -state.pitch, 0.0),
    }
}
