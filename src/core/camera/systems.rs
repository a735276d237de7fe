use crate::core::camera::components::{MainCamera, OrbitCamera};
use crate::core::camera::logic::{OrbitInput, OrbitState, apply_orbit_input, orbit_transform};
use crate::ui::PointerOverPanel;
use bevy::camera::{PerspectiveProjection, Projection};
use bevy::ecs::message::MessageReader;
use bevy::input::ButtonInput;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::log::info;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::{Camera3d, Commands, MouseButton, Query, Res, Transform, With};
use bevy::render::view::NoIndirectDrawing;

const CAMERA_FOV_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_START: Vec3 = Vec3::new(1.0, 1.0, 2.0);
const MIN_ORBIT_RADIUS: f32 = 0.5;
const MAX_ORBIT_RADIUS: f32 = 200.0;
/// Pixel scroll deltas are roughly this many times larger than line deltas
const PIXELS_PER_LINE: f32 = 50.0;

pub fn spawn_camera(mut commands: Commands) {
    let orbit = OrbitState::from_position(
        CAMERA_START,
        Vec3::ZERO,
        MIN_ORBIT_RADIUS,
        MAX_ORBIT_RADIUS,
    );

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..Default::default()
        }),
        Transform::from_translation(CAMERA_START).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        OrbitCamera(orbit),
        // grass layers issue their own instanced draws
        NoIndirectDrawing,
    ));

    info!("Camera spawned");
}

pub fn camera_control(
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    pointer_over_panel: Option<Res<PointerOverPanel>>,
    mut camera_q: Query<(&mut Transform, &mut OrbitCamera), With<MainCamera>>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    let mouse_wheel_delta: f32 = mouse_wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_LINE,
        })
        .sum();

    if pointer_over_panel.is_some_and(|over| over.0) {
        return;
    }
    let Ok((mut transform, mut orbit)) = camera_q.single_mut() else {
        return;
    };

    let input = OrbitInput {
        rotating: mouse_input.pressed(MouseButton::Left),
        mouse_delta,
        mouse_wheel_delta,
    };
    let next = apply_orbit_input(orbit.0, &input);
    if next == orbit.0 {
        return;
    }
    orbit.0 = next;

    let update = orbit_transform(&next);
    transform.translation = update.translation;
    transform.rotation = update.rotation;
}
