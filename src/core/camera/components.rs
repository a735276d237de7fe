use crate::core::camera::logic::OrbitState;
use bevy::prelude::*;

#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
pub struct MainCamera;

#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitCamera(pub OrbitState);
