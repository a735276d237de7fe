use bevy::prelude::*;

#[derive(Component)]
pub struct Ground;
