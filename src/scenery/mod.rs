pub mod components;
mod systems;

use crate::scenery::systems::*;
use bevy::prelude::*;

/// Ground plane and sun light around the grass field
pub struct SceneryPlugin;

impl Plugin for SceneryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_ground, spawn_sun))
            .add_systems(Update, update_ground);
    }
}
