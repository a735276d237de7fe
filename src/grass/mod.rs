pub mod events;
pub mod render;
pub mod resources;
pub mod scene;
mod systems;

use crate::grass::events::*;
use crate::grass::render::GrassRenderPlugin;
use crate::grass::resources::*;
use crate::grass::systems::*;
use bevy::prelude::*;

pub struct GrassPlugin;

impl Plugin for GrassPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(GrassRenderPlugin)
            .add_message::<GrassCommandEvent>()
            .insert_resource(GrassSettings::load())
            .init_resource::<ActiveGrassField>()
            .add_systems(Startup, spawn_grass_field)
            .add_systems(
                Update,
                (apply_grass_commands, advance_grass_wind).chain(),
            );
    }
}
