pub mod resources;
mod systems;

use crate::ui::systems::*;
use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

pub use crate::ui::resources::PointerOverPanel;

pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<PointerOverPanel>()
            .add_systems(Startup, setup_control_panel)
            .add_systems(EguiPrimaryContextPass, render_control_panel);
    }
}
