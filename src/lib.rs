mod core;
mod grass;
mod helpers;
mod scenery;
mod ui;

use crate::core::camera::CameraPlugin;
use crate::grass::GrassPlugin;
use crate::scenery::SceneryPlugin;
use crate::ui::ControlPanelPlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;

pub use crate::grass::events::GrassCommandEvent;
pub use crate::grass::resources::GrassSettings;

pub struct GrassFieldAppPlugin;

impl Plugin for GrassFieldAppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CameraPlugin, SceneryPlugin, GrassPlugin, ControlPanelPlugin));

        #[cfg(debug_assertions)]
        {
            app.add_plugins((
                FrameTimeDiagnosticsPlugin::default(),
                LogDiagnosticsPlugin::default(),
            ));
        }
    }
}
