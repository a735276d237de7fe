// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::DefaultPlugins;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuFeatures, WgpuSettings};
use bevy::window::{PresentMode, WindowResolution};
use grassfield::GrassFieldAppPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::linear_rgb(0.55, 0.7, 0.85)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Grass Field".into(),
                        resolution: WindowResolution::new(1500, 900),
                        present_mode: PresentMode::AutoVsync,
                        resize_constraints: WindowResizeConstraints {
                            min_width: 800.0,
                            min_height: 600.0,
                            ..default()
                        },
                        ..default()
                    }),
                    ..default()
                })
                // the outline pass draws blade edges as lines
                .set(RenderPlugin {
                    render_creation: RenderCreation::Automatic(WgpuSettings {
                        features: WgpuFeatures::POLYGON_MODE_LINE,
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(GrassFieldAppPlugin)
        .run();
}
