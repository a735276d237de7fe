use crate::grass::events::GrassCommandEvent;
use crate::grass::resources::*;
use crate::grass::scene::GrassScene;
use bevy::prelude::*;
use grassgen::GrassField;
use grassgen::controls::FieldCommand;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn spawn_grass_field(
    mut scene: GrassScene,
    mut active: ResMut<ActiveGrassField>,
    settings: Res<GrassSettings>,
) {
    let config = settings.config.controls.clamp(settings.config.field);
    if let Err(err) = config.validate() {
        warn!("Grass field not built: {err}");
        return;
    }

    active.0 = Some(GrassField::construct_with(
        &mut scene,
        config,
        settings.field_options(),
    ));
    info!("Grass field spawned with {} blades", config.blade_count);
}

/// Apply control-panel requests; any number of rebuild requests in one
/// frame collapse into a single rebuild.
pub fn apply_grass_commands(
    mut events: MessageReader<GrassCommandEvent>,
    mut scene: GrassScene,
    mut active: ResMut<ActiveGrassField>,
) {
    let Some(field) = active.0.as_mut() else {
        events.clear();
        return;
    };

    let mut rebuild = false;
    for GrassCommandEvent(command) in events.read() {
        match *command {
            FieldCommand::Resize { width, height } => field.set_size(width, height),
            FieldCommand::SetBladeCount(count) => field.set_blade_count(count),
            FieldCommand::SetWindStrength(value) => field.update_wind_strength(&mut scene, value),
            FieldCommand::SetGrassRotate(enabled) => field.set_grass_rotate(enabled),
            FieldCommand::Rebuild => rebuild = true,
            FieldCommand::Remove => {
                field.remove_grass_field(&mut scene);
                rebuild = false;
                info!("Grass field removed");
            }
            // handled by the scenery plugin
            FieldCommand::SetGroundVisible(_) => {}
        }
    }

    if !rebuild {
        return;
    }
    if let Err(err) = field.config().validate() {
        warn!("Skipping grass rebuild: {err}");
        return;
    }
    field.update_grass_object(&mut scene);
}

pub fn advance_grass_wind(
    time: Res<Time<Real>>,
    mut scene: GrassScene,
    mut active: ResMut<ActiveGrassField>,
) {
    let Some(field) = active.0.as_mut() else {
        return;
    };
    field.advance(&mut scene, time.delta(), wall_clock_ms());
}

fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}
