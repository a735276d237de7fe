use crate::grass::events::GrassCommandEvent;
use crate::grass::resources::GrassSettings;
use crate::scenery::components::Ground;
use bevy::prelude::*;
use grassgen::controls::FieldCommand;
use std::f32::consts::PI;

/// Unit plane scaled to the field size, so resizing never touches the mesh
pub fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GrassSettings>,
) {
    let field = settings.config.controls.clamp(settings.config.field);

    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(1.0, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.2, 0.1),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_scale(Vec3::new(field.width, 1.0, field.height)),
        Ground,
    ));
}

pub fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, 1.0, -PI / 4.)),
        DirectionalLight {
            illuminance: 10_000.0,
            ..default()
        },
    ));

    info!("Scenery spawned");
}

pub fn update_ground(
    mut events: MessageReader<GrassCommandEvent>,
    mut ground: Query<(&mut Transform, &mut Visibility), With<Ground>>,
) {
    let Ok((mut transform, mut visibility)) = ground.single_mut() else {
        events.clear();
        return;
    };

    for GrassCommandEvent(command) in events.read() {
        match *command {
            FieldCommand::Resize { width, height } => {
                transform.scale = Vec3::new(width, 1.0, height);
            }
            FieldCommand::SetGroundVisible(visible) => {
                *visibility = if visible {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
            }
            _ => {}
        }
    }
}
