use crate::grass::render::{GrassBatch, GrassInstance};
use crate::helpers::mesh::blade_mesh;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use grassgen::blade::BladeProfile;
use grassgen::shading::WindUniforms;
use grassgen::{GrassLayer, SceneSurface};
use std::sync::Arc;

/// One instanced grass layer: a single entity whose `GrassBatch` holds a
/// transform per instance slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrassDrawable(pub Entity);

/// Bevy side of the grass field: layer entities through `Commands`, the
/// shared blade mesh through `Assets<Mesh>`.
#[derive(SystemParam)]
pub struct GrassScene<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    batches: Query<'w, 's, &'static mut GrassBatch>,
}

impl SceneSurface for GrassScene<'_, '_> {
    type Geometry = Handle<Mesh>;
    type Drawable = GrassDrawable;

    fn create_geometry(&mut self, blade: &BladeProfile) -> Handle<Mesh> {
        self.meshes.add(blade_mesh(blade))
    }

    fn create_drawable(
        &mut self,
        layer: GrassLayer,
        geometry: &Handle<Mesh>,
        transforms: &[Mat4],
        uniforms: &WindUniforms,
    ) -> GrassDrawable {
        let instances: Arc<[GrassInstance]> = transforms.iter().map(GrassInstance::from).collect();

        let entity = self
            .commands
            .spawn((
                Name::new(format!("Grass {layer:?}")),
                GrassBatch {
                    layer,
                    instances,
                    uniforms: uniforms.into(),
                },
                Mesh3d(geometry.clone()),
                Transform::default(),
                Visibility::Hidden,
                // the mesh bounds cover one blade, not the field
                NoFrustumCulling,
            ))
            .id();

        GrassDrawable(entity)
    }

    fn add(&mut self, drawable: &GrassDrawable) {
        self.commands
            .entity(drawable.0)
            .try_insert(Visibility::Inherited);
    }

    fn remove(&mut self, drawable: &GrassDrawable) {
        self.commands
            .entity(drawable.0)
            .try_insert(Visibility::Hidden);
    }

    fn write_uniforms(&mut self, drawable: &GrassDrawable, uniforms: &WindUniforms) {
        if let Ok(mut batch) = self.batches.get_mut(drawable.0) {
            batch.uniforms = uniforms.into();
        }
    }

    fn release_drawable(&mut self, drawable: GrassDrawable) {
        self.commands.entity(drawable.0).try_despawn();
    }

    fn release_geometry(&mut self, geometry: Handle<Mesh>) {
        self.meshes.remove(&geometry);
    }
}
