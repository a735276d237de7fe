use crate::blade::BladeProfile;
use crate::shading::WindUniforms;
use glam::Mat4;

/// Which of the two instanced meshes a drawable belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrassLayer {
    Fill,
    Outline,
}

/// Rendering backend seen by the field.
///
/// The field never inspects the scene; it only holds the handles returned
/// here and hands them back for attach/detach, uniform writes and release.
pub trait SceneSurface {
    type Geometry;
    type Drawable;

    /// Upload the shared blade geometry
    fn create_geometry(&mut self, blade: &BladeProfile) -> Self::Geometry;

    /// Build one instanced mesh with its own material and uniform set.
    /// The drawable is not visible until [`SceneSurface::add`] is called.
    fn create_drawable(
        &mut self,
        layer: GrassLayer,
        geometry: &Self::Geometry,
        transforms: &[Mat4],
        uniforms: &WindUniforms,
    ) -> Self::Drawable;

    fn add(&mut self, drawable: &Self::Drawable);

    fn remove(&mut self, drawable: &Self::Drawable);

    fn write_uniforms(&mut self, drawable: &Self::Drawable, uniforms: &WindUniforms);

    /// Free the mesh objects and material behind a drawable
    fn release_drawable(&mut self, drawable: Self::Drawable);

    fn release_geometry(&mut self, geometry: Self::Geometry);
}

/// In-memory scene that records every call, for lifecycle tests
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawableId(pub usize);

    #[derive(Debug, Clone)]
    pub struct RecordedDrawable {
        pub layer: GrassLayer,
        pub geometry: usize,
        pub transforms: Vec<Mat4>,
        pub uniforms: WindUniforms,
        pub uniform_writes: usize,
    }

    #[derive(Debug, Default)]
    pub struct RecordingScene {
        next_id: usize,
        pub geometries: HashSet<usize>,
        pub drawables: HashMap<DrawableId, RecordedDrawable>,
        pub attached: HashSet<DrawableId>,
    }

    impl RecordingScene {
        pub fn attached_layers(&self) -> Vec<GrassLayer> {
            let mut layers: Vec<_> = self
                .attached
                .iter()
                .map(|id| self.drawables[id].layer)
                .collect();
            layers.sort_by_key(|layer| *layer as u8);
            layers
        }

        pub fn drawable(&self, layer: GrassLayer) -> &RecordedDrawable {
            self.drawables
                .values()
                .find(|d| d.layer == layer)
                .expect("no drawable for layer")
        }
    }

    impl SceneSurface for RecordingScene {
        type Geometry = usize;
        type Drawable = DrawableId;

        fn create_geometry(&mut self, _blade: &BladeProfile) -> usize {
            self.next_id += 1;
            self.geometries.insert(self.next_id);
            self.next_id
        }

        fn create_drawable(
            &mut self,
            layer: GrassLayer,
            geometry: &usize,
            transforms: &[Mat4],
            uniforms: &WindUniforms,
        ) -> DrawableId {
            self.next_id += 1;
            let id = DrawableId(self.next_id);
            self.drawables.insert(
                id,
                RecordedDrawable {
                    layer,
                    geometry: *geometry,
                    transforms: transforms.to_vec(),
                    uniforms: *uniforms,
                    uniform_writes: 0,
                },
            );
            id
        }

        fn add(&mut self, drawable: &DrawableId) {
            assert!(self.drawables.contains_key(drawable), "add after release");
            self.attached.insert(*drawable);
        }

        fn remove(&mut self, drawable: &DrawableId) {
            self.attached.remove(drawable);
        }

        fn write_uniforms(&mut self, drawable: &DrawableId, uniforms: &WindUniforms) {
            let recorded = self
                .drawables
                .get_mut(drawable)
                .expect("uniform write after release");
            recorded.uniforms = *uniforms;
            recorded.uniform_writes += 1;
        }

        fn release_drawable(&mut self, drawable: DrawableId) {
            assert!(
                !self.attached.contains(&drawable),
                "released while attached"
            );
            assert!(self.drawables.remove(&drawable).is_some(), "double release");
        }

        fn release_geometry(&mut self, geometry: usize) {
            assert!(self.geometries.remove(&geometry), "double release");
        }
    }
}
