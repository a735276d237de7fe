use crate::blade::BladeProfile;
use crate::config::FieldConfig;
use crate::instances::{InstanceTable, generate_instances, outline_transforms};
use crate::scene::{GrassLayer, SceneSurface};
use crate::shading::WindUniforms;
use crate::wind::{AnimationScheduler, DEFAULT_TICK_INTERVAL, WindState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct FieldOptions {
    pub tick_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

/// GPU-side resources of a live field
struct FieldResources<G, D> {
    geometry: G,
    fill: D,
    outline: D,
    instances: InstanceTable,
}

/// Owns the blade geometry, both instanced meshes and the wind scheduler.
///
/// Every parameter change goes through a full rebuild. `G` and `D` are the
/// geometry and drawable handles of the [`SceneSurface`] the field was
/// constructed with; the same surface must be passed to every call.
pub struct GrassField<G, D> {
    config: FieldConfig,
    uniforms: WindUniforms,
    tick_interval: Duration,
    rng: StdRng,
    resources: Option<FieldResources<G, D>>,
    scheduler: Option<AnimationScheduler>,
}

impl<G, D> GrassField<G, D> {
    pub fn construct<S>(scene: &mut S, config: FieldConfig) -> Self
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        Self::construct_with(scene, config, FieldOptions::default())
    }

    pub fn construct_with<S>(scene: &mut S, config: FieldConfig, options: FieldOptions) -> Self
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut field = Self {
            config,
            uniforms: WindUniforms::new(config.wind_strength),
            tick_interval: options.tick_interval,
            rng,
            resources: None,
            scheduler: None,
        };
        field.build(scene);
        field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn uniforms(&self) -> &WindUniforms {
        &self.uniforms
    }

    /// Records of the current instances, `None` once torn down
    pub fn instances(&self) -> Option<&InstanceTable> {
        self.resources.as_ref().map(|r| &r.instances)
    }

    pub fn is_live(&self) -> bool {
        self.resources.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Write the new strength into both uniform sets without rebuilding
    pub fn update_wind_strength<S>(&mut self, scene: &mut S, value: f32)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        self.config.wind_strength = value;
        self.uniforms.wind_strength = value;
        self.push_uniforms(scene);
    }

    /// Takes effect on the next rebuild
    pub fn set_grass_rotate(&mut self, enabled: bool) {
        self.config.rotation_enabled = enabled;
    }

    /// Takes effect on the next rebuild
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
    }

    /// Takes effect on the next rebuild
    pub fn set_blade_count(&mut self, blade_count: u32) {
        self.config.blade_count = blade_count;
    }

    /// Tear everything down and build it again from the current config.
    /// Also brings a removed field back.
    pub fn update_grass_object<S>(&mut self, scene: &mut S)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        self.teardown(scene);
        self.build(scene);
    }

    /// Cancel the scheduler and release all GPU resources. Idempotent.
    pub fn remove_grass_field<S>(&mut self, scene: &mut S)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        self.teardown(scene);
    }

    /// Advance the wind timer by `delta`; on a tick, derive the wind state
    /// from `now_ms` and push it to both meshes. Returns whether it ticked.
    pub fn advance<S>(&mut self, scene: &mut S, delta: Duration, now_ms: f64) -> bool
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        let Some(scheduler) = self.scheduler.as_mut() else {
            return false;
        };
        if !scheduler.tick(delta) {
            return false;
        }

        let wind = WindState::at(now_ms);
        self.uniforms.time = wind.time;
        self.uniforms.wind_direction = wind.direction;
        self.push_uniforms(scene);
        true
    }

    fn build<S>(&mut self, scene: &mut S)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        let blade = BladeProfile::build();
        let batch = generate_instances(&self.config, &mut self.rng);
        let outline_slots = outline_transforms(&batch.table, batch.len());

        let geometry = scene.create_geometry(&blade);
        let fill = scene.create_drawable(
            GrassLayer::Fill,
            &geometry,
            &batch.transforms,
            &self.uniforms,
        );
        let outline = scene.create_drawable(
            GrassLayer::Outline,
            &geometry,
            &outline_slots,
            &self.uniforms,
        );
        scene.add(&fill);
        scene.add(&outline);

        log::info!(
            "Grass field built: {} blades over {}x{}",
            batch.len(),
            self.config.width,
            self.config.height
        );

        self.resources = Some(FieldResources {
            geometry,
            fill,
            outline,
            instances: batch.table,
        });
        self.scheduler = Some(AnimationScheduler::new(self.tick_interval));
    }

    fn teardown<S>(&mut self, scene: &mut S)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        // The timer must stop before anything it writes to goes away
        self.scheduler = None;

        let Some(resources) = self.resources.take() else {
            return;
        };
        scene.remove(&resources.fill);
        scene.remove(&resources.outline);
        scene.release_drawable(resources.fill);
        scene.release_drawable(resources.outline);
        scene.release_geometry(resources.geometry);
        log::debug!("Grass field released");
    }

    fn push_uniforms<S>(&self, scene: &mut S)
    where
        S: SceneSurface<Geometry = G, Drawable = D>,
    {
        if let Some(resources) = &self.resources {
            scene.write_uniforms(&resources.fill, &self.uniforms);
            scene.write_uniforms(&resources.outline, &self.uniforms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::{DrawableId, RecordingScene};
    use glam::Vec2;

    type TestField = GrassField<usize, DrawableId>;

    fn seeded(seed: u64) -> FieldOptions {
        FieldOptions {
            tick_interval: Duration::from_millis(100),
            seed: Some(seed),
        }
    }

    fn small_field(scene: &mut RecordingScene) -> TestField {
        GrassField::construct_with(scene, FieldConfig::new(10.0, 10.0, 5, 0.5), seeded(1))
    }

    #[test]
    fn test_construct_end_to_end() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);

        let table = field.instances().unwrap();
        assert_eq!(table.len(), 5);
        for record in table.iter() {
            assert_eq!(record.rotation_y, 0.0);
            assert!(record.position.x.abs() <= 5.0);
            assert!(record.position.z.abs() <= 5.0);
            assert_eq!(record.position.y, 0.0);
        }
        assert_eq!(
            scene.attached_layers(),
            vec![GrassLayer::Fill, GrassLayer::Outline]
        );
        assert!(field.is_animating());

        field.remove_grass_field(&mut scene);

        assert!(scene.attached.is_empty());
        assert!(scene.drawables.is_empty());
        assert!(scene.geometries.is_empty());
        assert!(!field.is_animating());
        assert!(!field.is_live());
    }

    #[test]
    fn test_fill_and_outline_share_geometry_and_transforms() {
        let mut scene = RecordingScene::default();
        let _field = small_field(&mut scene);

        let fill = scene.drawable(GrassLayer::Fill);
        let outline = scene.drawable(GrassLayer::Outline);
        assert_eq!(fill.geometry, outline.geometry);
        assert_eq!(fill.transforms, outline.transforms);
        assert_eq!(fill.transforms.len(), 5);
        assert_eq!(scene.geometries.len(), 1);
    }

    #[test]
    fn test_update_wind_strength_writes_both_sets() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);
        field.advance(&mut scene, Duration::from_millis(100), 1_700_000_000_000.0);
        let before = *field.uniforms();

        field.update_wind_strength(&mut scene, 0.8);

        for layer in [GrassLayer::Fill, GrassLayer::Outline] {
            let uniforms = scene.drawable(layer).uniforms;
            assert_eq!(uniforms.wind_strength, 0.8);
            assert_eq!(uniforms.time, before.time);
            assert_eq!(uniforms.wind_direction, before.wind_direction);
        }
        assert_eq!(field.config().wind_strength, 0.8);
    }

    #[test]
    fn test_tick_keeps_both_meshes_in_lockstep() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);

        assert!(!field.advance(&mut scene, Duration::from_millis(50), 0.0));
        assert!(field.advance(&mut scene, Duration::from_millis(50), 1_234.0));

        let fill = scene.drawable(GrassLayer::Fill);
        let outline = scene.drawable(GrassLayer::Outline);
        assert_eq!(fill.uniforms, outline.uniforms);
        assert_eq!(fill.uniform_writes, 1);
        assert_eq!(fill.uniforms.time, crate::wind::pseudo_time(1_234.0));
        assert_eq!(fill.uniforms.wind_strength, 0.5);
        assert!((fill.uniforms.wind_direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rebuild_three_times_leaves_one_pair() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);

        for _ in 0..3 {
            field.update_grass_object(&mut scene);
        }

        assert_eq!(
            scene.attached_layers(),
            vec![GrassLayer::Fill, GrassLayer::Outline]
        );
        assert_eq!(scene.drawables.len(), 2);
        assert_eq!(scene.geometries.len(), 1);
        assert!(field.is_animating());
    }

    #[test]
    fn test_rebuild_restarts_scheduler() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);
        field.advance(&mut scene, Duration::from_millis(90), 0.0);

        field.update_grass_object(&mut scene);

        assert!(!field.advance(&mut scene, Duration::from_millis(20), 0.0));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);

        field.remove_grass_field(&mut scene);
        field.remove_grass_field(&mut scene);

        assert!(scene.drawables.is_empty());
        assert!(!field.is_animating());
    }

    #[test]
    fn test_removed_field_ignores_ticks_and_wind_updates() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);
        field.remove_grass_field(&mut scene);

        assert!(!field.advance(&mut scene, Duration::from_secs(1), 0.0));
        field.update_wind_strength(&mut scene, 0.1);

        assert!(scene.drawables.is_empty());
        assert_eq!(field.config().wind_strength, 0.1);
    }

    #[test]
    fn test_rebuild_after_remove_reconstructs() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);
        field.remove_grass_field(&mut scene);

        field.update_grass_object(&mut scene);

        assert!(field.is_live());
        assert!(field.is_animating());
        assert_eq!(scene.attached.len(), 2);
    }

    #[test]
    fn test_rotation_applies_on_next_rebuild() {
        let mut scene = RecordingScene::default();
        let mut field: TestField = GrassField::construct_with(
            &mut scene,
            FieldConfig::new(10.0, 10.0, 200, 0.5),
            seeded(2),
        );

        field.set_grass_rotate(true);
        assert!(field.instances().unwrap().iter().all(|r| r.rotation_y == 0.0));

        field.update_grass_object(&mut scene);
        assert!(field.instances().unwrap().iter().any(|r| r.rotation_y != 0.0));
    }

    #[test]
    fn test_resize_and_recount_apply_on_rebuild() {
        let mut scene = RecordingScene::default();
        let mut field = small_field(&mut scene);

        field.set_size(2.0, 4.0);
        field.set_blade_count(12);
        assert_eq!(field.instances().unwrap().len(), 5);

        field.update_grass_object(&mut scene);

        let table = field.instances().unwrap();
        assert_eq!(table.len(), 12);
        assert!(table.iter().all(|r| r.position.x.abs() <= 1.0));
        assert!(table.iter().all(|r| r.position.z.abs() <= 2.0));
        assert_eq!(scene.drawable(GrassLayer::Outline).transforms.len(), 12);
    }

    #[test]
    fn test_initial_uniforms() {
        let mut scene = RecordingScene::default();
        let field = small_field(&mut scene);

        assert_eq!(field.uniforms().wind_strength, 0.5);
        assert_eq!(field.uniforms().wind_direction, Vec2::X);
        assert_eq!(scene.drawable(GrassLayer::Fill).uniforms, *field.uniforms());
    }
}
