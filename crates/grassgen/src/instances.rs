use crate::config::FieldConfig;
use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Uniform scale used for outline slots that have no matching record
pub const OUTLINE_FALLBACK_SCALE: f32 = 0.1;

/// Placement of a single blade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceRecord {
    pub index: usize,
    pub position: Vec3,
    /// Vertical stretch in [0, 1)
    pub scale: f32,
    /// Rotation about the vertical axis in [0, 2π), zero when rotation is off
    pub rotation_y: f32,
}

impl InstanceRecord {
    /// translate · rotate_y · scale_y
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, self.scale, 1.0),
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }
}

/// Index → record lookup written during fill generation and read back by
/// the outline pass.
#[derive(Debug, Clone, Default)]
pub struct InstanceTable {
    records: HashMap<usize, InstanceRecord>,
}

impl InstanceTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, record: InstanceRecord) {
        self.records.insert(record.index, record);
    }

    #[cfg(test)]
    pub fn remove(&mut self, index: usize) -> Option<InstanceRecord> {
        self.records.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&InstanceRecord> {
        self.records.get(&index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.records.values()
    }
}

/// Fill instance buffer plus the records it was built from
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    pub transforms: Vec<Mat4>,
    pub table: InstanceTable,
}

impl InstanceBatch {
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Scatter `config.blade_count` blades over a `width × height` rectangle
/// centred on the origin.
///
/// The caller is responsible for passing a validated config.
pub fn generate_instances<R: Rng>(config: &FieldConfig, rng: &mut R) -> InstanceBatch {
    let count = config.blade_count as usize;
    let mut transforms = Vec::with_capacity(count);
    let mut table = InstanceTable::with_capacity(count);

    for index in 0..count {
        let x = (rng.random::<f32>() - 0.5) * config.width;
        let z = (rng.random::<f32>() - 0.5) * config.height;
        let scale = rng.random::<f32>();
        let rotation_y = if config.rotation_enabled {
            rng.random_range(0.0..TAU)
        } else {
            0.0
        };

        let record = InstanceRecord {
            index,
            position: Vec3::new(x, 0.0, z),
            scale,
            rotation_y,
        };
        transforms.push(record.transform());
        table.insert(record);
    }

    InstanceBatch { transforms, table }
}

/// Outline transform for slot `index`, mirrored from the fill record.
///
/// Missing records collapse to a tiny blade at the origin.
pub fn outline_transform(table: &InstanceTable, index: usize) -> Mat4 {
    match table.get(index) {
        Some(record) => record.transform(),
        None => Mat4::from_scale(Vec3::splat(OUTLINE_FALLBACK_SCALE)),
    }
}

pub fn outline_transforms(table: &InstanceTable, count: usize) -> Vec<Mat4> {
    (0..count).map(|i| outline_transform(table, i)).collect()
}
