use crate::shading::APPROX_NORMAL;
use std::f32::consts::PI;

/// Number of vertices along one blade
pub const BLADE_VERTEX_COUNT: usize = 15;
/// Stretches the half-sine arc so the blade stays slim
pub const BLADE_SLIM_SCALE: f32 = 10.0;
/// Horizontal extent of the blade at t = 1
const BLADE_LEAN: f32 = 0.6;

/// Raw blade geometry that can be uploaded by any rendering engine.
///
/// Built once per field and shared by every fill and outline instance.
#[derive(Debug, Clone, PartialEq)]
pub struct BladeProfile {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl BladeProfile {
    /// Build the standard 15-vertex blade
    pub fn build() -> Self {
        Self::with_vertex_count(BLADE_VERTEX_COUNT)
    }

    /// Half-sine arc: foot at the origin, curving up and sideways and
    /// drooping back to y ≈ 0 at the tip.
    pub fn with_vertex_count(vertex_count: usize) -> Self {
        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        let span = (vertex_count.saturating_sub(1)).max(1) as f32 * BLADE_SLIM_SCALE;
        for i in 0..vertex_count {
            let t = i as f32 / span;
            let y = (t * BLADE_SLIM_SCALE * PI).sin();
            let x = t * BLADE_LEAN;
            positions.push([x, y, 0.0]);
            uvs.push([t, 0.0]);
        }

        let normals = vec![APPROX_NORMAL.to_array(); vertex_count];

        Self {
            positions,
            normals,
            uvs,
            indices: mirrored_indices(vertex_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Connect vertex `i` to its mirror `n - 1 - i`, skipping the duplicate
/// triangle at the midpoint.
pub fn mirrored_indices(vertex_count: usize) -> Vec<u32> {
    if vertex_count < 3 {
        return Vec::new();
    }

    let n = vertex_count as u32;
    let mid = n / 2;
    let mut indices = Vec::with_capacity(3 * (2 * mid as usize + 1));

    for i in 0..=mid {
        indices.extend_from_slice(&[i, i + 1, n - 1 - i]);
        if i != mid {
            indices.extend_from_slice(&[n - 1 - i, i + 1, n - 2 - i]);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foot_and_tip_rest_on_ground() {
        let blade = BladeProfile::build();

        assert_eq!(blade.positions[0], [0.0, 0.0, 0.0]);
        let tip = blade.positions[BLADE_VERTEX_COUNT - 1];
        assert!(tip[1].abs() < 1e-5, "tip y was {}", tip[1]);
    }

    #[test]
    fn test_profile_peaks_in_the_middle() {
        let blade = BladeProfile::build();
        let peak = blade.positions[BLADE_VERTEX_COUNT / 2];

        assert!(peak[1] > 0.99, "peak y was {}", peak[1]);
        assert!(blade.positions.iter().all(|p| p[2] == 0.0));
    }

    #[test]
    fn test_index_count_accounts_for_skipped_midpoint() {
        let blade = BladeProfile::build();
        let mid = BLADE_VERTEX_COUNT / 2;

        assert_eq!(blade.indices.len(), 3 * (2 * mid + 1));
        assert_eq!(blade.triangle_count(), 2 * mid + 1);
    }

    #[test]
    fn test_indices_stay_in_range() {
        let blade = BladeProfile::build();

        assert!(
            blade
                .indices
                .iter()
                .all(|&i| (i as usize) < blade.vertex_count())
        );
    }

    #[test]
    fn test_first_triangles_mirror_around_the_blade() {
        let indices = mirrored_indices(BLADE_VERTEX_COUNT);

        assert_eq!(&indices[0..6], &[0, 1, 14, 14, 1, 13]);
    }

    #[test]
    fn test_attributes_match_vertex_count() {
        let blade = BladeProfile::build();

        assert_eq!(blade.vertex_count(), BLADE_VERTEX_COUNT);
        assert_eq!(blade.normals.len(), BLADE_VERTEX_COUNT);
        assert_eq!(blade.uvs.len(), BLADE_VERTEX_COUNT);
    }

    #[test]
    fn test_topology_is_independent_of_build() {
        assert_eq!(BladeProfile::build(), BladeProfile::build());
    }
}
