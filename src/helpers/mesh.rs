use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::Mesh;
use grassgen::blade::BladeProfile;

/// Upload-ready mesh for the shared blade geometry
pub fn blade_mesh(blade: &BladeProfile) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, blade.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, blade.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, blade.uvs.clone());
    mesh.insert_indices(Indices::U32(blade.indices.clone()));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use grassgen::blade::BLADE_VERTEX_COUNT;

    #[test]
    fn test_blade_mesh_keeps_profile_topology() {
        let blade = BladeProfile::build();
        let mesh = blade_mesh(&blade);

        assert_eq!(mesh.count_vertices(), BLADE_VERTEX_COUNT);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(blade.indices.len()));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }
}
