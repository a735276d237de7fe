use bevy::core_pipeline::core_3d::Transparent3d;
use bevy::ecs::system::SystemParamItem;
use bevy::ecs::system::lifetimeless::{Read, SRes};
use bevy::mesh::{MeshVertexBufferLayoutRef, VertexBufferLayout};
use bevy::pbr::{
    MeshPipeline, MeshPipelineKey, RenderMeshInstances, SetMeshBindGroup, SetMeshViewBindGroup,
    SetMeshViewBindingArrayBindGroup,
};
use bevy::prelude::*;
use bevy::render::extract_component::{ExtractComponent, ExtractComponentPlugin};
use bevy::render::mesh::allocator::MeshAllocator;
use bevy::render::mesh::{RenderMesh, RenderMeshBufferInfo};
use bevy::render::render_asset::RenderAssets;
use bevy::render::render_phase::{
    AddRenderCommand, DrawFunctions, PhaseItem, PhaseItemExtraIndex, RenderCommand,
    RenderCommandResult, SetItemPipeline, TrackedRenderPass, ViewSortedRenderPhases,
};
use bevy::render::render_resource::binding_types::uniform_buffer;
use bevy::render::render_resource::{
    BindGroup, BindGroupEntries, BindGroupLayout, BindGroupLayoutEntries, Buffer,
    BufferInitDescriptor, BufferUsages, PipelineCache, PolygonMode, RenderPipelineDescriptor,
    ShaderStages, ShaderType, SpecializedMeshPipeline, SpecializedMeshPipelineError,
    SpecializedMeshPipelines, VertexAttribute, VertexFormat, VertexStepMode,
};
use bevy::render::renderer::{RenderDevice, RenderQueue};
use bevy::render::sync_world::MainEntity;
use bevy::render::view::ExtractedView;
use bevy::render::{Render, RenderApp, RenderStartup, RenderSystems};
use bytemuck::{Pod, Zeroable};
use grassgen::GrassLayer;
use grassgen::shading::WindUniforms;
use std::sync::Arc;

const GRASS_VERTEX_SHADER: &str = "shaders/grass_vertex.wgsl";
const GRASS_FILL_SHADER: &str = "shaders/grass_fill.wgsl";
const GRASS_OUTLINE_SHADER: &str = "shaders/grass_outline.wgsl";

/// Locations 0..=2 hold the blade's position, normal and uv
const INSTANCE_SHADER_LOCATION: u32 = 3;
const OUTLINE_DEPTH_BIAS: i32 = 2;

/// GPU layout of the wind uniform set
#[derive(ShaderType, Debug, Clone, Copy, Default, PartialEq)]
pub struct GrassUniforms {
    pub time: f32,
    pub wind_strength: f32,
    pub wind_direction: Vec2,
}

impl GrassUniforms {
    fn to_raw(self) -> [f32; 4] {
        [
            self.time,
            self.wind_strength,
            self.wind_direction.x,
            self.wind_direction.y,
        ]
    }
}

impl From<&WindUniforms> for GrassUniforms {
    fn from(uniforms: &WindUniforms) -> Self {
        Self {
            time: uniforms.time,
            wind_strength: uniforms.wind_strength,
            wind_direction: uniforms.wind_direction,
        }
    }
}

/// One slot of the instance buffer: a column-major world-from-local matrix
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GrassInstance {
    pub world_from_local: [f32; 16],
}

impl From<&Mat4> for GrassInstance {
    fn from(transform: &Mat4) -> Self {
        Self {
            world_from_local: transform.to_cols_array(),
        }
    }
}

/// Everything the render world needs to draw one layer in a single
/// instanced call. Instances are shared so extraction only bumps a count.
#[derive(Component, ExtractComponent, Debug, Clone)]
pub struct GrassBatch {
    pub layer: GrassLayer,
    pub instances: Arc<[GrassInstance]>,
    pub uniforms: GrassUniforms,
}

pub struct GrassRenderPlugin;

impl Plugin for GrassRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ExtractComponentPlugin::<GrassBatch>::default());

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };
        render_app
            .add_render_command::<Transparent3d, DrawGrass>()
            .init_resource::<SpecializedMeshPipelines<GrassPipeline>>()
            .add_systems(RenderStartup, init_grass_pipeline)
            .add_systems(
                Render,
                (
                    queue_grass.in_set(RenderSystems::QueueMeshes),
                    prepare_grass_buffers.in_set(RenderSystems::PrepareResources),
                ),
            );
    }
}

#[derive(Resource)]
pub struct GrassPipeline {
    mesh_pipeline: MeshPipeline,
    wind_layout: BindGroupLayout,
    vertex_shader: Handle<Shader>,
    fill_shader: Handle<Shader>,
    outline_shader: Handle<Shader>,
}

fn init_grass_pipeline(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mesh_pipeline: Res<MeshPipeline>,
    render_device: Res<RenderDevice>,
) {
    let wind_layout = render_device.create_bind_group_layout(
        "grass_wind_layout",
        &BindGroupLayoutEntries::single(ShaderStages::VERTEX, uniform_buffer::<GrassUniforms>(false)),
    );

    commands.insert_resource(GrassPipeline {
        mesh_pipeline: mesh_pipeline.clone(),
        wind_layout,
        vertex_shader: asset_server.load(GRASS_VERTEX_SHADER),
        fill_shader: asset_server.load(GRASS_FILL_SHADER),
        outline_shader: asset_server.load(GRASS_OUTLINE_SHADER),
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrassPipelineKey {
    mesh_key: MeshPipelineKey,
    layer: GrassLayer,
}

impl SpecializedMeshPipeline for GrassPipeline {
    type Key = GrassPipelineKey;

    fn specialize(
        &self,
        key: Self::Key,
        layout: &MeshVertexBufferLayoutRef,
    ) -> Result<RenderPipelineDescriptor, SpecializedMeshPipelineError> {
        let mut descriptor = self.mesh_pipeline.specialize(key.mesh_key, layout)?;

        descriptor.vertex.shader = self.vertex_shader.clone();
        descriptor.vertex.buffers.push(instance_buffer_layout());
        descriptor.layout.push(self.wind_layout.clone());
        descriptor.primitive.cull_mode = None;

        let fragment_shader = match key.layer {
            GrassLayer::Fill => self.fill_shader.clone(),
            GrassLayer::Outline => {
                // edges drawn as lines, pulled in front of the coplanar fill
                descriptor.primitive.polygon_mode = PolygonMode::Line;
                if let Some(depth) = descriptor.depth_stencil.as_mut() {
                    depth.bias.constant = OUTLINE_DEPTH_BIAS;
                    depth.bias.slope_scale = 1.0;
                }
                self.outline_shader.clone()
            }
        };
        if let Some(fragment) = descriptor.fragment.as_mut() {
            fragment.shader = fragment_shader;
        }

        Ok(descriptor)
    }
}

fn instance_buffer_layout() -> VertexBufferLayout {
    let column_size = VertexFormat::Float32x4.size();
    VertexBufferLayout {
        array_stride: size_of::<GrassInstance>() as u64,
        step_mode: VertexStepMode::Instance,
        attributes: (0..4)
            .map(|column| VertexAttribute {
                format: VertexFormat::Float32x4,
                offset: column as u64 * column_size,
                shader_location: INSTANCE_SHADER_LOCATION + column,
            })
            .collect(),
    }
}

fn queue_grass(
    transparent_draw_functions: Res<DrawFunctions<Transparent3d>>,
    grass_pipeline: Res<GrassPipeline>,
    mut pipelines: ResMut<SpecializedMeshPipelines<GrassPipeline>>,
    pipeline_cache: Res<PipelineCache>,
    meshes: Res<RenderAssets<RenderMesh>>,
    render_mesh_instances: Res<RenderMeshInstances>,
    batches: Query<(Entity, &MainEntity, &GrassBatch)>,
    mut transparent_phases: ResMut<ViewSortedRenderPhases<Transparent3d>>,
    views: Query<(&ExtractedView, &Msaa)>,
) {
    let draw_grass = transparent_draw_functions.read().id::<DrawGrass>();

    for (view, msaa) in &views {
        let Some(phase) = transparent_phases.get_mut(&view.retained_view_entity) else {
            continue;
        };

        let view_key =
            MeshPipelineKey::from_msaa_samples(msaa.samples()) | MeshPipelineKey::from_hdr(view.hdr);
        let rangefinder = view.rangefinder3d();

        for (entity, main_entity, batch) in &batches {
            // hidden layers have no mesh instance
            let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(*main_entity)
            else {
                continue;
            };
            let Some(mesh) = meshes.get(mesh_instance.mesh_asset_id) else {
                continue;
            };

            let key = GrassPipelineKey {
                mesh_key: view_key
                    | MeshPipelineKey::from_primitive_topology(mesh.primitive_topology()),
                layer: batch.layer,
            };
            let pipeline =
                match pipelines.specialize(&pipeline_cache, &grass_pipeline, key, &mesh.layout) {
                    Ok(pipeline) => pipeline,
                    Err(err) => {
                        error!("Failed to specialize grass pipeline: {err}");
                        continue;
                    }
                };

            phase.add(Transparent3d {
                entity: (entity, *main_entity),
                pipeline,
                draw_function: draw_grass,
                distance: rangefinder.distance_translation(&mesh_instance.translation),
                batch_range: 0..1,
                extra_index: PhaseItemExtraIndex::None,
                indexed: true,
            });
        }
    }
}

#[derive(Component)]
pub struct GrassInstanceBuffer {
    buffer: Buffer,
    length: u32,
    source: Arc<[GrassInstance]>,
}

#[derive(Component)]
pub struct GrassWindBindGroup {
    buffer: Buffer,
    bind_group: BindGroup,
}

/// Upload the instance buffer when a layer is (re)built; rewrite the wind
/// uniforms every frame.
fn prepare_grass_buffers(
    mut commands: Commands,
    batches: Query<(
        Entity,
        &GrassBatch,
        Option<&GrassInstanceBuffer>,
        Option<&GrassWindBindGroup>,
    )>,
    grass_pipeline: Res<GrassPipeline>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
) {
    for (entity, batch, instance_buffer, wind) in &batches {
        if batch.instances.is_empty() {
            continue;
        }

        let stale = instance_buffer.is_none_or(|current| !Arc::ptr_eq(&current.source, &batch.instances));
        if stale {
            let buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
                label: Some("grass_instance_buffer"),
                contents: bytemuck::cast_slice(&batch.instances[..]),
                usage: BufferUsages::VERTEX,
            });
            commands.entity(entity).insert(GrassInstanceBuffer {
                buffer,
                length: batch.instances.len() as u32,
                source: batch.instances.clone(),
            });
        }

        let raw = batch.uniforms.to_raw();
        match wind {
            Some(wind) => render_queue.write_buffer(&wind.buffer, 0, bytemuck::bytes_of(&raw)),
            None => {
                let buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
                    label: Some("grass_wind_buffer"),
                    contents: bytemuck::bytes_of(&raw),
                    usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                });
                let bind_group = render_device.create_bind_group(
                    "grass_wind_bind_group",
                    &grass_pipeline.wind_layout,
                    &BindGroupEntries::single(buffer.as_entire_binding()),
                );
                commands
                    .entity(entity)
                    .insert(GrassWindBindGroup { buffer, bind_group });
            }
        }
    }
}

type DrawGrass = (
    SetItemPipeline,
    SetMeshViewBindGroup<0>,
    SetMeshViewBindingArrayBindGroup<1>,
    SetMeshBindGroup<2>,
    SetGrassWindBindGroup<3>,
    DrawGrassInstanced,
);

pub struct SetGrassWindBindGroup<const I: usize>;

impl<P: PhaseItem, const I: usize> RenderCommand<P> for SetGrassWindBindGroup<I> {
    type Param = ();
    type ViewQuery = ();
    type ItemQuery = Read<GrassWindBindGroup>;

    fn render<'w>(
        _item: &P,
        _view: (),
        wind: Option<&'w GrassWindBindGroup>,
        _param: SystemParamItem<'w, '_, Self::Param>,
        pass: &mut TrackedRenderPass<'w>,
    ) -> RenderCommandResult {
        let Some(wind) = wind else {
            return RenderCommandResult::Skip;
        };
        pass.set_bind_group(I, &wind.bind_group, &[]);
        RenderCommandResult::Success
    }
}

/// Draw the shared blade mesh once per slot of the instance buffer
pub struct DrawGrassInstanced;

impl<P: PhaseItem> RenderCommand<P> for DrawGrassInstanced {
    type Param = (
        SRes<RenderAssets<RenderMesh>>,
        SRes<RenderMeshInstances>,
        SRes<MeshAllocator>,
    );
    type ViewQuery = ();
    type ItemQuery = Read<GrassInstanceBuffer>;

    fn render<'w>(
        item: &P,
        _view: (),
        instance_buffer: Option<&'w GrassInstanceBuffer>,
        (meshes, render_mesh_instances, mesh_allocator): SystemParamItem<'w, '_, Self::Param>,
        pass: &mut TrackedRenderPass<'w>,
    ) -> RenderCommandResult {
        let mesh_allocator = mesh_allocator.into_inner();

        let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(item.main_entity())
        else {
            return RenderCommandResult::Skip;
        };
        let Some(gpu_mesh) = meshes.into_inner().get(mesh_instance.mesh_asset_id) else {
            return RenderCommandResult::Skip;
        };
        let Some(instance_buffer) = instance_buffer else {
            return RenderCommandResult::Skip;
        };
        let Some(vertex_slice) = mesh_allocator.mesh_vertex_slice(&mesh_instance.mesh_asset_id)
        else {
            return RenderCommandResult::Skip;
        };

        pass.set_vertex_buffer(0, vertex_slice.buffer.slice(..));
        pass.set_vertex_buffer(1, instance_buffer.buffer.slice(..));

        match &gpu_mesh.buffer_info {
            RenderMeshBufferInfo::Indexed {
                index_format,
                count,
            } => {
                let Some(index_slice) =
                    mesh_allocator.mesh_index_slice(&mesh_instance.mesh_asset_id)
                else {
                    return RenderCommandResult::Skip;
                };
                pass.set_index_buffer(index_slice.buffer.slice(..), 0, *index_format);
                pass.draw_indexed(
                    index_slice.range.start..(index_slice.range.start + count),
                    vertex_slice.range.start as i32,
                    0..instance_buffer.length,
                );
            }
            RenderMeshBufferInfo::NonIndexed => {
                pass.draw(vertex_slice.range, 0..instance_buffer.length);
            }
        }
        RenderCommandResult::Success
    }
}
