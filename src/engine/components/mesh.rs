use std::fmt;
use std::rc::Rc;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::engine::config::ShaderBindings;
use crate::engine::rendering::{BufferUsage, DeviceContext, GraphicsDevice};
use crate::error::{MeshError, MeshResult};

use super::{ShaderProgram, Texture, Vertex, TEXTURE_UNIT};

/// Stale device errors drained before an upload, so they are not blamed on it.
const MAX_STALE_ERRORS: usize = 8;

/// How a draw call interprets the vertex sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Why a render call drew nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoGeometry,
    NoShader,
}

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn { vertex_count: usize },
    Skipped(SkipReason),
}

/// Renderable geometry with its own vertex buffer and transforms.
///
/// Geometry, texture and shader are shared through `Rc` and may be handed to
/// any number of meshes. The vertex buffer belongs to this mesh alone: it is
/// created by [`Mesh::new`] and deleted on drop, unless the context has been
/// marked lost by then.
///
/// `model_view_projection` is recomputed by every transform setter, so it
/// always equals `projection * view * model` once a setter returns.
pub struct Mesh<D: GraphicsDevice> {
    context: Rc<DeviceContext<D>>,
    buffer: D::Buffer,
    vertices: Option<Rc<[Vertex]>>,
    primitive_type: PrimitiveType,
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    model_view_projection: Mat4,
    texture: Option<Rc<Texture<D>>>,
    shader: Option<Rc<ShaderProgram<D>>>,
    bindings: ShaderBindings,
}

impl<D: GraphicsDevice> Mesh<D> {
    pub fn new(context: Rc<DeviceContext<D>>) -> MeshResult<Self> {
        Self::with_bindings(context, ShaderBindings::default())
    }

    /// Creates a mesh that looks its shader inputs up under `bindings`.
    pub fn with_bindings(
        context: Rc<DeviceContext<D>>,
        bindings: ShaderBindings,
    ) -> MeshResult<Self> {
        context.ensure_alive()?;
        let buffer = context
            .device()
            .create_buffer()
            .map_err(MeshError::BufferAllocation)?;
        log::debug!("created mesh buffer {buffer:?}");

        let model = Mat4::IDENTITY;
        let view = Mat4::IDENTITY;
        let projection = Mat4::IDENTITY;
        Ok(Self {
            context,
            buffer,
            vertices: None,
            primitive_type: PrimitiveType::default(),
            model,
            view,
            projection,
            model_view_projection: projection * view * model,
            texture: None,
            shader: None,
            bindings,
        })
    }

    /// Copies `vertices` and uploads them, replacing any previous geometry.
    pub fn set_vertices(&mut self, vertices: &[Vertex]) -> MeshResult<()> {
        self.set_shared_vertices(Rc::from(vertices))
    }

    /// Shares `vertices` without copying and uploads them to this mesh's buffer.
    pub fn set_shared_vertices(&mut self, vertices: Rc<[Vertex]>) -> MeshResult<()> {
        // Whatever was in the buffer is gone once re-specification starts.
        self.vertices = None;
        self.context.ensure_alive()?;
        draw_count(vertices.len())?;

        let device = self.context.device();
        for _ in 0..MAX_STALE_ERRORS {
            match device.take_error() {
                Some(code) => log::trace!("discarding stale device error 0x{code:04X}"),
                None => break,
            }
        }

        device.bind_array_buffer(Some(self.buffer));
        device.buffer_data(bytemuck::cast_slice(&vertices[..]), BufferUsage::StaticDraw);
        device.bind_array_buffer(None);

        if let Some(code) = device.take_error() {
            log::warn!(
                "upload of {} vertices to buffer {:?} failed with 0x{code:04X}",
                vertices.len(),
                self.buffer
            );
            return Err(MeshError::Upload { code });
        }

        self.vertices = Some(vertices);
        Ok(())
    }

    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) {
        self.primitive_type = primitive_type;
    }

    pub fn set_texture(&mut self, texture: Rc<Texture<D>>) {
        self.texture = Some(texture);
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    pub fn set_shader(&mut self, shader: Rc<ShaderProgram<D>>) {
        self.shader = Some(shader);
    }

    pub fn clear_shader(&mut self) {
        self.shader = None;
    }

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.update_model_view_projection();
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.update_model_view_projection();
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.update_model_view_projection();
    }

    fn update_model_view_projection(&mut self) {
        self.model_view_projection = self.projection * self.view * self.model;
    }

    /// Draws the current geometry with the current shader.
    ///
    /// Without geometry or without a shader nothing reaches the device and
    /// the reason is returned as [`RenderOutcome::Skipped`]. Otherwise the
    /// draw leaves no attribute array enabled and no buffer, texture or
    /// program bound.
    pub fn render(&self) -> MeshResult<RenderOutcome> {
        let Some(vertices) = self.vertices.as_deref() else {
            return Ok(self.skip(SkipReason::NoGeometry));
        };
        let Some(shader) = self.shader.as_deref() else {
            return Ok(self.skip(SkipReason::NoShader));
        };
        self.context.ensure_alive()?;
        let count = draw_count(vertices.len())?;
        let device = self.context.device();

        if let Some(texture) = &self.texture {
            texture.bind();
        }
        shader.use_program();

        if let Some(location) = shader.uniform_location(&self.bindings.sampler_uniform) {
            device.uniform_1_i32(&location, TEXTURE_UNIT as i32);
        }
        if let Some(location) = shader.uniform_location(&self.bindings.model_uniform) {
            device.uniform_matrix_4(&location, &self.model);
        }
        if let Some(location) = shader.uniform_location(&self.bindings.mvp_uniform) {
            device.uniform_matrix_4(&location, &self.model_view_projection);
        }

        device.bind_array_buffer(Some(self.buffer));

        let mut enabled = [None; Vertex::ATTRIBUTES.len()];
        for (slot, attribute) in enabled.iter_mut().zip(Vertex::ATTRIBUTES) {
            let Some(location) = shader.attribute_location(self.bindings.attribute(attribute.kind))
            else {
                continue;
            };
            device.enable_vertex_attrib(location);
            device.vertex_attrib_pointer_f32(
                location,
                attribute.components,
                false,
                Vertex::STRIDE as i32,
                attribute.offset as i32,
            );
            *slot = Some(location);
        }

        device.draw_arrays(self.primitive_type, 0, count);

        for location in enabled.into_iter().flatten() {
            device.disable_vertex_attrib(location);
        }

        device.bind_array_buffer(None);
        Texture::<D>::unbind(&self.context);
        ShaderProgram::<D>::unbind(&self.context);

        Ok(RenderOutcome::Drawn {
            vertex_count: vertices.len(),
        })
    }

    fn skip(&self, reason: SkipReason) -> RenderOutcome {
        log::debug!("mesh buffer {:?} not drawn: {reason:?}", self.buffer);
        RenderOutcome::Skipped(reason)
    }

    pub fn vertices(&self) -> Option<&Rc<[Vertex]>> {
        self.vertices.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.as_ref().map_or(0, |v| v.len())
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.model_view_projection
    }

    pub fn texture(&self) -> Option<&Rc<Texture<D>>> {
        self.texture.as_ref()
    }

    pub fn shader(&self) -> Option<&Rc<ShaderProgram<D>>> {
        self.shader.as_ref()
    }

    pub fn bindings(&self) -> &ShaderBindings {
        &self.bindings
    }

    pub fn buffer(&self) -> D::Buffer {
        self.buffer
    }

    pub fn context(&self) -> &Rc<DeviceContext<D>> {
        &self.context
    }
}

impl<D: GraphicsDevice> Drop for Mesh<D> {
    fn drop(&mut self) {
        if !self.context.is_alive() {
            log::debug!("context lost, leaking mesh buffer {:?}", self.buffer);
            return;
        }
        self.context.device().delete_buffer(self.buffer);
    }
}

impl<D: GraphicsDevice> fmt::Debug for Mesh<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("buffer", &self.buffer)
            .field("vertex_count", &self.vertex_count())
            .field("primitive_type", &self.primitive_type)
            .field("has_texture", &self.texture.is_some())
            .field("has_shader", &self.shader.is_some())
            .finish_non_exhaustive()
    }
}

fn draw_count(len: usize) -> MeshResult<i32> {
    i32::try_from(len).map_err(|_| MeshError::GeometryTooLarge { len })
}
