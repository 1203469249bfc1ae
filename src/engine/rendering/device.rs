use std::fmt::Debug;

use glam::Mat4;

use crate::engine::components::PrimitiveType;

/// Usage hint passed along with a buffer upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    #[default]
    StaticDraw,
    /// Re-uploaded occasionally.
    DynamicDraw,
    /// Re-uploaded every frame.
    StreamDraw,
}

/// The slice of a graphics API that meshes and their collaborators call into.
///
/// Every call is issued against whatever context is current on the calling
/// thread. Handles are plain copyable values; ownership of the underlying
/// device objects is tracked by the types that create them.
pub trait GraphicsDevice {
    type Buffer: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type Texture: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    // Vertex buffers
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Re-specifies the whole storage of the bound array buffer.
    fn buffer_data(&self, data: &[u8], usage: BufferUsage);
    /// Pops the oldest pending device error, if any.
    fn take_error(&self) -> Option<u32>;

    // Vertex attributes
    fn enable_vertex_attrib(&self, location: u32);
    fn disable_vertex_attrib(&self, location: u32);
    /// Describes a float attribute sourced from the bound array buffer.
    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn draw_arrays(&self, mode: PrimitiveType, first: i32, count: i32);

    // Programs
    fn use_program(&self, program: Option<Self::Program>);
    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);
    fn uniform_matrix_4(&self, location: &Self::UniformLocation, matrix: &Mat4);
    fn delete_program(&self, program: Self::Program);

    // Textures
    /// Activates texture `unit` and binds `texture` as its 2D texture.
    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>);
    fn delete_texture(&self, texture: Self::Texture);
}
