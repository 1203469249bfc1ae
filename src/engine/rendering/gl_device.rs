use glam::Mat4;
use glow::HasContext;

use crate::engine::components::PrimitiveType;

use super::{BufferUsage, GraphicsDevice};

/// OpenGL device backed by a `glow` context.
pub struct GlDevice<C: HasContext = glow::Context> {
    gl: C,
}

impl<C: HasContext> GlDevice<C> {
    pub fn new(gl: C) -> Self {
        Self { gl }
    }

    /// Raw context, for collaborators that need calls outside [`GraphicsDevice`].
    pub fn gl(&self) -> &C {
        &self.gl
    }
}

fn gl_primitive(mode: PrimitiveType) -> u32 {
    match mode {
        PrimitiveType::Points => glow::POINTS,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::LineLoop => glow::LINE_LOOP,
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveType::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn gl_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

impl<C: HasContext> GraphicsDevice for GlDevice<C> {
    type Buffer = C::Buffer;
    type Program = C::Program;
    type Texture = C::Texture;
    type UniformLocation = C::UniformLocation;

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn buffer_data(&self, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, gl_usage(usage))
        }
    }

    fn take_error(&self) -> Option<u32> {
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(code),
        }
    }

    fn enable_vertex_attrib(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn disable_vertex_attrib(&self, location: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(location) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                components,
                glow::FLOAT,
                normalized,
                stride,
                offset,
            )
        }
    }

    fn draw_arrays(&self, mode: PrimitiveType, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(gl_primitive(mode), first, count) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) }
    }

    fn uniform_matrix_4(&self, location: &Self::UniformLocation, matrix: &Mat4) {
        // glam matrices are column-major, which is what GL expects untransposed.
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, &matrix.to_cols_array())
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }
}
