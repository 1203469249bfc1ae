use std::fmt;
use std::rc::Rc;

use glow::HasContext;

use crate::engine::rendering::{DeviceContext, GlDevice, GraphicsDevice};
use crate::error::{MeshError, MeshResult};

/// A linked shader program owned by its context.
///
/// Shared between meshes through `Rc`; the program is deleted when the last
/// reference goes away, unless the context has been lost by then.
pub struct ShaderProgram<D: GraphicsDevice> {
    context: Rc<DeviceContext<D>>,
    program: D::Program,
}

impl<D: GraphicsDevice> ShaderProgram<D> {
    /// Takes ownership of an already linked program.
    pub fn from_raw(context: Rc<DeviceContext<D>>, program: D::Program) -> Self {
        Self { context, program }
    }

    pub fn program(&self) -> D::Program {
        self.program
    }

    pub fn use_program(&self) {
        self.context.device().use_program(Some(self.program));
    }

    pub fn uniform_location(&self, name: &str) -> Option<D::UniformLocation> {
        self.context
            .device()
            .get_uniform_location(self.program, name)
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.context.device().get_attrib_location(self.program, name)
    }

    /// Leaves no program active.
    pub fn unbind(context: &DeviceContext<D>) {
        context.device().use_program(None);
    }
}

impl<D: GraphicsDevice> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if !self.context.is_alive() {
            log::debug!("context lost, leaking program {:?}", self.program);
            return;
        }
        self.context.device().delete_program(self.program);
    }
}

impl<D: GraphicsDevice> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl<C: HasContext> ShaderProgram<GlDevice<C>> {
    /// Compiles and links a program from GLSL vertex and fragment sources.
    pub fn compile(
        context: Rc<DeviceContext<GlDevice<C>>>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> MeshResult<Self> {
        context.ensure_alive()?;
        let gl = context.device().gl();

        let program = unsafe {
            let vs = compile_stage(gl, glow::VERTEX_SHADER, vertex_source)?;
            let fs = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_source) {
                Ok(fs) => fs,
                Err(e) => {
                    gl.delete_shader(vs);
                    return Err(e);
                }
            };
            let linked = link_program(gl, vs, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            linked?
        };

        log::debug!("linked shader program {program:?}");
        Ok(Self { context, program })
    }
}

unsafe fn compile_stage<C: HasContext>(
    gl: &C,
    stage: u32,
    source: &str,
) -> MeshResult<C::Shader> {
    let shader = gl.create_shader(stage).map_err(MeshError::ShaderCompile)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let info = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(MeshError::ShaderCompile(info));
    }
    Ok(shader)
}

unsafe fn link_program<C: HasContext>(
    gl: &C,
    vs: C::Shader,
    fs: C::Shader,
) -> MeshResult<C::Program> {
    let program = gl.create_program().map_err(MeshError::ShaderLink)?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);
    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);

    if !gl.get_program_link_status(program) {
        let info = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(MeshError::ShaderLink(info));
    }
    Ok(program)
}
