//! Shared fixtures for mesh integration tests.

use std::rc::Rc;

use runst_mesh::{
    init_logging, DeviceContext, LoggingConfig, RecordingDevice, ShaderProgram, Texture, Vertex,
};

pub const POSITION: u32 = 0;
pub const NORMAL: u32 = 1;
pub const TEXCOORD: u32 = 2;
pub const SAMPLER: u32 = 10;
pub const MODEL: u32 = 11;
pub const MVP: u32 = 12;

pub type Context = Rc<DeviceContext<RecordingDevice>>;

/// A context whose programs expose every standard attribute and uniform.
pub fn full_context() -> Context {
    init_logging(LoggingConfig::for_tests());
    DeviceContext::new(
        RecordingDevice::new()
            .with_attribute("aVertex", POSITION)
            .with_attribute("aNormal", NORMAL)
            .with_attribute("aTex", TEXCOORD)
            .with_uniform("sTexture", SAMPLER)
            .with_uniform("uModel", MODEL)
            .with_uniform("uMVP", MVP),
    )
}

/// A context whose programs only expose a position input and the MVP uniform.
pub fn position_only_context() -> Context {
    init_logging(LoggingConfig::for_tests());
    DeviceContext::new(
        RecordingDevice::new()
            .with_attribute("aVertex", POSITION)
            .with_uniform("uMVP", MVP),
    )
}

pub fn shader(context: &Context) -> Rc<ShaderProgram<RecordingDevice>> {
    let handle = context.device().allocate_handle();
    Rc::new(ShaderProgram::from_raw(context.clone(), handle))
}

pub fn texture(context: &Context) -> Rc<Texture<RecordingDevice>> {
    let handle = context.device().allocate_handle();
    Rc::new(Texture::from_raw(context.clone(), handle))
}

/// `n` distinct vertices along the x axis.
pub fn strip(n: usize) -> Vec<Vertex> {
    (0..n)
        .map(|i| {
            let x = i as f32;
            Vertex::new([x, 0.0, 0.0], [0.0, 0.0, 1.0], [x / n.max(1) as f32, 0.0])
        })
        .collect()
}
