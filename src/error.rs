//! Error types for mesh and collaborator operations.

use thiserror::Error;

/// Errors surfaced by meshes, shaders, textures and their configuration.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("graphics context has been torn down")]
    ContextLost,
    #[error("failed to allocate vertex buffer: {0}")]
    BufferAllocation(String),
    #[error("device reported error 0x{code:04X} while uploading vertex data")]
    Upload { code: u32 },
    #[error("geometry of {len} vertices exceeds the device draw limit")]
    GeometryTooLarge { len: usize },
    #[error("shader compile error: {0}")]
    ShaderCompile(String),
    #[error("shader program link error: {0}")]
    ShaderLink(String),
    #[error("failed to allocate texture: {0}")]
    TextureAllocation(String),
    #[error("texture data has {actual} bytes, expected {expected}")]
    InvalidTextureData { expected: usize, actual: usize },
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("invalid shader bindings: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MeshResult<T> = Result<T, MeshError>;
