pub mod mesh;
pub mod shader;
pub mod texture;
pub mod vertex;

pub use mesh::{Mesh, PrimitiveType, RenderOutcome, SkipReason};
pub use shader::ShaderProgram;
pub use texture::{Texture, TEXTURE_UNIT};
pub use vertex::{AttributeKind, Vertex, VertexAttribute};
