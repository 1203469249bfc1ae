//! OpenGL mesh rendering for runst.
//!
//! A [`Mesh`] owns one vertex buffer on a [`DeviceContext`], keeps its
//! model/view/projection transforms and their product up to date, and draws
//! itself with a shared [`ShaderProgram`] and optional [`Texture`]:
//!
//! ```no_run
//! use std::rc::Rc;
//! use runst_mesh::{DeviceContext, GlDevice, Mesh, ShaderProgram, Vertex};
//!
//! # fn run(gl: glow::Context, vs: &str, fs: &str) -> runst_mesh::MeshResult<()> {
//! let context = DeviceContext::new(GlDevice::new(gl));
//! let shader = Rc::new(ShaderProgram::compile(context.clone(), vs, fs)?);
//!
//! let mut mesh = Mesh::new(context.clone())?;
//! mesh.set_vertices(&[
//!     Vertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0], [0.5, 1.0]),
//!     Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
//!     Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
//! ])?;
//! mesh.set_shader(shader);
//! mesh.render()?;
//!
//! // Before the GL context goes away:
//! context.mark_lost();
//! # Ok(())
//! # }
//! ```
//!
//! Everything is single-threaded; meshes are neither `Send` nor `Sync`.

pub mod engine;
pub mod error;

pub use engine::*;
pub use error::{MeshError, MeshResult};
