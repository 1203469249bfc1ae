//! Shader interface names used by meshes.
//!
//! A mesh looks its vertex attributes and uniforms up by name on whatever
//! shader it is given. The defaults match the stock GLSL sources; projects
//! with their own naming scheme load a [`ShaderBindings`] from JSON, where any
//! key left out keeps its default:
//!
//! ```json
//! { "position_attribute": "in_position", "mvp_uniform": "u_mvp" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::components::AttributeKind;
use crate::error::MeshResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderBindings {
    pub position_attribute: String,
    pub normal_attribute: String,
    pub texcoord_attribute: String,
    pub sampler_uniform: String,
    pub model_uniform: String,
    pub mvp_uniform: String,
}

impl Default for ShaderBindings {
    fn default() -> Self {
        Self {
            position_attribute: "aVertex".to_string(),
            normal_attribute: "aNormal".to_string(),
            texcoord_attribute: "aTex".to_string(),
            sampler_uniform: "sTexture".to_string(),
            model_uniform: "uModel".to_string(),
            mvp_uniform: "uMVP".to_string(),
        }
    }
}

impl ShaderBindings {
    pub fn from_json_str(json: &str) -> MeshResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let bindings = Self::from_json_str(&json)?;
        log::debug!("loaded shader bindings from {}", path.display());
        Ok(bindings)
    }

    /// Name of the shader input fed by `kind`.
    pub fn attribute(&self, kind: AttributeKind) -> &str {
        match kind {
            AttributeKind::Position => &self.position_attribute,
            AttributeKind::Normal => &self.normal_attribute,
            AttributeKind::TexCoord => &self.texcoord_attribute,
        }
    }
}
