use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::{MeshError, MeshResult};

use super::GraphicsDevice;

/// A graphics device together with its lifecycle state.
///
/// Meshes, textures and shader programs hold an `Rc` to the context that
/// created their device objects. Whoever tears the real context down calls
/// [`DeviceContext::mark_lost`] first; from then on every holder skips its
/// release calls instead of calling into a dead API.
pub struct DeviceContext<D: GraphicsDevice> {
    device: D,
    alive: Cell<bool>,
}

impl<D: GraphicsDevice> DeviceContext<D> {
    pub fn new(device: D) -> Rc<Self> {
        Rc::new(Self {
            device,
            alive: Cell::new(true),
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Flags the context as torn down. Idempotent; the flag never resets.
    pub fn mark_lost(&self) {
        if self.alive.replace(false) {
            log::info!("graphics context marked lost; device releases will be skipped");
        }
    }

    pub(crate) fn ensure_alive(&self) -> MeshResult<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(MeshError::ContextLost)
        }
    }
}

impl<D: GraphicsDevice> fmt::Debug for DeviceContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceContext")
            .field("alive", &self.alive.get())
            .finish_non_exhaustive()
    }
}
