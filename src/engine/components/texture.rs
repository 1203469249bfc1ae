use std::fmt;
use std::rc::Rc;

use glow::HasContext;

use crate::engine::rendering::{DeviceContext, GlDevice, GraphicsDevice};
use crate::error::{MeshError, MeshResult};

/// Texture unit every mesh samples from.
pub const TEXTURE_UNIT: u32 = 0;

/// A 2D texture owned by its context.
pub struct Texture<D: GraphicsDevice> {
    context: Rc<DeviceContext<D>>,
    texture: D::Texture,
}

impl<D: GraphicsDevice> Texture<D> {
    /// Takes ownership of an already created texture.
    pub fn from_raw(context: Rc<DeviceContext<D>>, texture: D::Texture) -> Self {
        Self { context, texture }
    }

    pub fn texture(&self) -> D::Texture {
        self.texture
    }

    /// Binds to [`TEXTURE_UNIT`].
    pub fn bind(&self) {
        self.context
            .device()
            .bind_texture_2d(TEXTURE_UNIT, Some(self.texture));
    }

    pub fn unbind(context: &DeviceContext<D>) {
        context.device().bind_texture_2d(TEXTURE_UNIT, None);
    }
}

impl<D: GraphicsDevice> Drop for Texture<D> {
    fn drop(&mut self) {
        if !self.context.is_alive() {
            log::debug!("context lost, leaking texture {:?}", self.texture);
            return;
        }
        self.context.device().delete_texture(self.texture);
    }
}

impl<D: GraphicsDevice> fmt::Debug for Texture<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("texture", &self.texture)
            .finish_non_exhaustive()
    }
}

fn rgba8_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

impl<C: HasContext> Texture<GlDevice<C>> {
    /// Uploads tightly packed RGBA8 pixels with linear filtering and repeat wrapping.
    pub fn from_rgba8(
        context: Rc<DeviceContext<GlDevice<C>>>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> MeshResult<Self> {
        context.ensure_alive()?;
        let expected = rgba8_len(width, height).unwrap_or(usize::MAX);
        let fits_gl = i32::try_from(width).is_ok() && i32::try_from(height).is_ok();
        if pixels.len() != expected || !fits_gl {
            return Err(MeshError::InvalidTextureData {
                expected,
                actual: pixels.len(),
            });
        }

        let gl = context.device().gl();
        let texture = unsafe {
            let texture = gl.create_texture().map_err(MeshError::TextureAllocation)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        log::debug!("uploaded {width}x{height} texture {texture:?}");
        Ok(Self { context, texture })
    }

    /// Decodes PNG data and uploads it as RGBA8.
    pub fn from_png(context: Rc<DeviceContext<GlDevice<C>>>, png: &[u8]) -> MeshResult<Self> {
        let image = image::load_from_memory_with_format(png, image::ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba8(context, width, height, image.as_raw())
    }
}
