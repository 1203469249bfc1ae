pub mod context;
pub mod device;
pub mod gl_device;
pub mod recording;

pub use context::DeviceContext;
pub use device::{BufferUsage, GraphicsDevice};
pub use gl_device::GlDevice;
pub use recording::{DeviceCall, RecordingDevice};
