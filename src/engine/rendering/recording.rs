//! Headless device that records every state-changing call.
//!
//! Used by tests and by tooling that wants to inspect what a mesh would ask
//! the GPU to do without a live context. Handles are small integers handed
//! out from a single counter, so buffers, programs and textures never
//! collide.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use glam::Mat4;

use crate::engine::components::PrimitiveType;

use super::{BufferUsage, GraphicsDevice};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindArrayBuffer(Option<u32>),
    BufferData {
        buffer: Option<u32>,
        len: usize,
        usage: BufferUsage,
    },
    EnableVertexAttrib(u32),
    DisableVertexAttrib(u32),
    VertexAttribPointer {
        location: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    DrawArrays {
        mode: PrimitiveType,
        first: i32,
        count: i32,
    },
    UseProgram(Option<u32>),
    Uniform1i {
        location: u32,
        value: i32,
    },
    UniformMatrix4 {
        location: u32,
        matrix: Mat4,
    },
    BindTexture2d {
        unit: u32,
        texture: Option<u32>,
    },
    DeleteProgram(u32),
    DeleteTexture(u32),
}

/// Recording [`GraphicsDevice`].
///
/// Every program exposes the same attribute and uniform names, configured
/// with [`with_attribute`](Self::with_attribute) and
/// [`with_uniform`](Self::with_uniform).
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: RefCell<Vec<DeviceCall>>,
    next_handle: Cell<u32>,
    attributes: HashMap<String, u32>,
    uniforms: HashMap<String, u32>,
    bound_buffer: Cell<Option<u32>>,
    live_buffers: RefCell<BTreeSet<u32>>,
    buffer_contents: RefCell<HashMap<u32, Vec<u8>>>,
    enabled_attributes: RefCell<BTreeSet<u32>>,
    pending_errors: RefCell<Vec<u32>>,
    upload_error: Cell<Option<u32>>,
    fail_allocation: RefCell<Option<String>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes the attribute `name` at `location` on every program.
    pub fn with_attribute(mut self, name: impl Into<String>, location: u32) -> Self {
        self.attributes.insert(name.into(), location);
        self
    }

    /// Exposes the uniform `name` at `location` on every program.
    pub fn with_uniform(mut self, name: impl Into<String>, location: u32) -> Self {
        self.uniforms.insert(name.into(), location);
        self
    }

    /// Hands out a fresh handle for use as a raw program or texture.
    pub fn allocate_handle(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }

    /// Snapshot of every call recorded so far.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Recorded draw calls as `(mode, first, count)`.
    pub fn draws(&self) -> Vec<(PrimitiveType, i32, i32)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match *call {
                DeviceCall::DrawArrays { mode, first, count } => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    /// Attribute locations currently enabled.
    pub fn enabled_attributes(&self) -> BTreeSet<u32> {
        self.enabled_attributes.borrow().clone()
    }

    /// Buffers created and not yet deleted.
    pub fn live_buffers(&self) -> BTreeSet<u32> {
        self.live_buffers.borrow().clone()
    }

    /// Bytes last uploaded into `buffer`.
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.buffer_contents.borrow().get(&buffer).cloned()
    }

    pub fn bound_buffer(&self) -> Option<u32> {
        self.bound_buffer.get()
    }

    /// Queues an error that has nothing to do with the next upload.
    pub fn push_error(&self, code: u32) {
        self.pending_errors.borrow_mut().push(code);
    }

    /// Makes the next `buffer_data` call raise `code`.
    pub fn fail_next_upload(&self, code: u32) {
        self.upload_error.set(Some(code));
    }

    /// Makes the next `create_buffer` call fail with `reason`.
    pub fn fail_next_allocation(&self, reason: impl Into<String>) {
        *self.fail_allocation.borrow_mut() = Some(reason.into());
    }

    fn record(&self, call: DeviceCall) {
        log::trace!("RecordingDevice: {call:?}");
        self.calls.borrow_mut().push(call);
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = u32;
    type Program = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn create_buffer(&self) -> Result<u32, String> {
        if let Some(reason) = self.fail_allocation.borrow_mut().take() {
            return Err(reason);
        }
        let buffer = self.allocate_handle();
        self.live_buffers.borrow_mut().insert(buffer);
        self.record(DeviceCall::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn delete_buffer(&self, buffer: u32) {
        self.live_buffers.borrow_mut().remove(&buffer);
        self.buffer_contents.borrow_mut().remove(&buffer);
        if self.bound_buffer.get() == Some(buffer) {
            self.bound_buffer.set(None);
        }
        self.record(DeviceCall::DeleteBuffer(buffer));
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.bound_buffer.set(buffer);
        self.record(DeviceCall::BindArrayBuffer(buffer));
    }

    fn buffer_data(&self, data: &[u8], usage: BufferUsage) {
        let buffer = self.bound_buffer.get();
        match self.upload_error.take() {
            Some(code) => self.pending_errors.borrow_mut().push(code),
            None => {
                if let Some(buffer) = buffer {
                    self.buffer_contents
                        .borrow_mut()
                        .insert(buffer, data.to_vec());
                }
            }
        }
        self.record(DeviceCall::BufferData {
            buffer,
            len: data.len(),
            usage,
        });
    }

    fn take_error(&self) -> Option<u32> {
        let mut errors = self.pending_errors.borrow_mut();
        if errors.is_empty() {
            None
        } else {
            Some(errors.remove(0))
        }
    }

    fn enable_vertex_attrib(&self, location: u32) {
        self.enabled_attributes.borrow_mut().insert(location);
        self.record(DeviceCall::EnableVertexAttrib(location));
    }

    fn disable_vertex_attrib(&self, location: u32) {
        self.enabled_attributes.borrow_mut().remove(&location);
        self.record(DeviceCall::DisableVertexAttrib(location));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(DeviceCall::VertexAttribPointer {
            location,
            components,
            normalized,
            stride,
            offset,
        });
    }

    fn draw_arrays(&self, mode: PrimitiveType, first: i32, count: i32) {
        self.record(DeviceCall::DrawArrays { mode, first, count });
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(DeviceCall::UseProgram(program));
    }

    fn get_uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniforms.get(name).copied()
    }

    fn get_attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    fn uniform_1_i32(&self, location: &u32, value: i32) {
        self.record(DeviceCall::Uniform1i {
            location: *location,
            value,
        });
    }

    fn uniform_matrix_4(&self, location: &u32, matrix: &Mat4) {
        self.record(DeviceCall::UniformMatrix4 {
            location: *location,
            matrix: *matrix,
        });
    }

    fn delete_program(&self, program: u32) {
        self.record(DeviceCall::DeleteProgram(program));
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<u32>) {
        self.record(DeviceCall::BindTexture2d { unit, texture });
    }

    fn delete_texture(&self, texture: u32) {
        self.record(DeviceCall::DeleteTexture(texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let device = RecordingDevice::new();
        let buffer = device.create_buffer().unwrap();
        let program = device.allocate_handle();
        assert_ne!(buffer, program);
        assert_eq!(device.live_buffers(), BTreeSet::from([buffer]));
    }

    #[test]
    fn test_upload_failure_is_reported_once() {
        let device = RecordingDevice::new();
        let buffer = device.create_buffer().unwrap();
        device.bind_array_buffer(Some(buffer));
        device.fail_next_upload(0x0505);
        device.buffer_data(&[1, 2, 3], BufferUsage::StaticDraw);

        assert_eq!(device.take_error(), Some(0x0505));
        assert_eq!(device.take_error(), None);
        assert_eq!(device.buffer_contents(buffer), None);
    }

    #[test]
    fn test_allocation_failure_is_one_shot() {
        let device = RecordingDevice::new();
        device.fail_next_allocation("out of handles");
        assert_eq!(device.create_buffer(), Err("out of handles".to_string()));
        assert!(device.create_buffer().is_ok());
    }

    #[test]
    fn test_enable_disable_tracking() {
        let device = RecordingDevice::new();
        device.enable_vertex_attrib(2);
        device.enable_vertex_attrib(5);
        device.disable_vertex_attrib(2);
        assert_eq!(device.enabled_attributes(), BTreeSet::from([5]));
    }
}
