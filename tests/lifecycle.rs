//! Buffer ownership and dead-context behavior.

mod common;

use rstest::rstest;
use runst_mesh::{DeviceCall, DeviceContext, Mesh, MeshError, RecordingDevice};

use common::*;

fn delete_calls(context: &Context) -> Vec<DeviceCall> {
    context
        .device()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DeviceCall::DeleteBuffer(_)))
        .collect()
}

#[test]
fn test_construct_allocates_one_buffer() {
    let context = full_context();
    let mesh = Mesh::new(context.clone()).unwrap();
    assert_eq!(
        context.device().live_buffers().into_iter().collect::<Vec<_>>(),
        vec![mesh.buffer()]
    );
}

#[rstest]
#[case::empty(0)]
#[case::with_geometry(12)]
fn test_drop_releases_exactly_once(#[case] n: usize) {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    if n > 0 {
        mesh.set_vertices(&strip(n)).unwrap();
    }
    let buffer = mesh.buffer();

    drop(mesh);

    assert_eq!(delete_calls(&context), vec![DeviceCall::DeleteBuffer(buffer)]);
    assert!(context.device().live_buffers().is_empty());
}

#[test]
fn test_drop_after_context_loss_skips_release() {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    mesh.set_vertices(&strip(3)).unwrap();
    mesh.set_shader(shader(&context));
    mesh.set_texture(texture(&context));

    context.mark_lost();
    context.device().clear_calls();
    drop(mesh);

    assert_eq!(context.device().call_count(), 0);
}

#[test]
fn test_loss_is_shared_by_every_mesh() {
    let context = full_context();
    let meshes: Vec<_> = (0..4).map(|_| Mesh::new(context.clone()).unwrap()).collect();
    let survivor = Mesh::new(context.clone()).unwrap();
    drop(survivor);

    context.mark_lost();
    drop(meshes);

    assert_eq!(delete_calls(&context).len(), 1);
}

#[test]
fn test_construct_on_lost_context() {
    let context = full_context();
    context.mark_lost();

    let err = Mesh::new(context.clone()).unwrap_err();

    assert!(matches!(err, MeshError::ContextLost));
    assert_eq!(context.device().call_count(), 0);
}

#[test]
fn test_allocation_failure_is_surfaced() {
    let context = DeviceContext::new(RecordingDevice::new());
    context.device().fail_next_allocation("GL_OUT_OF_MEMORY");

    let err = Mesh::new(context.clone()).unwrap_err();

    assert!(matches!(err, MeshError::BufferAllocation(ref reason) if reason == "GL_OUT_OF_MEMORY"));
    assert!(context.device().live_buffers().is_empty());
}

#[test]
fn test_upload_on_lost_context() {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    mesh.set_vertices(&strip(3)).unwrap();
    context.mark_lost();
    context.device().clear_calls();

    let err = mesh.set_vertices(&strip(5)).unwrap_err();

    assert!(matches!(err, MeshError::ContextLost));
    assert_eq!(context.device().call_count(), 0);
    assert!(mesh.vertices().is_none());
}

#[test]
fn test_shared_collaborators_released_with_last_owner() {
    let context = full_context();
    let shader = shader(&context);
    let texture = texture(&context);
    let (program, tex) = (shader.program(), texture.texture());
    let mut mesh = Mesh::new(context.clone()).unwrap();
    mesh.set_shader(shader);
    mesh.set_texture(texture);
    context.device().clear_calls();

    drop(mesh);

    let calls = context.device().calls();
    assert!(calls.contains(&DeviceCall::DeleteProgram(program)));
    assert!(calls.contains(&DeviceCall::DeleteTexture(tex)));
    assert_eq!(calls.len(), 3);
}
