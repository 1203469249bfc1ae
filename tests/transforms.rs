//! The combined transform stays equal to `projection * view * model`.

mod common;

use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Quat, Vec3};
use rstest::rstest;
use runst_mesh::Mesh;

use common::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Model(Mat4),
    View(Mat4),
    Projection(Mat4),
}

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

fn perspective() -> Mat4 {
    Mat4::perspective_rh_gl(FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0)
}

fn look_at() -> Mat4 {
    Mat4::look_at_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y)
}

fn spin(angle: f32) -> Mat4 {
    Mat4::from_rotation_translation(Quat::from_rotation_y(angle), Vec3::new(0.0, -1.0, 0.0))
}

#[rstest]
#[case::model_only(vec![Step::Model(translate(1.0, 2.0, 3.0))])]
#[case::camera_setup(vec![
    Step::Projection(perspective()),
    Step::View(look_at()),
    Step::Model(spin(0.3)),
])]
#[case::reverse_order(vec![
    Step::Model(spin(1.2)),
    Step::View(look_at()),
    Step::Projection(perspective()),
])]
#[case::repeated_updates(vec![
    Step::Projection(perspective()),
    Step::Model(spin(0.1)),
    Step::Model(spin(0.2)),
    Step::View(translate(0.0, 0.0, -4.0)),
    Step::Model(Mat4::from_scale(Vec3::splat(2.0))),
    Step::Projection(Mat4::orthographic_rh_gl(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0)),
    Step::View(look_at()),
])]
fn test_mvp_tracks_every_setter(#[case] steps: Vec<Step>) {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    let (mut model, mut view, mut projection) = (Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);

    for step in steps {
        match step {
            Step::Model(m) => {
                model = m;
                mesh.set_model(m);
            }
            Step::View(v) => {
                view = v;
                mesh.set_view(v);
            }
            Step::Projection(p) => {
                projection = p;
                mesh.set_projection(p);
            }
        }
        assert_eq!(mesh.model_view_projection(), projection * view * model);
        assert_eq!(mesh.model(), model);
        assert_eq!(mesh.view(), view);
        assert_eq!(mesh.projection(), projection);
    }
}

#[test]
fn test_transforms_make_no_device_calls() {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    context.device().clear_calls();

    mesh.set_model(spin(0.5));
    mesh.set_view(look_at());
    mesh.set_projection(perspective());

    assert_eq!(context.device().call_count(), 0);
}

#[test]
fn test_render_pushes_latest_mvp() {
    let context = full_context();
    let mut mesh = Mesh::new(context.clone()).unwrap();
    mesh.set_vertices(&strip(3)).unwrap();
    mesh.set_shader(shader(&context));
    mesh.set_projection(perspective());
    mesh.set_view(look_at());
    mesh.set_model(spin(0.7));
    context.device().clear_calls();

    mesh.render().unwrap();

    let expected = perspective() * look_at() * spin(0.7);
    assert!(context
        .device()
        .calls()
        .contains(&runst_mesh::DeviceCall::UniformMatrix4 {
            location: MVP,
            matrix: expected,
        }));
}
