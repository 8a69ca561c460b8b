use std::{cell::RefCell, rc::Rc};

use approx::assert_relative_eq;
use nalgebra::{point, UnitQuaternion, Vector3};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use tessel::{mesh::BoundState, Aabb, Error, Group, SpatialNode, TriMesh};

const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, 5.0, 0.0];

#[test]
fn triangle_bound() {
    let mut mesh = TriMesh::with_geometry("tri", &TRIANGLE, &[0, 1, 2]).unwrap();
    assert_eq!(mesh.bound_state(), Some(BoundState::Dirty));
    assert_eq!(mesh.model_bound(), None);
    mesh.update_model_bound();
    let bound = mesh.model_bound().unwrap();
    assert_eq!(bound.mins, point![-1.0, 0.0, 0.0]);
    assert_eq!(bound.maxs, point![1.0, 5.0, 3.0]);
}

#[test]
fn update_scans_once() {
    let mesh = TriMesh::with_geometry("tri", &TRIANGLE, &[0, 1, 2]).unwrap();
    let first = mesh.try_update_model_bound().unwrap();

    // a write which bypasses invalidation isn't picked up by a second update
    mesh.vertex_buffer().unwrap().write()[0] = 100.0;
    let second = mesh.try_update_model_bound().unwrap();
    assert_eq!(first, second);
    assert_eq!(mesh.bound_state(), Some(BoundState::Valid(first)));
}

#[test]
fn invalidation_forces_rescan() {
    let mut mesh = TriMesh::with_geometry("tri", &TRIANGLE, &[0, 1, 2]).unwrap();
    mesh.update_model_bound();
    mesh.vertex_buffer().unwrap().write()[0] = 100.0;
    mesh.invalidate_model_bound();
    assert_eq!(mesh.try_update_model_bound().unwrap().maxs.x, 100.0);

    mesh.modify_vertices(|v| v[4] = -7.0).unwrap();
    assert_eq!(mesh.bound_state(), Some(BoundState::Dirty));
    assert_eq!(mesh.try_update_model_bound().unwrap().mins.y, -7.0);

    mesh.set_vertices(&[2.0, 2.0, 2.0]).unwrap();
    assert_eq!(mesh.bound_state(), Some(BoundState::Dirty));
    let bound = mesh.try_update_model_bound().unwrap();
    assert_eq!(bound.mins, bound.maxs);
}

#[test]
fn no_vertices_is_a_noop() {
    let mut mesh = TriMesh::new("empty");
    assert_eq!(mesh.bound_state(), Some(BoundState::Fresh));
    mesh.update_model_bound();
    assert_eq!(mesh.bound_state(), Some(BoundState::Fresh));
    assert!(matches!(
        mesh.try_update_model_bound(),
        Err(Error::MissingGeometry { .. })
    ));
    mesh.update_world_bound(false);
    assert!(mesh.spatial().world_bound().is_none());
}

#[test]
fn empty_vertex_buffer_is_degenerate() {
    let mesh = TriMesh::with_geometry("empty", &[], &[]).unwrap();
    assert_eq!(mesh.try_update_model_bound().unwrap(), Aabb::default());
}

#[test]
fn explicit_bound_overrides() {
    let mut mesh = TriMesh::with_geometry("tri", &TRIANGLE, &[0, 1, 2]).unwrap();
    let custom = Aabb::new(point![-10.0, -10.0, -10.0], point![10.0, 10.0, 10.0]);
    mesh.set_model_bound(custom).unwrap();
    assert_eq!(mesh.bound_state(), Some(BoundState::Valid(custom)));
    // no rescan, the override stands
    assert_eq!(mesh.try_update_model_bound().unwrap(), custom);
    // until the vertices change
    mesh.set_vertices(&TRIANGLE).unwrap();
    assert_ne!(mesh.try_update_model_bound().unwrap(), custom);
}

#[quickcheck]
fn bound_contains_every_vertex(vertices: Vec<(f32, f32, f32)>) -> TestResult {
    if vertices
        .iter()
        .any(|(x, y, z)| !(x.is_finite() && y.is_finite() && z.is_finite()))
    {
        return TestResult::discard();
    }
    let flat: Vec<f32> = vertices.iter().flat_map(|&(x, y, z)| [x, y, z]).collect();
    let mesh = TriMesh::with_geometry("prop", &flat, &[]).unwrap();
    let bound = mesh.try_update_model_bound().unwrap();
    let contained = vertices
        .iter()
        .all(|&(x, y, z)| bound.contains(&point![x, y, z]));
    let tight = vertices.is_empty()
        || (vertices.iter().any(|v| v.0 == bound.mins.x)
            && vertices.iter().any(|v| v.1 == bound.maxs.y)
            && vertices.iter().any(|v| v.2 == bound.maxs.z));
    TestResult::from_bool(contained && tight)
}

#[test]
fn world_bound_follows_transform() {
    let mut mesh = TriMesh::with_geometry("tri", &TRIANGLE, &[0, 1, 2]).unwrap();
    mesh.spatial_mut()
        .set_local_translation(Vector3::new(10.0, 0.0, 0.0));
    mesh.spatial_mut()
        .set_local_rotation(UnitQuaternion::from_axis_angle(
            &Vector3::z_axis(),
            std::f32::consts::FRAC_PI_2,
        ));
    mesh.update_transform(None);
    mesh.update_world_bound(false);

    // rotating 90° about z maps (x, y) to (-y, x)
    let world = mesh.spatial().world_bound().unwrap();
    assert_relative_eq!(world.mins.x, 10.0 - 5.0, epsilon = 1e-5);
    assert_relative_eq!(world.maxs.x, 10.0, epsilon = 1e-5);
    assert_relative_eq!(world.mins.y, -1.0, epsilon = 1e-5);
    assert_relative_eq!(world.maxs.y, 1.0, epsilon = 1e-5);
    assert_relative_eq!(world.mins.z, 0.0, epsilon = 1e-5);
    assert_relative_eq!(world.maxs.z, 3.0, epsilon = 1e-5);
    // the model bound is untouched
    assert_eq!(mesh.model_bound().unwrap().maxs, point![1.0, 5.0, 3.0]);
}

#[test]
fn world_bound_propagates_to_parent() {
    let group = Group::new("root");
    let a = Rc::new(RefCell::new(
        TriMesh::with_geometry("a", &TRIANGLE, &[0, 1, 2]).unwrap(),
    ));
    let b = Rc::new(RefCell::new(
        TriMesh::with_geometry("b", &[5.0, 5.0, 5.0, 6.0, 6.0, 6.0], &[0, 1]).unwrap(),
    ));
    Group::attach(&group, a.clone());
    Group::attach(&group, b.clone());
    assert!(a.borrow().spatial().parent().is_some());

    a.borrow_mut().update_world_bound(true);
    let after_a = *group.borrow().spatial().world_bound().unwrap();
    assert_eq!(after_a.maxs, point![1.0, 5.0, 3.0]);

    b.borrow_mut().update_world_bound(true);
    let after_b = *group.borrow().spatial().world_bound().unwrap();
    assert_eq!(after_b.mins, point![-1.0, 0.0, 0.0]);
    assert_eq!(after_b.maxs, point![6.0, 6.0, 6.0]);

    // without propagation the parent isn't told
    let c = Rc::new(RefCell::new(
        TriMesh::with_geometry("c", &[-50.0, 0.0, 0.0], &[0]).unwrap(),
    ));
    Group::attach(&group, c.clone());
    c.borrow_mut().update_world_bound(false);
    assert_eq!(*group.borrow().spatial().world_bound().unwrap(), after_b);
}

#[test]
fn group_recomputes_from_children() {
    let group = Group::new("root");
    let mesh = Rc::new(RefCell::new(
        TriMesh::with_geometry("a", &TRIANGLE, &[0, 1, 2]).unwrap(),
    ));
    Group::attach(&group, mesh.clone());
    group
        .borrow_mut()
        .spatial_mut()
        .set_local_translation(Vector3::new(0.0, 0.0, -1.0));
    group.borrow_mut().update_transform(None);
    group.borrow_mut().update_world_bound(false);

    let bound = *group.borrow().spatial().world_bound().unwrap();
    assert_eq!(bound.mins, point![-1.0, 0.0, -1.0]);
    assert_eq!(bound.maxs, point![1.0, 5.0, 2.0]);

    let detached = group.borrow_mut().detach(0).unwrap();
    assert!(detached.borrow().spatial().parent().is_none());
    assert!(group.borrow().children().is_empty());
}
