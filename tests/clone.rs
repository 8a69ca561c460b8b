use nalgebra::{point, Vector3};
use tessel::{
    mesh::{BoundState, Required},
    render::DrawMode,
    Aabb, Error, SpatialNode, TriMesh,
};

const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, 5.0, 0.0];

fn source() -> TriMesh {
    let mut mesh = TriMesh::with_geometry("source", &TRIANGLE, &[0, 1, 2]).unwrap();
    mesh.set_normals(&[0.0f32, 0.0, 1.0].repeat(3)).unwrap();
    mesh.set_solid_color([1.0, 0.5, 0.0, 1.0]).unwrap();
    mesh
}

#[test]
fn clone_requires_geometry() {
    let mut mesh = TriMesh::new("bare");
    assert_eq!(
        mesh.clone_mesh("c").unwrap_err(),
        Error::MissingGeometry {
            mesh: "bare".into(),
            missing: Required::Vertices
        }
    );
    mesh.set_vertices(&TRIANGLE).unwrap();
    assert_eq!(
        mesh.clone_mesh("c").unwrap_err(),
        Error::MissingGeometry {
            mesh: "bare".into(),
            missing: Required::Indices
        }
    );
    mesh.set_indices(&[0, 1, 2]).unwrap();
    assert!(mesh.clone_mesh("c").is_ok());
}

#[test]
fn clone_copies_state() {
    let mut src = source();
    src.set_draw_mode(DrawMode::TriangleFan);
    src.set_center(point![0.0, 2.5, 1.5]);
    src.spatial_mut()
        .set_local_translation(Vector3::new(1.0, 2.0, 3.0));

    let clone = src.clone_mesh("clone").unwrap();
    assert!(clone.is_clone());
    assert!(!src.is_clone());
    assert_eq!(clone.name(), "clone");
    assert_eq!(clone.vertex_count(), 3);
    assert_eq!(clone.index_count(), 3);
    assert_eq!(clone.draw_mode(), DrawMode::TriangleFan);
    assert_eq!(*clone.center(), point![0.0, 2.5, 1.5]);
    assert_eq!(clone.spatial().local(), src.spatial().local());
    assert_eq!(clone.normals().unwrap().len(), 9);
    assert_eq!(clone.colors().unwrap().len(), 12);
    assert!(clone.texcoords().is_none());
    assert!(clone.vertex_buffer().is_none());

    assert_eq!(src.clone_mesh_same_name().unwrap().name(), "source");
}

#[test]
fn transforms_are_independent() {
    let mut src = source();
    let mut clone = src.clone_mesh("clone").unwrap();

    src.spatial_mut()
        .set_local_translation(Vector3::new(5.0, 0.0, 0.0));
    clone
        .spatial_mut()
        .set_local_scale(Vector3::new(2.0, 2.0, 2.0));
    src.update_transform(None);
    clone.update_transform(None);

    assert_eq!(src.spatial().local().scale, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(clone.spatial().local().translation, Vector3::zeros());
    assert_eq!(src.world_matrix()[(0, 3)], 5.0);
    assert_eq!(clone.world_matrix()[(0, 3)], 0.0);
    assert_eq!(clone.world_matrix()[(0, 0)], 2.0);
}

#[test]
fn in_place_edits_show_through() {
    let mut src = source();
    let clone = src.clone_mesh("clone").unwrap();

    src.modify_vertices(|v| v[0] = 42.0).unwrap();
    assert_eq!(clone.vertices().unwrap()[0], 42.0);

    let mut moved = TRIANGLE;
    moved[1] = -3.0;
    src.set_vertices(&moved).unwrap();
    assert_eq!(clone.vertices().unwrap().to_vec(), moved);

    src.set_indices(&[2, 1, 0]).unwrap();
    assert_eq!(clone.indices().unwrap().to_vec(), vec![2, 1, 0]);

    src.set_solid_color_bytes([1, 2, 3, 4]).unwrap();
    assert_eq!(clone.colors().unwrap()[..4], [1, 2, 3, 4]);
}

#[test]
fn reallocation_detaches_storage() {
    let mut src = source();
    let clone = src.clone_mesh("clone").unwrap();

    src.set_vertices(&[9.0; 12]).unwrap();
    src.set_indices(&[0, 1, 2, 3]).unwrap();

    // the clone keeps the old storage
    assert_eq!(clone.vertices().unwrap().to_vec(), TRIANGLE);
    assert_eq!(clone.indices().unwrap().len(), 3);
    assert!(clone.normals().is_some());
    assert!(src.normals().is_none());

    // but its bound follows the source's current vertices
    let bound = clone.try_update_model_bound().unwrap();
    assert_eq!(bound, Aabb::new(point![9.0, 9.0, 9.0], point![9.0, 9.0, 9.0]));
}

#[test]
fn clones_are_read_only() {
    let src = source();
    let mut clone = src.clone_mesh("clone").unwrap();
    let read_only = Err(Error::ReadOnlyClone {
        mesh: "clone".into(),
    });

    assert_eq!(clone.set_vertices(&TRIANGLE), read_only);
    assert_eq!(clone.modify_vertices(|_| {}), read_only);
    assert_eq!(clone.set_indices(&[0]), read_only);
    assert_eq!(clone.set_normals(&[0.0; 9]), read_only);
    assert_eq!(clone.set_texcoords(&[0.0; 6]), read_only);
    assert_eq!(clone.set_colors(&[0; 12]), read_only);
    assert_eq!(clone.set_solid_color([0.0; 4]), read_only);
    assert_eq!(src.vertices().unwrap().to_vec(), TRIANGLE);

    clone.set_draw_mode(DrawMode::TriangleStrip);
    assert_eq!(clone.draw_mode(), DrawMode::TriangleStrip);
    assert_eq!(src.draw_mode(), DrawMode::Triangles);
}

#[test]
fn bound_is_delegated() {
    let mut src = source();
    let clone = src.clone_mesh("clone").unwrap();
    let grandchild = clone.clone_mesh("grandchild").unwrap();

    assert_eq!(grandchild.bound_state(), Some(BoundState::Dirty));
    let bound = grandchild.try_update_model_bound().unwrap();
    // computed once, for the whole chain
    assert_eq!(src.model_bound(), Some(bound));
    assert_eq!(clone.model_bound(), Some(bound));

    src.modify_vertices(|v| v[2] = 10.0).unwrap();
    assert_eq!(clone.bound_state(), Some(BoundState::Dirty));
    assert_eq!(grandchild.try_update_model_bound().unwrap().maxs.z, 10.0);
}

#[test]
fn explicit_bound_through_clone() {
    let src = source();
    let mut clone = src.clone_mesh("clone").unwrap();
    let custom = Aabb::new(point![-1.0, -1.0, -1.0], point![1.0, 1.0, 1.0]);
    clone.set_model_bound(custom).unwrap();
    assert_eq!(src.model_bound(), Some(custom));
}

#[test]
fn dropped_source_detaches_bound() {
    let src = source();
    let mut clone = src.clone_mesh("clone").unwrap();
    drop(src);

    // geometry is still readable and drawable
    assert_eq!(clone.vertices().unwrap().to_vec(), TRIANGLE);
    assert_eq!(clone.bound_state(), None);
    assert_eq!(
        clone.try_update_model_bound(),
        Err(Error::DetachedClone {
            mesh: "clone".into()
        })
    );
    assert!(clone.set_model_bound(Aabb::default()).is_err());
    clone.update_world_bound(false);
    assert!(clone.spatial().world_bound().is_none());
}
