use approx::assert_relative_eq;
use nalgebra::{Matrix4, Point3, Vector3};

use centermark_core::transform::IjkToWorld;

#[test]
fn test_identity_maps_point_to_itself() {
    let transform = IjkToWorld::identity();
    let p = Point3::new(4.0, 6.0, 8.0);

    assert_relative_eq!(transform.map_point(&p), p, epsilon = 1e-12);
}

#[test]
fn test_origin_spacing_mapping() {
    let transform = IjkToWorld::from_origin_spacing(
        Vector3::new(10.0, -5.0, 2.0),
        Vector3::new(0.5, 0.5, 2.0),
    );

    let world = transform.map_point(&Point3::new(4.0, 6.0, 8.0));

    assert_relative_eq!(world, Point3::new(12.0, -2.0, 18.0), epsilon = 1e-12);
}

#[test]
fn test_origin_and_spacing_accessors() {
    let origin = Vector3::new(1.0, 2.0, 3.0);
    let spacing = Vector3::new(0.5, 1.5, 2.5);
    let transform = IjkToWorld::from_origin_spacing(origin, spacing);

    assert_relative_eq!(transform.origin(), origin, epsilon = 1e-12);
    assert_relative_eq!(transform.spacing(), spacing, epsilon = 1e-12);
}

#[test]
fn test_axis_permuting_matrix() {
    // Columns send index x to world y, y to z, and z to x.
    #[rustfmt::skip]
    let matrix = Matrix4::new(
        0.0, 0.0, 1.0, 10.0,
        1.0, 0.0, 0.0, 20.0,
        0.0, 1.0, 0.0, 30.0,
        0.0, 0.0, 0.0, 1.0,
    );
    let transform = IjkToWorld::from(matrix);

    let world = transform.map_point(&Point3::new(1.0, 2.0, 3.0));

    assert_relative_eq!(world, Point3::new(13.0, 21.0, 32.0), epsilon = 1e-12);
    assert_relative_eq!(transform.origin(), Vector3::new(10.0, 20.0, 30.0), epsilon = 1e-12);
    assert_relative_eq!(transform.spacing(), Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
}

#[test]
fn test_default_is_identity() {
    let transform = IjkToWorld::default();
    assert_eq!(transform, IjkToWorld::identity());
}
