use std::fmt;

use nalgebra::{Matrix4, Point3, Vector3};

/// Affine mapping from index space into world space (RAS).
///
/// Wraps a homogeneous 4x4 matrix. A point is extended with w = 1,
/// left-multiplied, and the homogeneous coordinate is discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IjkToWorld {
    pub matrix: Matrix4<f64>,
}

impl IjkToWorld {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Axis-aligned mapping from a world origin and per-axis voxel spacing.
    pub fn from_origin_spacing(origin: Vector3<f64>, spacing: Vector3<f64>) -> Self {
        let mut matrix = Matrix4::new_nonuniform_scaling(&spacing);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin);
        Self { matrix }
    }

    /// Map an index-space point into world space.
    pub fn map_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// World coordinate of index (0, 0, 0): the translation column.
    pub fn origin(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Per-axis voxel spacing: the norms of the three direction columns.
    pub fn spacing(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix.fixed_view::<3, 1>(0, 0).norm(),
            self.matrix.fixed_view::<3, 1>(0, 1).norm(),
            self.matrix.fixed_view::<3, 1>(0, 2).norm(),
        )
    }
}

impl Default for IjkToWorld {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f64>> for IjkToWorld {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }
}

impl fmt::Display for IjkToWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            writeln!(
                f,
                "[{:10.4} {:10.4} {:10.4} {:10.4}]",
                self.matrix[(row, 0)],
                self.matrix[(row, 1)],
                self.matrix[(row, 2)],
                self.matrix[(row, 3)]
            )?;
        }
        Ok(())
    }
}
