use std::fmt;

use ndarray::Array3;

use crate::transform::IjkToWorld;

/// Inclusive voxel-index bounds of a volume along each axis.
///
/// Bounds may be negative and need not start at zero, matching the extent
/// convention of scene-graph image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub z_min: i32,
    pub z_max: i32,
}

impl Extent {
    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32, z_min: i32, z_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            z_min,
            z_max,
        }
    }

    /// Extent starting at the origin with the given per-axis sizes.
    pub fn from_sizes(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            x_min: 0,
            x_max: nx as i32 - 1,
            y_min: 0,
            y_max: ny as i32 - 1,
            z_min: 0,
            z_max: nz as i32 - 1,
        }
    }

    pub fn nx(&self) -> usize {
        (self.x_max - self.x_min + 1).max(0) as usize
    }

    pub fn ny(&self) -> usize {
        (self.y_max - self.y_min + 1).max(0) as usize
    }

    pub fn nz(&self) -> usize {
        (self.z_max - self.z_min + 1).max(0) as usize
    }

    pub fn num_voxels(&self) -> usize {
        self.nx() * self.ny() * self.nz()
    }

    /// Number of voxels visited by a scan with the given per-axis stride.
    pub fn sampled_voxels(&self, stride: usize) -> usize {
        let stride = stride.max(1);
        let count = |n: usize| if n == 0 { 0 } else { (n - 1) / stride + 1 };
        count(self.nx()) * count(self.ny()) * count(self.nz())
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.x_min
            && x <= self.x_max
            && y >= self.y_min
            && y <= self.y_max
            && z >= self.z_min
            && z <= self.z_max
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x {}..={}, y {}..={}, z {}..={}",
            self.x_min, self.x_max, self.y_min, self.y_max, self.z_min, self.z_max
        )
    }
}

/// Host-owned label-map volume handle: name, extent, scalar sampling, and
/// the index-to-world affine.
///
/// `Sync` so the voxel scan may sample from worker threads.
pub trait VolumeHandle: Sync {
    fn name(&self) -> &str;

    fn extent(&self) -> Extent;

    /// Scalar value at an index-space coordinate. Coordinates outside the
    /// extent sample as 0.0 (background).
    fn value(&self, x: i32, y: i32, z: i32) -> f32;

    fn ijk_to_world(&self) -> IjkToWorld;
}

/// An in-memory label-map volume.
///
/// Values are kept exactly as read; label values are categorical, so no
/// intensity normalization is applied.
#[derive(Clone, Debug)]
pub struct LabelVolume {
    /// Voxel data, x fastest, shape = (nz, ny, nx).
    pub data: Array3<f32>,
    pub extent: Extent,
    pub ijk_to_world: IjkToWorld,
    pub name: String,
}

impl LabelVolume {
    /// Build a volume whose extent starts at the origin.
    pub fn new(name: impl Into<String>, data: Array3<f32>, ijk_to_world: IjkToWorld) -> Self {
        let (nz, ny, nx) = data.dim();
        Self {
            data,
            extent: Extent::from_sizes(nx, ny, nz),
            ijk_to_world,
            name: name.into(),
        }
    }

    /// Build a volume with explicit bounds. The extent sizes must match the
    /// data shape.
    pub fn with_extent(
        name: impl Into<String>,
        data: Array3<f32>,
        extent: Extent,
        ijk_to_world: IjkToWorld,
    ) -> Self {
        assert_eq!(
            (extent.nz(), extent.ny(), extent.nx()),
            data.dim(),
            "extent sizes must match data shape"
        );
        Self {
            data,
            extent,
            ijk_to_world,
            name: name.into(),
        }
    }

    pub fn nx(&self) -> usize {
        self.data.dim().2
    }

    pub fn ny(&self) -> usize {
        self.data.dim().1
    }

    pub fn nz(&self) -> usize {
        self.data.dim().0
    }
}

impl VolumeHandle for LabelVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn value(&self, x: i32, y: i32, z: i32) -> f32 {
        if !self.extent.contains(x, y, z) {
            return 0.0;
        }
        let i = (z - self.extent.z_min) as usize;
        let j = (y - self.extent.y_min) as usize;
        let k = (x - self.extent.x_min) as usize;
        self.data[[i, j, k]]
    }

    fn ijk_to_world(&self) -> IjkToWorld {
        self.ijk_to_world
    }
}
