/// Default per-axis stride for the voxel scan. Sampling every other voxel
/// along each axis visits ~1/8 of the volume.
pub const DEFAULT_SAMPLE_STRIDE: usize = 2;

/// Minimum sampled-voxel count to use slab-level Rayon parallelism.
pub const PARALLEL_VOXEL_THRESHOLD: usize = 262_144;

/// Default fiducial glyph scale (percent of view size, markups convention).
pub const DEFAULT_GLYPH_SCALE: f64 = 5.0;

/// Default fiducial label text scale.
pub const DEFAULT_TEXT_SCALE: f64 = 5.0;

/// Default fiducial color, RGB in [0, 1]: black.
pub const DEFAULT_MARKER_COLOR: [f64; 3] = [0.0, 0.0, 0.0];
