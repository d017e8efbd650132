//! The locate pipeline: two label maps in, one labeled midpoint fiducial out.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::centroid::{compute_centroid, Centroid, CentroidConfig};
use crate::error::Result;
use crate::marker::{Fiducial, MarkerSink, MarkerStyle, NullMarkerSink};
use crate::volume::VolumeHandle;

/// Pipeline parameters. TOML-loadable; every section has defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocateConfig {
    #[serde(default)]
    pub sampling: CentroidConfig,
    #[serde(default)]
    pub style: MarkerStyle,
}

/// Center of mass of one input volume, in both coordinate systems.
#[derive(Clone, Debug)]
pub struct VolumeCenter {
    pub name: String,
    pub centroid: Centroid,
    pub world: Point3<f64>,
}

/// Result of a locate run.
#[derive(Clone, Debug)]
pub struct LocateReport {
    pub first: VolumeCenter,
    pub second: VolumeCenter,
    /// Per-axis mean of the two world-space centers.
    pub midpoint: Point3<f64>,
    /// Label attached to the placed fiducial.
    pub label: String,
}

/// Per-axis arithmetic mean of two world-space points.
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) / 2.0)
}

/// Fiducial label for a pair of volumes.
pub fn combined_label(first: &str, second: &str) -> String {
    format!("COM: {}, {}", first, second)
}

/// Estimate one volume's center of mass and map it into world space through
/// the volume's own affine.
pub fn volume_center<V: VolumeHandle + ?Sized>(
    volume: &V,
    config: &CentroidConfig,
) -> VolumeCenter {
    let centroid = compute_centroid(volume, config);
    if centroid.is_fallback() {
        warn!(
            volume = volume.name(),
            "No positive voxels sampled; centroid falls back to the origin"
        );
    }
    let world = volume.ijk_to_world().map_point(&centroid.ijk);
    info!(
        volume = volume.name(),
        structure_voxels = centroid.structure_voxels,
        x = world.x,
        y = world.y,
        z = world.z,
        "Computed center of mass"
    );
    VolumeCenter {
        name: volume.name().to_string(),
        centroid,
        world,
    }
}

/// Run the full pipeline and hand the resulting fiducial to `sink`.
///
/// Each centroid is mapped through its own volume's affine before the two
/// world-space centers are averaged.
pub fn run_locate_with_sink<A, B>(
    first: &A,
    second: &B,
    config: &LocateConfig,
    sink: &mut dyn MarkerSink,
) -> Result<LocateReport>
where
    A: VolumeHandle + ?Sized,
    B: VolumeHandle + ?Sized,
{
    let first_center = volume_center(first, &config.sampling);
    let second_center = volume_center(second, &config.sampling);

    let mid = midpoint(&first_center.world, &second_center.world);
    let label = combined_label(&first_center.name, &second_center.name);

    sink.place_fiducial(
        &Fiducial {
            position: mid,
            label: label.clone(),
        },
        &config.style,
    )?;
    info!(label = %label, x = mid.x, y = mid.y, z = mid.z, "Placed fiducial");

    Ok(LocateReport {
        first: first_center,
        second: second_center,
        midpoint: mid,
        label,
    })
}

/// Run the full pipeline without marker placement.
pub fn run_locate<A, B>(first: &A, second: &B, config: &LocateConfig) -> Result<LocateReport>
where
    A: VolumeHandle + ?Sized,
    B: VolumeHandle + ?Sized,
{
    run_locate_with_sink(first, second, config, &mut NullMarkerSink)
}
