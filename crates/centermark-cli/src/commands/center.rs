use std::path::PathBuf;

use anyhow::Result;
use centermark_core::centroid::CentroidConfig;
use centermark_core::io::nrrd::read_nrrd;
use centermark_core::locate::volume_center;
use clap::Args;

#[derive(Args)]
pub struct CenterArgs {
    /// Input NRRD label map
    pub file: PathBuf,

    /// Per-axis sampling stride in voxels
    #[arg(long, default_value = "2")]
    pub stride: usize,
}

pub fn run(args: &CenterArgs) -> Result<()> {
    let volume = read_nrrd(&args.file)?;
    let config = CentroidConfig {
        stride: args.stride,
    };

    let center = volume_center(&volume, &config);
    crate::summary::print_volume_center(&center);

    Ok(())
}
