use std::path::PathBuf;

use anyhow::{Context, Result};
use centermark_core::io::markups::MarkupsFile;
use centermark_core::io::nrrd::read_nrrd;
use centermark_core::locate::{run_locate_with_sink, LocateConfig};
use centermark_core::marker::NullMarkerSink;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

#[derive(Args)]
pub struct LocateArgs {
    /// First NRRD label map
    pub first: PathBuf,

    /// Second NRRD label map
    pub second: PathBuf,

    /// Locate config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-axis sampling stride in voxels
    #[arg(long, default_value = "2")]
    pub stride: usize,

    /// Skip writing the markups file
    #[arg(long)]
    pub no_markups: bool,

    /// Output markups file path
    #[arg(short, long, default_value = "center-of-mass.mrk.json")]
    pub output: PathBuf,
}

pub fn run(args: &LocateArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid locate config")?
    } else {
        let mut config = LocateConfig::default();
        config.sampling.stride = args.stride;
        config
    };
    debug!(stride = config.sampling.stride, "Effective sampling stride");

    let stages = if args.no_markups { 3 } else { 4 };
    let pb = ProgressBar::new(stages);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    pb.set_message("Reading first volume");
    let first = read_nrrd(&args.first)?;
    pb.inc(1);

    pb.set_message("Reading second volume");
    let second = read_nrrd(&args.second)?;
    pb.inc(1);

    pb.set_message("Locating centers");
    let report = if args.no_markups {
        let report = run_locate_with_sink(&first, &second, &config, &mut NullMarkerSink)?;
        pb.inc(1);
        report
    } else {
        let mut markups = MarkupsFile::new();
        let report = run_locate_with_sink(&first, &second, &config, &mut markups)?;
        pb.inc(1);

        pb.set_message("Writing markups");
        markups.save(&args.output)?;
        pb.inc(1);
        report
    };

    pb.finish_with_message("Done");

    crate::summary::print_locate_report(&report);
    if !args.no_markups {
        println!("Markups saved to {}", args.output.display());
    }

    Ok(())
}
