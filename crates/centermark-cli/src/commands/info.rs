use std::path::PathBuf;

use anyhow::Result;
use centermark_core::io::nrrd::read_header;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Input NRRD file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let header = read_header(&args.file)?;
    let [nx, ny, nz] = header.sizes;

    println!("File:        {}", args.file.display());
    if let Some(ref content) = header.content {
        println!("Content:     {}", content);
    }
    println!("Dimensions:  {}x{}x{}", nx, ny, nz);
    println!("Type:        {}", header.scalar_type);
    println!("Encoding:    {}", header.encoding);
    println!("Space:       {}", header.space);

    let transform = header.ijk_to_world();
    let origin = transform.origin();
    let spacing = transform.spacing();
    println!(
        "Origin:      ({:.3}, {:.3}, {:.3})",
        origin.x, origin.y, origin.z
    );
    println!(
        "Spacing:     ({:.3}, {:.3}, {:.3})",
        spacing.x, spacing.y, spacing.z
    );

    let total_mb = header.data_byte_size() as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
