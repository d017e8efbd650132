use std::io::Write;

use centermark_core::transform::IjkToWorld;
use centermark_core::volume::LabelVolume;
use ndarray::Array3;

/// Assemble an attached-header NRRD file in memory.
///
/// `fields` are written one per line after the magic; `data` follows the
/// blank line that ends the header.
pub fn build_nrrd(fields: &[&str], data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"NRRD0004\n");
    for field in fields {
        buf.extend_from_slice(field.as_bytes());
        buf.push(b'\n');
    }
    buf.push(b'\n');
    buf.extend_from_slice(data);
    buf
}

/// Build a raw little-endian uchar NRRD with the given sizes and voxel data.
///
/// Data is in raster order, x fastest.
pub fn build_uchar_nrrd(nx: usize, ny: usize, nz: usize, data: &[u8]) -> Vec<u8> {
    let sizes = format!("sizes: {} {} {}", nx, ny, nz);
    build_nrrd(
        &["type: uchar", "dimension: 3", &sizes, "encoding: raw"],
        data,
    )
}

/// Write an NRRD buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_nrrd(data: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write NRRD data");
    f.flush().expect("flush");
    f
}

/// Build a named in-memory volume by evaluating `f` at every (x, y, z) of a
/// zero-based grid. The volume carries an identity affine.
pub fn volume_from_fn<F>(name: &str, nx: usize, ny: usize, nz: usize, f: F) -> LabelVolume
where
    F: Fn(i32, i32, i32) -> f32,
{
    let data = Array3::from_shape_fn((nz, ny, nx), |(z, y, x)| {
        f(x as i32, y as i32, z as i32)
    });
    LabelVolume::new(name, data, IjkToWorld::identity())
}
