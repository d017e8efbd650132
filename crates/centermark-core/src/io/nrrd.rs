//! NRRD label-map reading.
//!
//! Attached-header NRRD only (magic line, `field: value` lines, blank line,
//! data), raw or gzip encodings: the form label maps are exchanged in.
//! Orientation fields are folded into the volume's index-to-world affine,
//! converting left-posterior-superior headers to RAS.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nalgebra::{Matrix4, Vector3};
use ndarray::Array3;
use tracing::warn;

use crate::error::{CentermarkError, Result};
use crate::transform::IjkToWorld;
use crate::volume::LabelVolume;

const NRRD_MAGIC: &[u8; 4] = b"NRRD";

/// Voxel sample type declared by the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    UChar,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => Ok(Self::UChar),
            "char" | "signed char" | "int8" | "int8_t" => Ok(Self::Char),
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                Ok(Self::Short)
            }
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                Ok(Self::UShort)
            }
            "int" | "signed int" | "int32" | "int32_t" => Ok(Self::Int),
            "uint" | "unsigned int" | "uint32" | "uint32_t" => Ok(Self::UInt),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            other => Err(CentermarkError::UnsupportedNrrd(format!("type {other}"))),
        }
    }

    /// Bytes per sample.
    pub fn bytes(&self) -> usize {
        match self {
            Self::UChar | Self::Char => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UChar => "uchar",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Double => "double",
        };
        write!(f, "{}", name)
    }
}

/// Data encoding declared by the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Gzip,
}

impl Encoding {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "raw" => Ok(Self::Raw),
            "gzip" | "gz" => Ok(Self::Gzip),
            other => Err(CentermarkError::UnsupportedNrrd(format!("encoding {other}"))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Gzip => write!(f, "gzip"),
        }
    }
}

/// Anatomical coordinate space declared by the header.
#[derive(Clone, Debug, PartialEq)]
pub enum Space {
    Ras,
    Lps,
    Las,
    Other(String),
}

impl Space {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "right-anterior-superior" | "ras" => Self::Ras,
            "left-posterior-superior" | "lps" => Self::Lps,
            "left-anterior-superior" | "las" => Self::Las,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ras => write!(f, "right-anterior-superior"),
            Self::Lps => write!(f, "left-posterior-superior"),
            Self::Las => write!(f, "left-anterior-superior"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Parsed NRRD header fields relevant to a 3-D scalar volume.
#[derive(Clone, Debug)]
pub struct NrrdHeader {
    /// Per-axis sample counts, x first (x is fastest in the raster).
    pub sizes: [usize; 3],
    pub scalar_type: ScalarType,
    pub encoding: Encoding,
    pub little_endian: bool,
    pub space: Space,
    pub space_directions: Option<[Vector3<f64>; 3]>,
    pub space_origin: Option<Vector3<f64>>,
    pub spacings: Option<Vector3<f64>>,
    pub content: Option<String>,
    /// Byte offset of the first data byte in the file.
    data_offset: usize,
}

impl NrrdHeader {
    pub fn num_voxels(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Decoded data size in bytes.
    pub fn data_byte_size(&self) -> usize {
        self.num_voxels() * self.scalar_type.bytes()
    }

    /// Index-to-world affine from the orientation fields.
    ///
    /// `space directions` become the matrix columns and `space origin` the
    /// translation; per-axis `spacings` are the fallback when directions are
    /// absent. LPS and LAS header spaces are converted to RAS by negating
    /// the affected matrix rows.
    pub fn ijk_to_world(&self) -> IjkToWorld {
        let mut matrix = Matrix4::identity();
        if let Some(directions) = self.space_directions {
            for (col, d) in directions.iter().enumerate() {
                matrix.fixed_view_mut::<3, 1>(0, col).copy_from(d);
            }
        } else if let Some(spacings) = self.spacings {
            matrix[(0, 0)] = spacings.x;
            matrix[(1, 1)] = spacings.y;
            matrix[(2, 2)] = spacings.z;
        }
        if let Some(origin) = self.space_origin {
            matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin);
        }
        match self.space {
            Space::Ras => {}
            Space::Lps => {
                for col in 0..4 {
                    matrix[(0, col)] = -matrix[(0, col)];
                    matrix[(1, col)] = -matrix[(1, col)];
                }
            }
            Space::Las => {
                for col in 0..4 {
                    matrix[(0, col)] = -matrix[(0, col)];
                }
            }
            Space::Other(ref space) => {
                warn!(space = %space, "Unrecognized NRRD space; treating coordinates as RAS");
            }
        }
        IjkToWorld::from(matrix)
    }
}

/// Read a label-map volume from an attached-header NRRD file.
///
/// The volume is named after the header's `content` field, falling back to
/// the file stem.
pub fn read_nrrd(path: &Path) -> Result<LabelVolume> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };

    let header = parse_header(&mmap)?;
    let data = decode_data(&mmap[header.data_offset..], &header)?;
    let name = header.content.clone().unwrap_or_else(|| default_name(path));

    Ok(LabelVolume::new(name, data, header.ijk_to_world()))
}

/// Parse only the header of an NRRD file.
pub fn read_header(path: &Path) -> Result<NrrdHeader> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    parse_header(&mmap)
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "volume".to_string())
}

fn parse_header(bytes: &[u8]) -> Result<NrrdHeader> {
    let mut pos = 0usize;
    let mut first = true;
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut data_offset = None;

    while pos < bytes.len() {
        let (line_end, next) = match bytes[pos..].iter().position(|&b| b == b'\n') {
            Some(i) => (pos + i, pos + i + 1),
            None => (bytes.len(), bytes.len()),
        };
        let mut line = &bytes[pos..line_end];
        if line.ends_with(b"\r") {
            line = &line[..line.len() - 1];
        }

        if first {
            if !line.starts_with(NRRD_MAGIC) {
                return Err(CentermarkError::InvalidNrrd("missing NRRD magic".into()));
            }
            first = false;
            pos = next;
            continue;
        }

        if line.is_empty() {
            data_offset = Some(next);
            break;
        }

        if line.first() == Some(&b'#') {
            pos = next;
            continue;
        }

        let text = std::str::from_utf8(line)
            .map_err(|_| CentermarkError::InvalidNrrd("non-UTF-8 header line".into()))?;

        match text.split_once(':') {
            // key:=value pairs carry free-form metadata; not interpreted.
            Some((_, value)) if value.starts_with('=') => {}
            Some((name, value)) => {
                fields.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
            }
            None => {
                return Err(CentermarkError::InvalidNrrd(format!(
                    "malformed header line: {text}"
                )));
            }
        }

        pos = next;
    }

    let data_offset = data_offset.ok_or_else(|| {
        CentermarkError::InvalidNrrd("header not terminated by a blank line".into())
    })?;

    build_header(&fields, data_offset)
}

fn build_header(fields: &[(String, String)], data_offset: usize) -> Result<NrrdHeader> {
    let mut dimension = None;
    let mut sizes_list = None;
    let mut scalar_type = None;
    let mut encoding = None;
    let mut little_endian = true;
    let mut space = Space::Ras;
    let mut space_directions = None;
    let mut space_origin = None;
    let mut spacings = None;
    let mut content = None;

    for (name, value) in fields {
        match name.as_str() {
            "dimension" => {
                dimension = Some(value.parse::<usize>().map_err(|_| {
                    CentermarkError::InvalidNrrd(format!("bad dimension: {value}"))
                })?);
            }
            "sizes" => sizes_list = Some(parse_sizes(value)?),
            "type" => scalar_type = Some(ScalarType::parse(value)?),
            "encoding" => encoding = Some(Encoding::parse(value)?),
            "endian" => little_endian = parse_endian(value)?,
            "space" => space = Space::parse(value),
            "space dimension" => {
                if value != "3" {
                    return Err(CentermarkError::UnsupportedNrrd(format!(
                        "space dimension {value}"
                    )));
                }
            }
            "space directions" => space_directions = Some(parse_directions(value)?),
            "space origin" => space_origin = Some(parse_vector(value)?),
            "spacings" => spacings = Some(parse_spacings(value)?),
            "content" => content = Some(value.clone()),
            "data file" | "datafile" => {
                return Err(CentermarkError::UnsupportedNrrd(
                    "detached data file".into(),
                ));
            }
            _ => {}
        }
    }

    let dimension = dimension
        .ok_or_else(|| CentermarkError::InvalidNrrd("missing dimension field".into()))?;
    if dimension != 3 {
        return Err(CentermarkError::UnsupportedNrrd(format!(
            "dimension {dimension} (only 3-D volumes are supported)"
        )));
    }

    let sizes_list =
        sizes_list.ok_or_else(|| CentermarkError::InvalidNrrd("missing sizes field".into()))?;
    if sizes_list.len() != 3 {
        return Err(CentermarkError::InvalidNrrd(format!(
            "sizes lists {} values for a 3-D volume",
            sizes_list.len()
        )));
    }
    let sizes = [sizes_list[0], sizes_list[1], sizes_list[2]];
    let [nx, ny, nz] = sizes;
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(CentermarkError::InvalidDimensions { nx, ny, nz });
    }

    let scalar_type =
        scalar_type.ok_or_else(|| CentermarkError::InvalidNrrd("missing type field".into()))?;
    let encoding =
        encoding.ok_or_else(|| CentermarkError::InvalidNrrd("missing encoding field".into()))?;

    // Reject sizes whose byte count cannot be addressed before allocating.
    sizes
        .iter()
        .try_fold(scalar_type.bytes(), |acc, &n| acc.checked_mul(n))
        .ok_or(CentermarkError::InvalidDimensions { nx, ny, nz })?;

    Ok(NrrdHeader {
        sizes,
        scalar_type,
        encoding,
        little_endian,
        space,
        space_directions,
        space_origin,
        spacings,
        content,
        data_offset,
    })
}

fn parse_sizes(value: &str) -> Result<Vec<usize>> {
    value
        .split_whitespace()
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| CentermarkError::InvalidNrrd(format!("bad size: {t}")))
        })
        .collect()
}

fn parse_endian(value: &str) -> Result<bool> {
    match value {
        "little" => Ok(true),
        "big" => Ok(false),
        other => Err(CentermarkError::InvalidNrrd(format!("bad endian: {other}"))),
    }
}

fn parse_vector(value: &str) -> Result<Vector3<f64>> {
    let inner = value
        .trim()
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| CentermarkError::InvalidNrrd(format!("bad vector: {value}")))?;
    let parts = inner
        .split(',')
        .map(|t| {
            t.trim()
                .parse::<f64>()
                .map_err(|_| CentermarkError::InvalidNrrd(format!("bad vector component: {t}")))
        })
        .collect::<Result<Vec<f64>>>()?;
    if parts.len() != 3 {
        return Err(CentermarkError::InvalidNrrd(format!("bad vector: {value}")));
    }
    Ok(Vector3::new(parts[0], parts[1], parts[2]))
}

fn parse_directions(value: &str) -> Result<[Vector3<f64>; 3]> {
    if value.split_whitespace().any(|t| t == "none") {
        return Err(CentermarkError::UnsupportedNrrd(
            "non-spatial axis in space directions".into(),
        ));
    }
    let mut vectors = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find('(') {
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| CentermarkError::InvalidNrrd(format!("bad space directions: {value}")))?;
        vectors.push(parse_vector(&rest[open..=close])?);
        rest = &rest[close + 1..];
    }
    if vectors.len() != 3 {
        return Err(CentermarkError::InvalidNrrd(format!(
            "bad space directions: {value}"
        )));
    }
    Ok([vectors[0], vectors[1], vectors[2]])
}

fn parse_spacings(value: &str) -> Result<Vector3<f64>> {
    let parts = value
        .split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| CentermarkError::InvalidNrrd(format!("bad spacing: {t}")))
        })
        .collect::<Result<Vec<f64>>>()?;
    if parts.len() != 3 {
        return Err(CentermarkError::InvalidNrrd(format!(
            "bad spacings: {value}"
        )));
    }
    Ok(Vector3::new(parts[0], parts[1], parts[2]))
}

fn decode_data(raw: &[u8], header: &NrrdHeader) -> Result<Array3<f32>> {
    let expected = header.data_byte_size();

    let values = match header.encoding {
        Encoding::Raw => {
            if raw.len() < expected {
                return Err(CentermarkError::InvalidNrrd(format!(
                    "truncated data: expected {} bytes, got {}",
                    expected,
                    raw.len()
                )));
            }
            convert(&raw[..expected], header)
        }
        Encoding::Gzip => {
            let mut buf = Vec::with_capacity(expected);
            GzDecoder::new(raw)
                .read_to_end(&mut buf)
                .map_err(|e| CentermarkError::InvalidNrrd(format!("gzip data: {e}")))?;
            if buf.len() < expected {
                return Err(CentermarkError::InvalidNrrd(format!(
                    "truncated data: expected {} bytes, got {}",
                    expected,
                    buf.len()
                )));
            }
            convert(&buf[..expected], header)
        }
    };

    let [nx, ny, nz] = header.sizes;
    // NRRD raster order is x fastest; shape (z, y, x) keeps that contiguous.
    Array3::from_shape_vec((nz, ny, nx), values)
        .map_err(|e| CentermarkError::InvalidNrrd(e.to_string()))
}

fn convert(bytes: &[u8], header: &NrrdHeader) -> Vec<f32> {
    if header.little_endian {
        convert_samples::<LittleEndian>(bytes, header.scalar_type)
    } else {
        convert_samples::<BigEndian>(bytes, header.scalar_type)
    }
}

fn convert_samples<E: ByteOrder>(bytes: &[u8], scalar_type: ScalarType) -> Vec<f32> {
    match scalar_type {
        ScalarType::UChar => bytes.iter().map(|&b| b as f32).collect(),
        ScalarType::Char => bytes.iter().map(|&b| b as i8 as f32).collect(),
        ScalarType::Short => {
            let mut samples = vec![0i16; bytes.len() / 2];
            E::read_i16_into(bytes, &mut samples);
            samples.into_iter().map(|s| s as f32).collect()
        }
        ScalarType::UShort => {
            let mut samples = vec![0u16; bytes.len() / 2];
            E::read_u16_into(bytes, &mut samples);
            samples.into_iter().map(|s| s as f32).collect()
        }
        ScalarType::Int => {
            let mut samples = vec![0i32; bytes.len() / 4];
            E::read_i32_into(bytes, &mut samples);
            samples.into_iter().map(|s| s as f32).collect()
        }
        ScalarType::UInt => {
            let mut samples = vec![0u32; bytes.len() / 4];
            E::read_u32_into(bytes, &mut samples);
            samples.into_iter().map(|s| s as f32).collect()
        }
        ScalarType::Float => {
            let mut samples = vec![0f32; bytes.len() / 4];
            E::read_f32_into(bytes, &mut samples);
            samples
        }
        ScalarType::Double => {
            let mut samples = vec![0f64; bytes.len() / 8];
            E::read_f64_into(bytes, &mut samples);
            samples.into_iter().map(|s| s as f32).collect()
        }
    }
}
