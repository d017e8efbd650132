use thiserror::Error;

#[derive(Error, Debug)]
pub enum CentermarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid NRRD file: {0}")]
    InvalidNrrd(String),

    #[error("Unsupported NRRD feature: {0}")]
    UnsupportedNrrd(String),

    #[error("Invalid volume dimensions: {nx}x{ny}x{nz}")]
    InvalidDimensions { nx: usize, ny: usize, nz: usize },

    #[error("Markups serialization error: {0}")]
    Markups(#[from] serde_json::Error),

    #[error("Marker placement failed: {0}")]
    Placement(String),
}

pub type Result<T> = std::result::Result<T, CentermarkError>;
