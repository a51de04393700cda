use crate::enums::Datatype;
use thiserror::Error;

/// Failure to turn an input stream into a volume.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed NIfTI-1 input: {0}")]
    Nifti(#[from] nifti::error::NiftiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown NIfTI data type code {0}")]
    UnknownDatatype(i16),

    #[error("Voxel ({x}, {y}, {z}, {channel}) is outside the volume")]
    OutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        channel: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Could not decode volume: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unsupported NIfTI data type {0}")]
    UnsupportedDatatype(Datatype),

    #[error("Invalid window (center {center}, width {width})")]
    InvalidWindow { center: f64, width: f64 },

    #[error("Invalid UID root `{0}`")]
    InvalidUidRoot(String),
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
