use crate::enums::Datatype;
use crate::error::{DecodeError, Result};
use crate::volume::{Header, Volume};

use flate2::bufread::GzDecoder;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject, NiftiVolume, RandomAccessNiftiVolume};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A decoded NIfTI-1 object: header plus voxel accessor.
pub struct LoadedNifti {
    pub header: Header,
    pub volume: NiftiVolumeView,
}

/// [`Volume`] over the data block of an in-memory NIfTI object.
pub struct NiftiVolumeView {
    object: InMemNiftiObject,
    sizes: [usize; 4],
    rank: usize,
}

impl NiftiVolumeView {
    fn new(object: InMemNiftiObject) -> Self {
        let dim = object.volume().dim();
        let rank = dim.len();
        let mut sizes = [1; 4];
        for (size, &d) in sizes.iter_mut().zip(dim) {
            *size = d as usize;
        }
        Self {
            object,
            sizes,
            rank,
        }
    }
}

impl Volume for NiftiVolumeView {
    fn size_x(&self) -> usize {
        self.sizes[0]
    }

    fn size_y(&self) -> usize {
        self.sizes[1]
    }

    fn size_z(&self) -> usize {
        self.sizes[2]
    }

    fn channel_count(&self) -> usize {
        self.sizes[3]
    }

    fn get(&self, x: usize, y: usize, z: usize, channel: usize) -> Result<f64> {
        // axes past the fourth are pinned to their first index
        let mut coords = [0_u16; 7];
        coords[0] = x as u16;
        coords[1] = y as u16;
        coords[2] = z as u16;
        coords[3] = channel as u16;
        let value = self
            .object
            .volume()
            .get_f64(&coords[..self.rank])
            .map_err(DecodeError::from)?;
        Ok(value)
    }
}

pub struct NiftiLoader;

impl NiftiLoader {
    /// Load a NIfTI-1 object from a byte stream
    ///
    /// Both `.nii` and gzip-compressed `.nii.gz` content is accepted, the
    /// latter being recognized by its magic number.
    ///
    /// # Errors
    ///
    /// Returns error if the stream is not a single-file NIfTI-1 object
    /// or its data type is not a scalar intensity type.
    pub fn load_from_reader(source: impl Read) -> Result<LoadedNifti> {
        let mut reader = BufReader::new(source);
        let gz = reader
            .fill_buf()
            .map_err(DecodeError::from)?
            .starts_with(&GZIP_MAGIC);

        let object = if gz {
            InMemNiftiObject::from_reader(GzDecoder::new(reader))
        } else {
            InMemNiftiObject::from_reader(reader)
        }
        .map_err(DecodeError::from)?;

        let header = Self::map_header(object.header())?;
        let volume = NiftiVolumeView::new(object);
        debug!(
            datatype = %header.datatype,
            x = volume.size_x(),
            y = volume.size_y(),
            z = volume.size_z(),
            channels = volume.channel_count(),
            "Loaded NIfTI volume"
        );
        Ok(LoadedNifti { header, volume })
    }

    /// Load a NIfTI-1 object from a file path
    pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<LoadedNifti> {
        let file = File::open(path.as_ref()).map_err(DecodeError::from)?;
        Self::load_from_reader(file)
    }

    fn map_header(header: &NiftiHeader) -> Result<Header> {
        let datatype = Datatype::from_code(header.datatype)
            .ok_or(DecodeError::UnknownDatatype(header.datatype))?;

        // a zero slope disables scaling altogether
        let (scl_slope, scl_inter) = if header.scl_slope == 0.0 {
            (1.0, 0.0)
        } else {
            (header.scl_slope, header.scl_inter)
        };

        let description = header
            .descrip
            .split(|&b| b == 0)
            .next()
            .map(|text| String::from_utf8_lossy(text).trim_end().to_string())
            .unwrap_or_default();

        Ok(Header {
            dim: header.dim,
            pixdim: header.pixdim,
            datatype,
            bitpix: header.bitpix,
            scl_slope,
            scl_inter,
            description,
        })
    }
}
