use crate::enums::Datatype;
use crate::error::{DecodeError, Result};

use ndarray::Array4;

/// Read-only access to decoded voxel intensities.
///
/// Values are expected to be already scaled by the header's rescale
/// coefficients, as a NIfTI reader would report them.
pub trait Volume {
    fn size_x(&self) -> usize;
    fn size_y(&self) -> usize;
    fn size_z(&self) -> usize;
    fn channel_count(&self) -> usize;

    /// Fetch a single voxel.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder fails to read the voxel.
    fn get(&self, x: usize, y: usize, z: usize, channel: usize) -> Result<f64>;

    /// Total number of voxels across all channels.
    fn voxel_count(&self) -> usize {
        self.size_x() * self.size_y() * self.size_z() * self.channel_count()
    }
}

impl<V: Volume + ?Sized> Volume for &V {
    fn size_x(&self) -> usize {
        (**self).size_x()
    }

    fn size_y(&self) -> usize {
        (**self).size_y()
    }

    fn size_z(&self) -> usize {
        (**self).size_z()
    }

    fn channel_count(&self) -> usize {
        (**self).channel_count()
    }

    fn get(&self, x: usize, y: usize, z: usize, channel: usize) -> Result<f64> {
        (**self).get(x, y, z, channel)
    }
}

/// Numeric metadata accompanying a volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Dimension sizes, `dim[0]` being the rank
    pub dim: [u16; 8],
    /// Grid spacings, `pixdim[1..4]` being x, y and z
    pub pixdim: [f32; 8],
    pub datatype: Datatype,
    pub bitpix: i16,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub description: String,
}

impl Header {
    /// Header of a plain 3-D volume with unit spacing and no rescaling.
    pub fn new(datatype: Datatype, (size_x, size_y, size_z): (u16, u16, u16)) -> Self {
        Self {
            dim: [3, size_x, size_y, size_z, 1, 1, 1, 1],
            pixdim: [1.0; 8],
            datatype,
            bitpix: (datatype.byte_width() * 8) as i16,
            scl_slope: 1.0,
            scl_inter: 0.0,
            description: String::new(),
        }
    }

    pub fn with_rescale(mut self, slope: f32, intercept: f32) -> Self {
        self.scl_slope = slope;
        self.scl_inter = intercept;
        self
    }

    pub fn with_spacing(mut self, (x, y, z): (f32, f32, f32)) -> Self {
        self.pixdim[1] = x;
        self.pixdim[2] = y;
        self.pixdim[3] = z;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A volume held in memory, indexed as (channel, z, y, x).
#[derive(Debug, Clone, Default)]
pub struct ArrayVolume {
    pub data: Array4<f64>,
}

impl ArrayVolume {
    pub fn new(data: Array4<f64>) -> Self {
        Self { data }
    }
}

impl Volume for ArrayVolume {
    fn size_x(&self) -> usize {
        self.data.dim().3
    }

    fn size_y(&self) -> usize {
        self.data.dim().2
    }

    fn size_z(&self) -> usize {
        self.data.dim().1
    }

    fn channel_count(&self) -> usize {
        self.data.dim().0
    }

    fn get(&self, x: usize, y: usize, z: usize, channel: usize) -> Result<f64> {
        self.data
            .get([channel, z, y, x])
            .copied()
            .ok_or_else(|| DecodeError::OutOfBounds { x, y, z, channel }.into())
    }
}
