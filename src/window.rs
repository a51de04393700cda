use crate::error::{ConvertError, Result};
use crate::injector::{Injector, put_ds};
use crate::volume::Volume;

use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

/// Display window shared by every slice of a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    center: f64,
    width: f64,
}

impl Window {
    /// # Errors
    ///
    /// Fails with [`ConvertError::InvalidWindow`] unless `width > 1`.
    pub fn new(center: f64, width: f64) -> Result<Self> {
        if width.is_nan() || width <= 1.0 {
            return Err(ConvertError::InvalidWindow { center, width });
        }
        Ok(Self { center, width })
    }

    /// Window covering the full intensity range of the volume.
    ///
    /// Every voxel of every channel is visited once. NaN voxels are skipped.
    pub fn from_volume<V: Volume + ?Sized>(volume: &V) -> Result<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for channel in 0..volume.channel_count() {
            for z in 0..volume.size_z() {
                for y in 0..volume.size_y() {
                    for x in 0..volume.size_x() {
                        let v = volume.get(x, y, z, channel)?;
                        if v < min {
                            min = v;
                        }
                        if v > max {
                            max = v;
                        }
                    }
                }
            }
        }

        Self::new((max + min) / 2.0, max - min)
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

impl Injector for Window {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_ds(obj, tags::WINDOW_CENTER, &[self.center]);
        put_ds(obj, tags::WINDOW_WIDTH, &[self.width]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::ArrayVolume;
    use ndarray::Array4;

    #[test]
    fn window_spans_all_channels() {
        let mut data = Array4::<f64>::zeros((2, 2, 3, 3));
        data[[0, 1, 2, 0]] = -100.0;
        data[[1, 0, 0, 2]] = 300.0;
        let window = Window::from_volume(&ArrayVolume::new(data)).unwrap();
        assert_eq!(window.center(), 100.0);
        assert_eq!(window.width(), 400.0);
    }

    #[test]
    fn all_negative_volume() {
        let data = Array4::from_shape_fn((1, 1, 2, 2), |(_, _, y, x)| -10.0 - (y * 2 + x) as f64);
        let window = Window::from_volume(&ArrayVolume::new(data)).unwrap();
        assert_eq!(window.center(), -11.5);
        assert_eq!(window.width(), 3.0);
    }

    #[test]
    fn degenerate_windows_are_rejected() {
        let constant = ArrayVolume::new(Array4::from_elem((1, 4, 4, 4), 7.0));
        assert!(matches!(
            Window::from_volume(&constant),
            Err(ConvertError::InvalidWindow { width, .. }) if width == 0.0
        ));

        let empty = ArrayVolume::new(Array4::zeros((1, 0, 4, 4)));
        assert!(Window::from_volume(&empty).is_err());

        assert!(Window::new(0.0, 1.0).is_err());
        assert!(Window::new(0.0, f64::NAN).is_err());
        assert!(Window::new(0.0, 1.0001).is_ok());
    }

    #[test]
    fn window_injects_center_and_width() {
        let mut obj = InMemDicomObject::new_empty();
        Window::new(40.0, 400.0).unwrap().inject(&mut obj);
        assert_eq!(obj.element(tags::WINDOW_CENTER).unwrap().to_float64().unwrap(), 40.0);
        assert_eq!(obj.element(tags::WINDOW_WIDTH).unwrap().to_float64().unwrap(), 400.0);
    }
}
