//! Repacking of voxel intensities into DICOM pixel data.
//!
//! Pixel data is capped at 16 bits per sample. Wider integer types lose
//! their lower 16 bits, and floating point types are stored as signed
//! 16-bit values with an offset of 1024, undone by a rescale intercept
//! of -1024.

use crate::enums::Datatype;
use crate::error::{ConvertError, Result};
use crate::injector::put_ds_if_absent;
use crate::volume::{Header, Volume};

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

const FLOAT_OFFSET: f64 = 1024.0;

/// Bytes per packed sample for the given datatype.
pub fn bytes_per_sample(datatype: Datatype) -> usize {
    datatype.byte_width().min(2)
}

pub struct PixelPacker;

impl PixelPacker {
    /// Pack the slice at (`z`, `channel`) into a little endian byte buffer
    /// of `size_x * size_y * bytes_per_sample` bytes, rows first.
    ///
    /// # Errors
    ///
    /// Fails on 64-bit integer volumes and on voxel read failures.
    pub fn pack_slice<V: Volume + ?Sized>(
        volume: &V,
        header: &Header,
        z: usize,
        channel: usize,
    ) -> Result<Vec<u8>> {
        let datatype = header.datatype;
        let pack: fn(f64, &mut Vec<u8>) = match datatype {
            Datatype::Int8 | Datatype::UInt8 => {
                |v: f64, out: &mut Vec<u8>| out.push(truncate_i32(v) as u8)
            }
            Datatype::Int16 | Datatype::UInt16 => |v: f64, out: &mut Vec<u8>| {
                out.extend_from_slice(&(truncate_i32(v) as i16).to_le_bytes())
            },
            Datatype::Int32 | Datatype::UInt32 => |v: f64, out: &mut Vec<u8>| {
                // drop the lower 16 bits
                out.extend_from_slice(&(((v as i64) >> 16) as u16).to_le_bytes())
            },
            Datatype::Float32 => |v: f64, out: &mut Vec<u8>| {
                let s = truncate_i32(f64::from(v as f32 + FLOAT_OFFSET as f32)) as i16;
                out.extend_from_slice(&s.to_le_bytes())
            },
            Datatype::Float64 => |v: f64, out: &mut Vec<u8>| {
                let s = truncate_i32(v + FLOAT_OFFSET) as i16;
                out.extend_from_slice(&s.to_le_bytes())
            },
            Datatype::Int64 | Datatype::UInt64 => {
                return Err(ConvertError::UnsupportedDatatype(datatype));
            }
        };

        let slope = f64::from(header.scl_slope);
        let inter = f64::from(header.scl_inter);
        let (size_x, size_y) = (volume.size_x(), volume.size_y());
        let mut pixeldata = Vec::with_capacity(size_x * size_y * bytes_per_sample(datatype));
        for y in 0..size_y {
            for x in 0..size_x {
                let v = volume.get(x, y, z, channel)?;
                pack((v - inter) / slope, &mut pixeldata);
            }
        }
        Ok(pixeldata)
    }

    /// Pack the slice and put it in the record as Pixel Data.
    ///
    /// For floating point volumes the rescale intercept and slope are
    /// defaulted to -1024 and 1, unless the record already has them.
    pub fn put_pixel_data<V: Volume + ?Sized>(
        obj: &mut InMemDicomObject,
        volume: &V,
        header: &Header,
        z: usize,
        channel: usize,
    ) -> Result<()> {
        let pixeldata = Self::pack_slice(volume, header, z, channel)?;

        if matches!(header.datatype, Datatype::Float32 | Datatype::Float64) {
            put_ds_if_absent(obj, tags::RESCALE_INTERCEPT, -FLOAT_OFFSET);
            put_ds_if_absent(obj, tags::RESCALE_SLOPE, 1.0_f64);
        }

        let vr = if bytes_per_sample(header.datatype) == 1 {
            VR::OB
        } else {
            VR::OW
        };
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            vr,
            PrimitiveValue::from(pixeldata),
        ));
        Ok(())
    }
}

/// Saturating conversion to `i32`; narrower casts of the result keep the low bits.
#[inline]
fn truncate_i32(v: f64) -> i32 {
    v as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::ArrayVolume;
    use ndarray::Array4;

    fn volume_of(values: &[f64], (x, y): (usize, usize)) -> ArrayVolume {
        let data = Array4::from_shape_vec((1, 1, y, x), values.to_vec()).unwrap();
        ArrayVolume::new(data)
    }

    #[test]
    fn buffer_length_follows_datatype() {
        let volume = ArrayVolume::new(Array4::from_elem((1, 2, 3, 5), 7.0));
        for (datatype, width) in [
            (Datatype::Int8, 1),
            (Datatype::UInt8, 1),
            (Datatype::Int16, 2),
            (Datatype::UInt16, 2),
            (Datatype::Int32, 2),
            (Datatype::UInt32, 2),
            (Datatype::Float32, 2),
            (Datatype::Float64, 2),
        ] {
            let header = Header::new(datatype, (5, 3, 2));
            let buffer = PixelPacker::pack_slice(&volume, &header, 1, 0).unwrap();
            assert_eq!(buffer.len(), 5 * 3 * width, "{datatype}");
        }
    }

    #[test]
    fn int16_round_trip() {
        let values = [-32768.0, -1.0, 0.0, 1.0, 1234.0, 32767.0];
        let volume = volume_of(&values, (3, 2));
        let header = Header::new(Datatype::Int16, (3, 2, 1));
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        let decoded: Vec<f64> = buffer
            .chunks_exact(2)
            .map(|b| f64::from(i16::from_le_bytes([b[0], b[1]])))
            .collect();
        assert_eq!(decoded, values);
    }

    #[test]
    fn rows_are_outer_loop() {
        // x runs fastest within a row
        let volume = ArrayVolume::new(Array4::from_shape_fn((1, 1, 2, 3), |(_, _, y, x)| {
            (y * 10 + x) as f64
        }));
        let header = Header::new(Datatype::UInt8, (3, 2, 1));
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        assert_eq!(buffer, vec![0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn rescale_is_undone_before_packing() {
        let volume = volume_of(&[10.0, 30.0], (2, 1));
        let header = Header::new(Datatype::UInt8, (2, 1, 1)).with_rescale(2.0, 10.0);
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        assert_eq!(buffer, vec![0, 10]);
    }

    #[test]
    fn narrowing_casts_truncate() {
        let volume = volume_of(&[300.0, -1.0, 255.9], (3, 1));
        let header = Header::new(Datatype::UInt8, (3, 1, 1));
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        assert_eq!(buffer, vec![44, 255, 255]);

        let volume = volume_of(&[40000.0], (1, 1));
        let header = Header::new(Datatype::UInt16, (1, 1, 1));
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        assert_eq!(buffer, 40000_u16.to_le_bytes());
    }

    #[test]
    fn int32_keeps_upper_half() {
        let volume = volume_of(&[65536.0 * 3.0 + 5.0, -1.0, 65535.0], (3, 1));
        let header = Header::new(Datatype::Int32, (3, 1, 1));
        let buffer = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap();
        assert_eq!(buffer, vec![3, 0, 0xff, 0xff, 0, 0]);
    }

    #[test]
    fn float_offset_and_rescale_defaults() {
        let volume = volume_of(&[-1024.0, 0.5, 100.0], (3, 1));
        let header = Header::new(Datatype::Float32, (3, 1, 1));
        let mut obj = InMemDicomObject::new_empty();
        PixelPacker::put_pixel_data(&mut obj, &volume, &header, 0, 0).unwrap();

        let element = obj.element(tags::PIXEL_DATA).unwrap();
        assert_eq!(element.vr(), VR::OW);
        let bytes = element.to_bytes().unwrap();
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![0, 1024, 1124]);
        assert_eq!(obj.element(tags::RESCALE_INTERCEPT).unwrap().to_float64().unwrap(), -1024.0);
        assert_eq!(obj.element(tags::RESCALE_SLOPE).unwrap().to_float64().unwrap(), 1.0);
    }

    #[test]
    fn float_rescale_is_not_overwritten() {
        let volume = volume_of(&[1.0, 2.0], (2, 1));
        let header = Header::new(Datatype::Float64, (2, 1, 1));
        let mut obj = InMemDicomObject::new_empty();
        crate::injector::put_ds(&mut obj, tags::RESCALE_INTERCEPT, &[-2048.0]);
        PixelPacker::put_pixel_data(&mut obj, &volume, &header, 0, 0).unwrap();
        assert_eq!(obj.element(tags::RESCALE_INTERCEPT).unwrap().to_float64().unwrap(), -2048.0);
        assert_eq!(obj.element(tags::RESCALE_SLOPE).unwrap().to_float64().unwrap(), 1.0);
    }

    #[test]
    fn byte_samples_use_ob() {
        let volume = volume_of(&[1.0, 2.0], (2, 1));
        let header = Header::new(Datatype::Int8, (2, 1, 1));
        let mut obj = InMemDicomObject::new_empty();
        PixelPacker::put_pixel_data(&mut obj, &volume, &header, 0, 0).unwrap();
        assert_eq!(obj.element(tags::PIXEL_DATA).unwrap().vr(), VR::OB);
        assert!(obj.element(tags::RESCALE_INTERCEPT).is_err());
    }

    #[test]
    fn wide_integers_are_rejected() {
        let volume = volume_of(&[1.0], (1, 1));
        for datatype in [Datatype::Int64, Datatype::UInt64] {
            let header = Header::new(datatype, (1, 1, 1));
            let err = PixelPacker::pack_slice(&volume, &header, 0, 0).unwrap_err();
            assert!(matches!(err, ConvertError::UnsupportedDatatype(d) if d == datatype));
            assert!(err.to_string().contains(&datatype.to_string()));
        }
    }
}
