use crate::injector::{Injector, put_ds, put_ds_if_absent, put_is, put_str, put_us};
use crate::volume::Header;

use dicom::core::{Tag, VR};
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

/// Image Position (retired)
const IMAGE_POSITION: Tag = Tag(0x0020, 0x0030);
/// Image Orientation (retired)
const IMAGE_ORIENTATION: Tag = Tag(0x0020, 0x0035);

/// Maximum bit depth of the produced pixel data.
const MAX_BITS: i16 = 16;

/// Baseline image attributes derived from a NIfTI-1 header.
///
/// The rescale slope and intercept are only written when the record does
/// not carry them yet. No spatial registration is computed: position and
/// orientation are zero vectors.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMapper<'a> {
    header: &'a Header,
}

impl<'a> HeaderMapper<'a> {
    pub fn new(header: &'a Header) -> Self {
        Self { header }
    }

    /// Bits allocated and rescale slope after capping the bit depth at 16.
    pub fn bit_depth(&self) -> (u16, f64) {
        let header = self.header;
        let slope = f64::from(header.scl_slope);
        if header.bitpix > MAX_BITS {
            let slope = slope * f64::from(header.bitpix) / f64::from(MAX_BITS);
            (MAX_BITS as u16, slope)
        } else {
            (header.bitpix.max(1) as u16, slope)
        }
    }
}

impl Injector for HeaderMapper<'_> {
    fn inject(&self, obj: &mut InMemDicomObject) {
        let header = self.header;

        put_us(obj, tags::COLUMNS, header.dim[1]);
        put_us(obj, tags::ROWS, header.dim[2]);
        put_is(obj, tags::IMAGES_IN_ACQUISITION, i64::from(header.dim[3]));
        put_us(obj, tags::SAMPLES_PER_PIXEL, header.dim[4].max(1));

        put_str(
            obj,
            tags::STUDY_DESCRIPTION,
            VR::LO,
            header.description.replace('\\', "!"),
        );

        let (bits, slope) = self.bit_depth();
        put_us(obj, tags::BITS_ALLOCATED, bits);
        put_us(obj, tags::BITS_STORED, bits);
        put_us(obj, tags::HIGH_BIT, bits - 1);
        put_us(
            obj,
            tags::PIXEL_REPRESENTATION,
            if header.datatype.is_unsigned() { 0 } else { 1 },
        );
        put_ds_if_absent(obj, tags::RESCALE_SLOPE, slope);
        put_ds_if_absent(obj, tags::RESCALE_INTERCEPT, header.scl_inter);

        put_ds(obj, tags::SLICE_THICKNESS, &[header.pixdim[3]]);
        put_ds(obj, tags::PIXEL_SPACING, &[header.pixdim[1], header.pixdim[2]]);

        put_ds(obj, IMAGE_ORIENTATION, &[0.0_f64; 3]);
        put_ds(obj, IMAGE_POSITION, &[0.0_f64; 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Datatype;
    use crate::injector::tests::str_of;

    fn us(obj: &InMemDicomObject, tag: Tag) -> u16 {
        obj.element(tag).unwrap().to_int::<u16>().unwrap()
    }

    fn f64s(obj: &InMemDicomObject, tag: Tag) -> Vec<f64> {
        obj.element(tag).unwrap().to_multi_float64().unwrap()
    }

    #[test]
    fn maps_dimensions_and_spacing() {
        let header = Header::new(Datatype::Int16, (64, 48, 20))
            .with_spacing((0.75, 0.5, 2.5))
            .with_description("T1\\weighted");
        let obj = HeaderMapper::new(&header).apply(InMemDicomObject::new_empty());

        assert_eq!(us(&obj, tags::COLUMNS), 64);
        assert_eq!(us(&obj, tags::ROWS), 48);
        assert_eq!(obj.element(tags::IMAGES_IN_ACQUISITION).unwrap().to_int::<i32>().unwrap(), 20);
        assert_eq!(us(&obj, tags::SAMPLES_PER_PIXEL), 1);
        assert_eq!(str_of(&obj, tags::STUDY_DESCRIPTION), "T1!weighted");
        assert_eq!(us(&obj, tags::BITS_ALLOCATED), 16);
        assert_eq!(us(&obj, tags::BITS_STORED), 16);
        assert_eq!(us(&obj, tags::HIGH_BIT), 15);
        assert_eq!(us(&obj, tags::PIXEL_REPRESENTATION), 1);
        assert_eq!(f64s(&obj, tags::SLICE_THICKNESS), vec![2.5]);
        assert_eq!(f64s(&obj, tags::PIXEL_SPACING), vec![0.75, 0.5]);
        assert_eq!(f64s(&obj, IMAGE_ORIENTATION), vec![0.0; 3]);
        assert_eq!(f64s(&obj, IMAGE_POSITION), vec![0.0; 3]);
        assert_eq!(f64s(&obj, tags::RESCALE_SLOPE), vec![1.0]);
        assert_eq!(f64s(&obj, tags::RESCALE_INTERCEPT), vec![0.0]);
    }

    #[test]
    fn wide_bitpix_is_capped_with_slope_compensation() {
        let header = Header::new(Datatype::UInt32, (4, 4, 1)).with_rescale(0.5, 3.0);
        assert_eq!(header.bitpix, 32);
        let obj = HeaderMapper::new(&header).apply(InMemDicomObject::new_empty());
        assert_eq!(us(&obj, tags::BITS_ALLOCATED), 16);
        assert_eq!(us(&obj, tags::HIGH_BIT), 15);
        assert_eq!(us(&obj, tags::PIXEL_REPRESENTATION), 0);
        assert_eq!(f64s(&obj, tags::RESCALE_SLOPE), vec![1.0]);
        assert_eq!(f64s(&obj, tags::RESCALE_INTERCEPT), vec![3.0]);
    }

    #[test]
    fn byte_volumes() {
        let header = Header::new(Datatype::UInt8, (4, 4, 1));
        let obj = HeaderMapper::new(&header).apply(InMemDicomObject::new_empty());
        assert_eq!(us(&obj, tags::BITS_ALLOCATED), 8);
        assert_eq!(us(&obj, tags::HIGH_BIT), 7);
        assert_eq!(us(&obj, tags::PIXEL_REPRESENTATION), 0);
    }

    #[test]
    fn rescale_is_only_defaulted() {
        let header = Header::new(Datatype::Int16, (4, 4, 1)).with_rescale(2.0, -5.0);
        let mut obj = InMemDicomObject::new_empty();
        put_ds(&mut obj, tags::RESCALE_INTERCEPT, &[-1024.0]);
        put_ds(&mut obj, tags::RESCALE_SLOPE, &[1.0]);
        HeaderMapper::new(&header).inject(&mut obj);
        assert_eq!(f64s(&obj, tags::RESCALE_INTERCEPT), vec![-1024.0]);
        assert_eq!(f64s(&obj, tags::RESCALE_SLOPE), vec![1.0]);
    }
}
