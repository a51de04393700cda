use super::{Injector, placehold, put_ds_if_absent, put_str, put_strs};
use crate::enums::{
    CtImageType, MrImageType, PhotometricInterpretation, ScanningSequence, SequenceVariant,
};

use dicom::core::VR;
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::{tags, uids};

/// Attributes of the CT Image Storage class.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtClassInjector {
    image_type: CtImageType,
    photometric_interpretation: PhotometricInterpretation,
}

impl CtClassInjector {
    pub fn new(
        image_type: CtImageType,
        photometric_interpretation: PhotometricInterpretation,
    ) -> Self {
        Self {
            image_type,
            photometric_interpretation,
        }
    }
}

impl Injector for CtClassInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_str(obj, tags::MODALITY, VR::CS, "CT");
        put_str(obj, tags::SOP_CLASS_UID, VR::UI, uids::CT_IMAGE_STORAGE);
        put_str(obj, tags::IMAGE_TYPE, VR::CS, self.image_type.as_str());
        put_str(
            obj,
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            self.photometric_interpretation.as_str(),
        );
        put_ds_if_absent(obj, tags::RESCALE_INTERCEPT, 0.0_f64);
        put_ds_if_absent(obj, tags::RESCALE_SLOPE, 1.0_f64);

        // type 2
        placehold(obj, tags::KVP, VR::DS);
        placehold(obj, tags::ACQUISITION_NUMBER, VR::IS);
    }
}

/// Attributes of the MR Image Storage class.
#[derive(Debug, Clone)]
pub struct MrClassInjector {
    image_type: MrImageType,
    photometric_interpretation: PhotometricInterpretation,
    scanning_sequences: Vec<ScanningSequence>,
    sequence_variants: Vec<SequenceVariant>,
}

impl Default for MrClassInjector {
    fn default() -> Self {
        Self::new(MrImageType::default())
    }
}

impl MrClassInjector {
    /// MR injector in research mode without sequence variant.
    pub fn new(image_type: MrImageType) -> Self {
        Self {
            image_type,
            photometric_interpretation: PhotometricInterpretation::default(),
            scanning_sequences: vec![ScanningSequence::default()],
            sequence_variants: vec![SequenceVariant::default()],
        }
    }

    pub fn with_photometric_interpretation(mut self, pi: PhotometricInterpretation) -> Self {
        self.photometric_interpretation = pi;
        self
    }

    /// Replace the scanning sequences and variants.
    /// Empty lists keep the previous values, as both attributes hold at least one code.
    pub fn with_sequences(
        mut self,
        scanning_sequences: impl IntoIterator<Item = ScanningSequence>,
        sequence_variants: impl IntoIterator<Item = SequenceVariant>,
    ) -> Self {
        let scanning_sequences: Vec<_> = scanning_sequences.into_iter().collect();
        if !scanning_sequences.is_empty() {
            self.scanning_sequences = scanning_sequences;
        }
        let sequence_variants: Vec<_> = sequence_variants.into_iter().collect();
        if !sequence_variants.is_empty() {
            self.sequence_variants = sequence_variants;
        }
        self
    }
}

impl Injector for MrClassInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_str(obj, tags::MODALITY, VR::CS, "MR");
        put_str(obj, tags::SOP_CLASS_UID, VR::UI, uids::MR_IMAGE_STORAGE);
        put_str(obj, tags::IMAGE_TYPE, VR::CS, self.image_type.as_str());
        put_str(
            obj,
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            self.photometric_interpretation.as_str(),
        );
        put_strs(
            obj,
            tags::SCANNING_SEQUENCE,
            VR::CS,
            self.scanning_sequences.iter().map(|s| s.as_str()),
        );
        put_strs(
            obj,
            tags::SEQUENCE_VARIANT,
            VR::CS,
            self.sequence_variants.iter().map(|s| s.as_str()),
        );

        // type 2
        placehold(obj, tags::SCAN_OPTIONS, VR::CS);
        placehold(obj, tags::MR_ACQUISITION_TYPE, VR::CS);
        placehold(obj, tags::REPETITION_TIME, VR::DS);
        placehold(obj, tags::ECHO_TIME, VR::DS);
        placehold(obj, tags::ECHO_TRAIN_LENGTH, VR::IS);
        placehold(obj, tags::INVERSION_TIME, VR::DS);
    }
}
