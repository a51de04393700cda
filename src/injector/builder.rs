use super::{
    BodyPartInjector, CtClassInjector, GeneralClinicInjector, Injector, ModalityInjector,
    MrClassInjector, PatientInjector,
};
use crate::enums::{CtImageType, MrImageType, PhotometricInterpretation};

use dicom::object::InMemDicomObject;
use std::fmt;
use std::sync::Arc;

type Stage = Arc<dyn Injector + Send + Sync>;

/// An ordered, reusable composition of injectors.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Injector for Pipeline {
    fn inject(&self, obj: &mut InMemDicomObject) {
        for stage in &self.stages {
            stage.inject(obj);
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Assembles a [`Pipeline`] from high level parameters.
///
/// Each step returns a new builder with the injector appended, and
/// injectors run in the order they were added. The usual order is
/// patient, general clinic, body part and finally the modality class.
///
/// ```
/// # use nifti_dicom::InjectorBuilder;
/// let pipeline = InjectorBuilder::new()
///     .patient(Some("Patient^Anonymous"), Some("123456789"))
///     .general_clinic("UNKNOWN", "UNKNOWN")
///     .body_part("Th")
///     .modality("CT")
///     .build();
/// assert_eq!(pipeline.len(), 4);
/// ```
#[derive(Clone, Default)]
pub struct InjectorBuilder {
    stages: Vec<Stage>,
}

impl InjectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any injector.
    pub fn with(mut self, injector: impl Injector + Send + Sync + 'static) -> Self {
        self.stages.push(Arc::new(injector));
        self
    }

    pub fn patient(self, name: Option<&str>, id: Option<&str>) -> Self {
        self.with(PatientInjector::new(name, id))
    }

    pub fn general_clinic(self, manufacturer: &str, institution_name: &str) -> Self {
        self.with(GeneralClinicInjector::new(manufacturer, institution_name))
    }

    pub fn body_part(self, code: &str) -> Self {
        self.with(BodyPartInjector::from_code(code))
    }

    pub fn ct(self) -> Self {
        self.with(CtClassInjector::default())
    }

    pub fn ct_with(
        self,
        image_type: CtImageType,
        photometric_interpretation: PhotometricInterpretation,
    ) -> Self {
        self.with(CtClassInjector::new(image_type, photometric_interpretation))
    }

    pub fn mr(self) -> Self {
        self.with(MrClassInjector::default())
    }

    pub fn mr_with(self, injector: MrClassInjector) -> Self {
        self.with(injector)
    }

    /// Route a modality code to its injector.
    ///
    /// `CT` and `MR` map to the class injectors, `MRT1` and `MRT2` to the
    /// MR class with a T1 or T2 map image type. Any other code only sets
    /// the Modality attribute.
    pub fn modality(self, modality: &str) -> Self {
        match modality {
            "CT" => self.ct(),
            "MR" => self.mr(),
            "MRT1" => self.mr_with(MrClassInjector::new(MrImageType::T1Map)),
            "MRT2" => self.mr_with(MrClassInjector::new(MrImageType::T2Map)),
            other => self.with(ModalityInjector(other.to_owned())),
        }
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

impl fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("stages", &self.stages.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::put_ds;
    use crate::injector::tests::str_of;
    use dicom::core::VR;
    use dicom_dictionary_std::tags;

    #[test]
    fn builder_ct() {
        let pipeline = InjectorBuilder::new()
            .patient(Some("Esquina^Jose"), Some("222"))
            .general_clinic("DicoogleIsBestPACS", "UA.PT Bioinformatics")
            .body_part("Wb")
            .modality("CT")
            .build();

        let obj = pipeline.apply(InMemDicomObject::new_empty());
        assert_eq!(str_of(&obj, tags::MODALITY), "CT");
        assert_eq!(str_of(&obj, tags::SOP_CLASS_UID), "1.2.840.10008.5.1.4.1.1.2");
        assert_eq!(obj.element(tags::IMAGE_TYPE).unwrap().value().multiplicity(), 1);
        assert_eq!(str_of(&obj, tags::PATIENT_NAME), "Esquina^Jose");
        assert_eq!(str_of(&obj, tags::PATIENT_ID), "222");
        assert_eq!(str_of(&obj, tags::MANUFACTURER), "DicoogleIsBestPACS");
        assert_eq!(str_of(&obj, tags::BODY_PART_EXAMINED), "WHOLEBODY");
        assert_eq!(obj.element(tags::BODY_PART_EXAMINED).unwrap().vr(), VR::CS);
    }

    #[test]
    fn builder_mr() {
        let obj = InjectorBuilder::new()
            .patient(Some("Esquina^Jose"), Some("222"))
            .general_clinic("DicoogleIsBestPACS", "UA.PT Bioinformatics")
            .modality("MR")
            .build()
            .apply(InMemDicomObject::new_empty());
        assert_eq!(str_of(&obj, tags::MODALITY), "MR");
        assert_eq!(str_of(&obj, tags::SOP_CLASS_UID), "1.2.840.10008.5.1.4.1.1.4");
        assert_eq!(str_of(&obj, tags::SCANNING_SEQUENCE), "RM");
        assert_eq!(str_of(&obj, tags::PHOTOMETRIC_INTERPRETATION), "MONOCHROME2");
    }

    #[test]
    fn modality_routing() {
        let t1 = InjectorBuilder::new().modality("MRT1").build();
        let obj = t1.apply(InMemDicomObject::new_empty());
        assert_eq!(str_of(&obj, tags::MODALITY), "MR");
        assert_eq!(str_of(&obj, tags::IMAGE_TYPE), "T1 MAP");

        let obj = InjectorBuilder::new()
            .modality("MRT2")
            .build()
            .apply(InMemDicomObject::new_empty());
        assert_eq!(str_of(&obj, tags::IMAGE_TYPE), "T2 MAP");

        let obj = InjectorBuilder::new()
            .modality("PT")
            .build()
            .apply(InMemDicomObject::new_empty());
        assert_eq!(str_of(&obj, tags::MODALITY), "PT");
        assert!(obj.element(tags::SOP_CLASS_UID).is_err());
    }

    #[test]
    fn pipeline_is_reusable_and_builders_fork() {
        let base = InjectorBuilder::new().general_clinic("ACME", "General Hospital");
        let ct = base.clone().modality("CT").build();
        let plain = base.build();
        assert_eq!(ct.len(), 2);
        assert_eq!(plain.len(), 1);

        for _ in 0..2 {
            let obj = ct.apply(InMemDicomObject::new_empty());
            assert_eq!(str_of(&obj, tags::MODALITY), "CT");
        }
        let obj = plain.apply(InMemDicomObject::new_empty());
        assert!(obj.element(tags::MODALITY).is_err());
        assert!(InjectorBuilder::new().build().is_empty());
    }

    #[test]
    fn stages_run_in_order() {
        let obj = InjectorBuilder::new()
            .with(|obj: &mut InMemDicomObject| put_ds(obj, tags::RESCALE_SLOPE, &[2.0]))
            .modality("CT")
            .build()
            .apply(InMemDicomObject::new_empty());
        // the CT default does not replace the earlier slope
        assert_eq!(obj.element(tags::RESCALE_SLOPE).unwrap().to_float64().unwrap(), 2.0);
        assert_eq!(obj.element(tags::RESCALE_INTERCEPT).unwrap().to_float64().unwrap(), 0.0);
    }
}
