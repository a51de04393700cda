//! Composable attribute injectors.
//!
//! An [`Injector`] adds or defaults attributes on a DICOM record in place.
//! Injectors either set an attribute unconditionally or only when the
//! record does not carry it yet, so that values forced by an earlier stage
//! (such as the rescale coefficients of floating point volumes) survive
//! the rest of the pipeline.

mod builder;
mod class;

pub use builder::{InjectorBuilder, Pipeline};
pub use class::{CtClassInjector, MrClassInjector};

use crate::enums::BodyPart;

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;
use std::fmt::{Display, LowerExp};

/// A transform over a DICOM record.
pub trait Injector {
    fn inject(&self, obj: &mut InMemDicomObject);

    /// Inject into an owned record and hand it back.
    fn apply(&self, mut obj: InMemDicomObject) -> InMemDicomObject {
        self.inject(&mut obj);
        obj
    }
}

impl<F> Injector for F
where
    F: Fn(&mut InMemDicomObject),
{
    fn inject(&self, obj: &mut InMemDicomObject) {
        self(obj)
    }
}

pub(crate) fn contains(obj: &InMemDicomObject, tag: Tag) -> bool {
    obj.element(tag).is_ok()
}

pub(crate) fn put_str(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: impl Into<String>) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value.into())));
}

pub(crate) fn put_strs<I>(obj: &mut InMemDicomObject, tag: Tag, vr: VR, values: I)
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let values = values.into_iter().map(Into::into).collect();
    obj.put(DataElement::new(tag, vr, PrimitiveValue::Strs(values)));
}

pub(crate) fn put_us(obj: &mut InMemDicomObject, tag: Tag, value: u16) {
    obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}

pub(crate) fn put_is(obj: &mut InMemDicomObject, tag: Tag, value: i64) {
    put_str(obj, tag, VR::IS, value.to_string());
}

/// Put a decimal string attribute with one value per item.
pub(crate) fn put_ds<T>(obj: &mut InMemDicomObject, tag: Tag, values: &[T])
where
    T: Display + LowerExp,
{
    put_strs(obj, tag, VR::DS, values.iter().map(format_ds));
}

pub(crate) fn put_ds_if_absent<T>(obj: &mut InMemDicomObject, tag: Tag, value: T)
where
    T: Display + LowerExp,
{
    if !contains(obj, tag) {
        put_ds(obj, tag, &[value]);
    }
}

/// Create an empty element for a type 2 attribute unless present.
pub(crate) fn placehold(obj: &mut InMemDicomObject, tag: Tag, vr: VR) {
    if !contains(obj, tag) {
        obj.put(DataElement::empty(tag, vr));
    }
}

// DS values hold at most 16 characters
fn format_ds<T: Display + LowerExp>(value: &T) -> String {
    let text = value.to_string();
    if text.len() <= 16 {
        return text;
    }
    (0..=12)
        .rev()
        .map(|precision| format!("{value:.precision$e}"))
        .find(|text| text.len() <= 16)
        .unwrap_or(text)
}

/// Patient identification, each attribute only if given.
#[derive(Debug, Clone, Default)]
pub struct PatientInjector {
    name: Option<String>,
    id: Option<String>,
}

impl PatientInjector {
    pub fn new(name: Option<&str>, id: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_owned),
            id: id.map(str::to_owned),
        }
    }
}

impl Injector for PatientInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        if let Some(name) = &self.name {
            put_str(obj, tags::PATIENT_NAME, VR::PN, name.as_str());
        }
        if let Some(id) = &self.id {
            put_str(obj, tags::PATIENT_ID, VR::LO, id.as_str());
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneralClinicInjector {
    manufacturer: String,
    institution_name: String,
}

impl GeneralClinicInjector {
    pub fn new(manufacturer: impl Into<String>, institution_name: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            institution_name: institution_name.into(),
        }
    }
}

impl Injector for GeneralClinicInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_str(obj, tags::MANUFACTURER, VR::LO, self.manufacturer.as_str());
        put_str(obj, tags::INSTITUTION_NAME, VR::LO, self.institution_name.as_str());
    }
}

/// Sets Body Part Examined. An unknown body part leaves the record untouched.
#[derive(Debug, Clone, Copy)]
pub struct BodyPartInjector(pub Option<BodyPart>);

impl BodyPartInjector {
    pub fn from_code(code: &str) -> Self {
        Self(BodyPart::from_code(code))
    }
}

impl Injector for BodyPartInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        if let Some(part) = self.0 {
            put_str(obj, tags::BODY_PART_EXAMINED, VR::CS, part.as_str());
        }
    }
}

/// Sets the Modality attribute and nothing else.
#[derive(Debug, Clone)]
pub struct ModalityInjector(pub String);

impl Injector for ModalityInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_str(obj, tags::MODALITY, VR::CS, self.0.as_str());
    }
}

/// Series description and accession number taken from the input file name.
#[derive(Debug, Clone)]
pub struct SeriesInfoInjector {
    description: String,
}

impl SeriesInfoInjector {
    const MAX_ACCESSION_LEN: usize = 16;

    pub fn from_file_name(file_name: &str) -> Self {
        let description = [".nii.gz", ".nii"]
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext))
            .unwrap_or(file_name);
        Self {
            description: description.to_owned(),
        }
    }

    pub fn accession_number(&self) -> Option<&str> {
        let (prefix, _) = self.description.split_once('_')?;
        if prefix.is_empty() {
            return None;
        }
        let end = prefix
            .char_indices()
            .nth(Self::MAX_ACCESSION_LEN)
            .map_or(prefix.len(), |(i, _)| i);
        Some(&prefix[..end])
    }
}

impl Injector for SeriesInfoInjector {
    fn inject(&self, obj: &mut InMemDicomObject) {
        put_str(obj, tags::SERIES_DESCRIPTION, VR::LO, self.description.as_str());
        if let Some(accession) = self.accession_number() {
            put_str(obj, tags::ACCESSION_NUMBER, VR::SH, accession);
        }
    }
}
