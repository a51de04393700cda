//! Batch conversion of named NIfTI inputs into a store.

use crate::converter::Converter;
use crate::injector::{Injector, InjectorBuilder, Pipeline, SeriesInfoInjector};
use crate::store::Store;
use crate::volume_loader::NiftiLoader;

use rand::Rng;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_MODALITY: &str = "CT";
pub const DEFAULT_PATIENT_NAME: &str = "Patient^Anonymous";
pub const UNKNOWN: &str = "UNKNOWN";

/// User supplied parameters of a conversion. Absent values get defaults
/// in [`ConversionRequest::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub modality: Option<String>,
    pub manufacturer: Option<String>,
    pub institution_name: Option<String>,
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub body_part: Option<String>,
}

impl ConversionRequest {
    /// Build the attribute pipeline of this request.
    ///
    /// Defaults: modality CT, manufacturer and institution `UNKNOWN`,
    /// an anonymous patient name and a random patient ID.
    pub fn resolve(&self) -> Pipeline {
        let modality = self
            .modality
            .as_deref()
            .unwrap_or(DEFAULT_MODALITY)
            .to_uppercase();
        let patient_id = self
            .patient_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let builder = InjectorBuilder::new()
            .patient(
                Some(self.patient_name.as_deref().unwrap_or(DEFAULT_PATIENT_NAME)),
                Some(&patient_id),
            )
            .general_clinic(
                self.manufacturer.as_deref().unwrap_or(UNKNOWN),
                self.institution_name.as_deref().unwrap_or(UNKNOWN),
            );
        let builder = match &self.body_part {
            Some(code) => builder.body_part(code),
            None => builder,
        };
        builder.modality(&modality).build()
    }
}

/// One input of a batch, named after its file when known.
pub struct NiftiInput<S> {
    pub name: Option<String>,
    pub source: S,
}

impl<S: Read> NiftiInput<S> {
    pub fn new(name: Option<String>, source: S) -> Self {
        Self { name, source }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Number of inputs received
    pub nifti_files: usize,
    /// Locations of all stored records
    pub locations: Vec<String>,
}

/// Convert every input and store the resulting records.
///
/// Each record gets the series information of its input file name, then
/// the request pipeline. Inputs that cannot be decoded or converted are
/// logged and skipped, as are records the store rejects.
pub fn convert_all<S, R, T>(
    converter: &mut Converter<R>,
    request: &ConversionRequest,
    inputs: impl IntoIterator<Item = NiftiInput<S>>,
    store: &mut T,
) -> ConversionReport
where
    S: Read,
    R: Rng,
    T: Store + ?Sized,
{
    let pipeline = request.resolve();
    let mut report = ConversionReport::default();

    for input in inputs {
        report.nifti_files += 1;
        let name = input.name.as_deref().unwrap_or("<unnamed>").to_string();

        let loaded = match NiftiLoader::load_from_reader(input.source) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to read NIfTI file {}: {}", name, e);
                continue;
            }
        };
        let series_info = input.name.as_deref().map(SeriesInfoInjector::from_file_name);

        let slices = match converter.convert(&loaded.volume, &loaded.header) {
            Ok(slices) => slices,
            Err(e) => {
                warn!("Failed to convert NIfTI file {}: {}", name, e);
                continue;
            }
        };

        let mut stored = 0;
        for record in slices {
            let mut record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Failed to convert NIfTI file {}: {}", name, e);
                    break;
                }
            };
            if let Some(series_info) = &series_info {
                series_info.inject(&mut record);
            }
            pipeline.inject(&mut record);
            if let Some(location) = store.store(record) {
                report.locations.push(location);
                stored += 1;
            }
        }
        info!("Stored {} DICOM records from {}", stored, name);
    }

    report
}

/// Convert the NIfTI files at `paths`, named after their file names.
///
/// Files that cannot be opened are logged, skipped and still counted in
/// [`ConversionReport::nifti_files`].
pub fn convert_paths<P, R, T>(
    converter: &mut Converter<R>,
    request: &ConversionRequest,
    paths: impl IntoIterator<Item = P>,
    store: &mut T,
) -> ConversionReport
where
    P: AsRef<Path>,
    R: Rng,
    T: Store + ?Sized,
{
    let mut unopened = 0;
    let inputs = paths.into_iter().filter_map(|path| {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                Some(NiftiInput::new(name, file))
            }
            Err(e) => {
                warn!("Could not open {}: {}", path.display(), e);
                unopened += 1;
                None
            }
        }
    });

    let mut report = convert_all(converter, request, inputs, store);
    report.nifti_files += unopened;
    report
}
