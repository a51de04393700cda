//! # NIfTI-DICOM library
//!
//! This crate converts NIfTI-1 volumes into series of single-frame DICOM
//! records.

//!
//! This library builds on the dicom-rs ecosystem for the produced records
//! and on nifti-rs for reading volumes. A volume with Z slices and C
//! channels becomes Z x C records, each carrying one slice of pixel data,
//! the image geometry and rescale parameters of the NIfTI header, a display
//! window computed over the whole volume and freshly generated study,
//! series and instance UIDs. All slices of one channel share a series.
//!
//! Records are then completed by a pipeline of attribute injectors:
//!  - Patient name and ID
//!  - Manufacturer and institution
//!  - Body part examined
//!  - Modality, with the CT or MR image class attributes where known
//!
//! Finished records go to a [`Store`], for example a [`DirectoryStore`]
//! writing one `.dcm` file per record.
//!
//! # Examples
//!
//! ## Converting a NIfTI file into a directory of DICOM files
//!
//! ```no_run
//! # use nifti_dicom::{Converter, DirectoryStore, InjectorBuilder, Injector, NiftiLoader, Store};
//! let nifti = NiftiLoader::load_from_file_path("brain.nii.gz")
//!     .expect("should have loaded NIfTI file");
//! let pipeline = InjectorBuilder::new()
//!     .patient(Some("Patient^Anonymous"), Some("0001"))
//!     .mr()
//!     .build();
//! let mut store = DirectoryStore::new("dicom");
//! let mut converter = Converter::default();
//! for record in converter
//!     .convert(&nifti.volume, &nifti.header)
//!     .expect("should have a valid display window")
//! {
//!     let record = pipeline.apply(record.expect("should have converted slice"));
//!     store.store(record);
//! }
//! ```

pub mod config;
pub mod converter;
pub mod enums;
pub mod error;
pub mod header_mapper;
pub mod injector;
pub mod pixel;
pub mod service;
pub mod store;
pub mod uid;
pub mod volume;
pub mod volume_loader;
pub mod window;

pub use config::ConverterConfig;
pub use converter::{Converter, Slices};
pub use enums::{BodyPart, Datatype};
pub use error::{ConvertError, DecodeError, Result};
pub use injector::{Injector, InjectorBuilder, Pipeline};
pub use service::{ConversionReport, ConversionRequest, NiftiInput, convert_all, convert_paths};
pub use store::{DirectoryStore, Store, StoreError};
pub use volume::{ArrayVolume, Header, Volume};
pub use volume_loader::{LoadedNifti, NiftiLoader};
pub use window::Window;
