use dicom::object::{FileMetaTableBuilder, InMemDicomObject, WithMetaError, WriteError};
use dicom_dictionary_std::{tags, uids};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

/// Destination of finished records.
pub trait Store {
    /// Persist one record, returning its location.
    ///
    /// `None` signals a failed store; callers leave the record out of
    /// their results instead of aborting.
    fn store(&mut self, record: InMemDicomObject) -> Option<String>;
}

impl<F> Store for F
where
    F: FnMut(InMemDicomObject) -> Option<String>,
{
    fn store(&mut self, record: InMemDicomObject) -> Option<String> {
        self(record)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record has no SOP Instance UID")]
    MissingInstanceUid,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not create file meta group: {0}")]
    Meta(#[from] WithMetaError),

    #[error("Could not write DICOM file: {0}")]
    Write(#[from] WriteError),
}

/// Writes each record as `<SOP Instance UID>.dcm` into a directory,
/// encoded in Explicit VR Little Endian.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    directory: PathBuf,
}

impl DirectoryStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write a record, reporting why it could not be stored.
    pub fn try_store(&self, record: InMemDicomObject) -> Result<PathBuf, StoreError> {
        let instance_uid = element_str(&record, tags::SOP_INSTANCE_UID)
            .ok_or(StoreError::MissingInstanceUid)?;
        let class_uid = element_str(&record, tags::SOP_CLASS_UID)
            .unwrap_or_else(|| uids::SECONDARY_CAPTURE_IMAGE_STORAGE.to_string());

        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(format!("{instance_uid}.dcm"));

        let file = record.with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(class_uid)
                .media_storage_sop_instance_uid(instance_uid),
        )?;
        file.write_to_file(&path)?;
        debug!("Stored {}", path.display());
        Ok(path)
    }
}

impl Store for DirectoryStore {
    fn store(&mut self, record: InMemDicomObject) -> Option<String> {
        match self.try_store(record) {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!("Failed to store DICOM record: {}", e);
                None
            }
        }
    }
}

fn element_str(obj: &InMemDicomObject, tag: dicom::core::Tag) -> Option<String> {
    let value = obj.element(tag).ok()?.to_str().ok()?;
    let value = value.trim_end_matches(['\0', ' ']);
    (!value.is_empty()).then(|| value.to_string())
}
