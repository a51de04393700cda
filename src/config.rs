use crate::error::{ConvertError, Result};

pub const DEFAULT_UID_ROOT: &str = "1.2.351.99999";

/// Maximum length of a DICOM UID.
const MAX_UID_LEN: usize = 64;

/// Converter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    uid_root: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            uid_root: DEFAULT_UID_ROOT.to_string(),
        }
    }
}

impl ConverterConfig {
    /// # Errors
    ///
    /// Fails with [`ConvertError::InvalidUidRoot`] unless the root is a
    /// dot separated list of decimal components, leaving room for the
    /// study, series and instance terms.
    pub fn new(uid_root: impl Into<String>) -> Result<Self> {
        let uid_root = uid_root.into();
        if !is_valid_uid_root(&uid_root) {
            return Err(ConvertError::InvalidUidRoot(uid_root));
        }
        Ok(Self { uid_root })
    }

    pub fn uid_root(&self) -> &str {
        &self.uid_root
    }
}

fn is_valid_uid_root(root: &str) -> bool {
    // study, series and instance terms plus the frame of reference suffix
    let generated = 3 * (crate::uid::UID_TERM_LEN + 1) + 2;
    !root.is_empty()
        && root.len() + generated <= MAX_UID_LEN
        && root
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}
