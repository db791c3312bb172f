use bytes::Bytes;

use crate::{RepositoryError, RepositorySettings};

/// A picked file, ready to be validated and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            contents: contents.into(),
        }
    }

    /// Local checks run before any request: size first, then MIME type
    /// (exact match).
    pub fn validate(&self, settings: &RepositorySettings) -> Result<(), RepositoryError> {
        let actual = self.contents.len() as u64;
        if actual > settings.max_upload_bytes {
            return Err(RepositoryError::FileTooLarge {
                max_bytes: settings.max_upload_bytes,
                actual,
            });
        }
        if !settings
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed == &self.mime_type)
        {
            return Err(RepositoryError::InvalidFileType {
                mime_type: self.mime_type.clone(),
            });
        }
        Ok(())
    }
}
