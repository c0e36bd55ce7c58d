//! Infrastructure shared by every façade.
//!
//! [`FacadeCore`] bundles the resilient invoker, the model the façades ask
//! for and the input limits, so each façade only carries its own prompt
//! logic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::analysis::FileMetadata;
use crate::config::LimitsConfig;
use crate::error::RequestError;
use crate::gemini::Part;
use crate::invoker::ResilientInvoker;

/// Core infrastructure shared by all façades.
///
/// # Example
///
/// ```ignore
/// pub struct MyFacade {
///     core: FacadeCore,
/// }
///
/// impl MyFacade {
///     pub async fn run(&self, text: &str) -> AppResult<String> {
///         let request = InvocationRequest::new(self.core.model(), text);
///         Ok(self.core.invoker().invoke(request).await?.text)
///     }
/// }
/// ```
#[derive(Clone)]
pub struct FacadeCore {
    /// Invoker shared by all façades.
    invoker: ResilientInvoker,
    /// Primary model requested on every call.
    model: String,
    /// Input limits checked before upload.
    limits: LimitsConfig,
}

impl FacadeCore {
    /// Create a new façade core.
    pub fn new(invoker: ResilientInvoker, model: impl Into<String>, limits: LimitsConfig) -> Self {
        Self {
            invoker,
            model: model.into(),
            limits,
        }
    }

    /// Get a reference to the invoker.
    #[inline]
    pub fn invoker(&self) -> &ResilientInvoker {
        &self.invoker
    }

    /// Primary model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Input limits.
    #[inline]
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Reject uploads above the size ceiling.
    pub fn check_size(&self, upload: &MediaUpload) -> Result<(), RequestError> {
        let limit = self.limits.max_upload_bytes;
        if upload.data.len() > limit {
            return Err(RequestError::InputTooLarge {
                size: upload.data.len(),
                limit,
            });
        }
        Ok(())
    }
}

/// A decoded media file submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpload {
    pub name: String,
    pub mime_type: String,
    /// Raw file bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Opaque preview handle, echoed back in the result metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl MediaUpload {
    /// Create an upload from raw bytes.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
            preview: None,
        }
    }

    /// Decode a base64 payload, accepting an optional `data:<mime>;base64,` prefix.
    pub fn from_base64(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        encoded: &str,
    ) -> Result<Self, RequestError> {
        let payload = match encoded.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => encoded,
        };

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| RequestError::Validation {
                field: "data".to_string(),
                reason: format!("invalid base64: {}", e),
            })?;

        Ok(Self::new(name, mime_type, data))
    }

    /// Attach a preview handle.
    pub fn with_preview(mut self, preview: Option<String>) -> Self {
        self.preview = preview;
        self
    }

    /// Inline-data part carrying the file.
    pub fn to_part(&self) -> Part {
        Part::inline(&self.mime_type, STANDARD.encode(&self.data))
    }

    /// Metadata describing this upload in results.
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata::new(
            &self.name,
            self.data.len(),
            &self.mime_type,
            self.preview.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Modality;
    use crate::gemini::MockGenerateContent;
    use crate::invoker::KeyPool;
    use std::sync::Arc;

    fn core(limit: usize) -> FacadeCore {
        let invoker = ResilientInvoker::new(
            Arc::new(MockGenerateContent::new()),
            Arc::new(KeyPool::new(vec!["k".to_string()])),
            "gemini-flash-latest",
        );
        FacadeCore::new(
            invoker,
            "gemini-2.5-flash",
            LimitsConfig {
                max_upload_bytes: limit,
                archive_listing_limit: 100,
            },
        )
    }

    #[test]
    fn test_check_size_boundary() {
        let core = core(4);
        assert!(core
            .check_size(&MediaUpload::new("a", "image/png", vec![0; 4]))
            .is_ok());

        let err = core
            .check_size(&MediaUpload::new("a", "image/png", vec![0; 5]))
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::InputTooLarge { size: 5, limit: 4 }
        ));
    }

    #[test]
    fn test_core_accessors() {
        let core = core(1);
        assert_eq!(core.model(), "gemini-2.5-flash");
        assert_eq!(core.limits().archive_listing_limit, 100);
        assert_eq!(core.invoker().fallback_model(), "gemini-flash-latest");
    }

    #[test]
    fn test_from_base64_plain_and_data_url() {
        let plain = MediaUpload::from_base64("a.txt", "text/plain", "aGVsbG8=").unwrap();
        assert_eq!(plain.data, b"hello");

        let url =
            MediaUpload::from_base64("a.txt", "text/plain", "data:text/plain;base64,aGVsbG8=")
                .unwrap();
        assert_eq!(url.data, b"hello");
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        let err = MediaUpload::from_base64("a", "image/png", "***").unwrap_err();
        assert!(matches!(err, RequestError::Validation { ref field, .. } if field == "data"));
    }

    #[test]
    fn test_to_part_and_metadata() {
        let upload = MediaUpload::new("clip.mp4", "video/mp4", b"hello".to_vec())
            .with_preview(Some("blob:1".to_string()));

        let part = upload.to_part();
        let inline = part.inline_data.unwrap();
        assert_eq!(inline.mime_type, "video/mp4");
        assert_eq!(inline.data, "aGVsbG8=");

        let metadata = upload.metadata();
        assert_eq!(metadata.size, "0.00 MB");
        assert_eq!(metadata.preview.as_deref(), Some("blob:1"));
        assert_eq!(metadata.modality(), Modality::Video);
    }
}
