//! Attachment Encoder
//!
//! Turns user-supplied documents (PDFs, images, ...) into base64 payloads
//! paired with their media type, ready to be inlined into a reasoning request.

use crate::error::EncodingError;
use base64::Engine;
use futures::future::try_join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fallback media type when none is supplied and none can be guessed.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// A document as handed over by an entry point, before encoding.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A file on the local filesystem.
    File {
        path: PathBuf,
        media_type: Option<String>,
    },
    /// Bytes already in memory, e.g. an uploaded multipart part.
    Inline {
        name: String,
        media_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl DocumentSource {
    /// A filesystem document whose media type is guessed from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        DocumentSource::File {
            path: path.into(),
            media_type: None,
        }
    }

    /// A display name used in logs and error messages.
    pub fn name(&self) -> String {
        match self {
            DocumentSource::File { path, .. } => path.display().to_string(),
            DocumentSource::Inline { name, .. } => name.clone(),
        }
    }
}

/// An encoded document, ready to be sent to the reasoning backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Standard base64 of the original bytes.
    pub data: String,
    pub media_type: String,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// The attachment as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Resolves the media type for a document. An explicit value always wins and
/// is kept byte-for-byte.
fn resolve_media_type(explicit: Option<&str>, name_hint: &Path) -> String {
    match explicit {
        Some(media_type) if !media_type.is_empty() => media_type.to_string(),
        _ => mime_guess::from_path(name_hint)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
    }
}

fn encode_bytes(name: &str, bytes: &[u8], media_type: String) -> Result<Attachment, EncodingError> {
    if bytes.is_empty() {
        return Err(EncodingError::Empty {
            name: name.to_string(),
        });
    }
    debug!(document = %name, %media_type, size = bytes.len(), "Encoded document");
    Ok(Attachment {
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        media_type,
    })
}

/// Encodes a single document.
///
/// Files are read in full and closed before this returns.
pub async fn encode(source: &DocumentSource) -> Result<Attachment, EncodingError> {
    match source {
        DocumentSource::File { path, media_type } => {
            let name = path.display().to_string();
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| EncodingError::Read {
                    name: name.clone(),
                    source,
                })?;
            encode_bytes(&name, &bytes, resolve_media_type(media_type.as_deref(), path))
        }
        DocumentSource::Inline {
            name,
            media_type,
            bytes,
        } => encode_bytes(
            name,
            bytes,
            resolve_media_type(media_type.as_deref(), Path::new(name)),
        ),
    }
}

/// Encodes every document concurrently, preserving order.
///
/// All-or-nothing: the first failure fails the whole batch.
pub async fn encode_all(sources: &[DocumentSource]) -> Result<Vec<Attachment>, EncodingError> {
    try_join_all(sources.iter().map(encode)).await
}
