pub mod reader;

pub use reader::DocumentReader;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document not found or not a regular file: {0}")]
    NotFound(PathBuf),
    #[error("unsupported document format: .{0} (expected pdf, txt or md)")]
    Unsupported(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded source document, ready to hand to the extraction client.
///
/// PDFs stay binary (they go to the service's file store); plain text
/// formats are decoded and embedded inline in the request.
#[derive(Debug, Clone)]
pub enum DocumentPayload {
    Binary { file_name: String, bytes: Vec<u8> },
    Text { file_name: String, content: String },
}

impl DocumentPayload {
    pub fn file_name(&self) -> &str {
        match self {
            DocumentPayload::Binary { file_name, .. } => file_name,
            DocumentPayload::Text { file_name, .. } => file_name,
        }
    }
}

/// Base name without extension, used to derive output file names.
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Load a source document from disk.
///
/// The path must point at an existing regular file; this is checked before
/// any read so a bad path fails fast, before any network activity.
pub async fn load_document(path: &Path) -> Result<DocumentPayload, IngestError> {
    if !path.is_file() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => {
            let bytes = DocumentReader::read_bytes(path).await?;
            Ok(DocumentPayload::Binary { file_name, bytes })
        }
        "txt" | "md" => {
            let content = DocumentReader::read_text(path).await?;
            Ok(DocumentPayload::Text { file_name, content })
        }
        other => Err(IngestError::Unsupported(other.to_string())),
    }
}
