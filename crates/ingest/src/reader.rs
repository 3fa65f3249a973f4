use std::path::Path;
use tokio::fs;

use crate::IngestError;

pub struct DocumentReader;

impl DocumentReader {
    pub async fn read_text(path: &Path) -> Result<String, IngestError> {
        fs::read_to_string(path).await.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn read_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
        fs::read(path).await.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
