use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::error::ExtractError;

pub const UNCONSTRAINED_SUFFIX: &str = "unconstrained";
pub const STRUCTURED_SUFFIX: &str = "structured";

/// Deterministic output path: `<stem>_<suffix>.json` inside `dir`.
pub fn output_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{stem}_{suffix}.json"))
}

/// Write a value as indented UTF-8 JSON. An existing file is overwritten.
pub async fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ExtractError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    fs::write(path, json).await.map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
