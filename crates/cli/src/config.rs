use std::env;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("no document path: set DOCUMENT_PATH or pass a path on the command line")]
    MissingDocumentPath,
}

#[derive(Parser, Debug)]
#[command(
    name = "notion-extract",
    about = "Extract a structured curriculum (chapters and notions) from a programme document via a hosted LLM"
)]
pub struct Cli {
    /// Source document (pdf, txt or md); overrides DOCUMENT_PATH
    pub document: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub document_path: PathBuf,
    pub base_url: String,
    pub model: String,
}

impl Config {
    /// Resolve from process environment plus the CLI override. Any missing
    /// required value fails here, before a client is even constructed.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve_from(cli, |key| env::var(key).ok())
    }

    pub fn resolve_from(
        cli: &Cli,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let document_path = cli
            .document
            .clone()
            .or_else(|| lookup("DOCUMENT_PATH").map(PathBuf::from))
            .ok_or(ConfigError::MissingDocumentPath)?;

        let base_url =
            lookup("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com".to_string());
        let model = lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-2024-08-06".to_string());

        Ok(Self {
            api_key,
            document_path,
            base_url,
            model,
        })
    }
}
