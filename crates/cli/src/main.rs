mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use extract::{DocumentRef, Extractor, GenerationService, OpenAiClient};
use ingest::DocumentPayload;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = config::Cli::parse();
    let cfg = config::Config::resolve(&cli)?;

    let client = OpenAiClient::new(cfg.base_url, cfg.api_key, cfg.model);
    let output_dir = std::env::current_dir().context("cannot resolve current directory")?;

    run(client, &cfg.document_path, output_dir).await
}

/// Load the document, resolve it into a service-side reference, then run the
/// two extraction calls. Generic over the service so tests drive it with a
/// stub and no network.
async fn run<S: GenerationService>(
    service: S,
    document_path: &Path,
    output_dir: PathBuf,
) -> Result<()> {
    let payload = ingest::load_document(document_path).await?;
    let stem = ingest::document_stem(document_path);
    info!(document = %document_path.display(), "document loaded");

    let document = match payload {
        DocumentPayload::Binary { file_name, bytes } => {
            let file_id = service.upload_document(&file_name, bytes).await?;
            info!(file_id = %file_id, "document uploaded to the service file store");
            DocumentRef::FileId(file_id)
        }
        DocumentPayload::Text { content, .. } => DocumentRef::InlineText(content),
    };

    let extractor = Extractor::new(service, output_dir);
    let report = extractor.run(&document, &stem).await;

    match &report.unconstrained {
        Ok(path) => println!("✅ unconstrained extraction saved to {}", path.display()),
        Err(e) => error!(error = %e, "unconstrained call failed"),
    }
    match &report.structured {
        Ok(path) => println!("✅ structured extraction saved to {}", path.display()),
        Err(e) => error!(error = %e, "structured call failed"),
    }

    if report.all_succeeded() {
        Ok(())
    } else {
        anyhow::bail!("one or more extraction calls failed");
    }
}
