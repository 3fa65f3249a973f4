use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an extraction call. All variants are terminal:
/// nothing here is retried, the error is reported and the run moves on.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("generation service request failed: {0}")]
    Service(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    ServiceStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("generation service returned no completion choices")]
    EmptyResponse,

    /// The model replied with something that is not JSON. The raw output is
    /// carried in the error so the operator can see what came back.
    #[error("model output is not valid JSON: {source}\n--- offending output ---\n{raw}")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("model output violates the curriculum schema:\n{}", .violations.join("\n"))]
    Schema { violations: Vec<String> },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
