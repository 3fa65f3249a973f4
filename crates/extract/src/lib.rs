pub mod error;
pub mod llm;
pub mod output;
pub mod prompt;
pub mod schema;
pub mod validate;

pub use error::ExtractError;
pub use llm::{DocumentRef, ExtractionRequest, GenerationService, OpenAiClient};
pub use schema::{Chapter, Concept, Curriculum};

use std::path::PathBuf;

use tracing::info;

/// Outcome of one dual-call run. Each call carries its own result so a
/// failure on one side never masks the other's output.
#[derive(Debug)]
pub struct RunReport {
    pub unconstrained: Result<PathBuf, ExtractError>,
    pub structured: Result<PathBuf, ExtractError>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.unconstrained.is_ok() && self.structured.is_ok()
    }
}

/// Runs the two extraction calls against the same document and persists each
/// successful result. The service is passed in explicitly, so tests run with
/// canned stubs instead of the network.
pub struct Extractor<S: GenerationService> {
    service: S,
    output_dir: PathBuf,
}

impl<S: GenerationService> Extractor<S> {
    pub fn new(service: S, output_dir: PathBuf) -> Self {
        Self {
            service,
            output_dir,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run both calls, strictly sequentially, with no retries. A failed call
    /// is reported in its slot of the [`RunReport`]; the other call still runs.
    pub async fn run(&self, document: &DocumentRef, stem: &str) -> RunReport {
        let unconstrained = self.run_unconstrained(document, stem).await;
        let structured = self.run_structured(document, stem).await;

        RunReport {
            unconstrained,
            structured,
        }
    }

    /// Call A: JSON-only instruction, shape described in prose, no
    /// machine-checked schema attached. The parsed value is written as-is.
    async fn run_unconstrained(
        &self,
        document: &DocumentRef,
        stem: &str,
    ) -> Result<PathBuf, ExtractError> {
        let request = ExtractionRequest {
            document: document.clone(),
            instruction: prompt::freeform_instruction(),
            schema: None,
        };

        let raw = self.service.generate(&request).await?;
        let value = validate::parse_json(&raw)?;

        let path = output::output_path(&self.output_dir, stem, output::UNCONSTRAINED_SUFFIX);
        output::write_pretty(&path, &value).await?;
        info!(path = %path.display(), "unconstrained extraction saved");
        Ok(path)
    }

    /// Call B: the schema travels with the request as a structured-output
    /// constraint, and the response is validated locally anyway — server-side
    /// enforcement is best effort, the local check is authoritative.
    async fn run_structured(
        &self,
        document: &DocumentRef,
        stem: &str,
    ) -> Result<PathBuf, ExtractError> {
        let schema_value = schema::curriculum_schema();

        let request = ExtractionRequest {
            document: document.clone(),
            instruction: prompt::structured_instruction(&schema_value),
            schema: Some(schema_value.clone()),
        };

        let raw = self.service.generate(&request).await?;
        let value = validate::parse_json(&raw)?;
        validate::validate_against(&schema_value, &value)?;

        let curriculum: Curriculum =
            serde_json::from_value(value).map_err(|e| ExtractError::Schema {
                violations: vec![format!(
                    "validated output does not map onto the curriculum model: {e}"
                )],
            })?;

        let path = output::output_path(&self.output_dir, stem, output::STRUCTURED_SUFFIX);
        output::write_pretty(&path, &curriculum).await?;
        info!(path = %path.display(), "structured extraction saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned service: pops one pre-programmed response per generate call and
    /// records what each request looked like.
    struct StubService {
        responses: Mutex<VecDeque<Result<String, ExtractError>>>,
        calls: AtomicUsize,
        schema_flags: Mutex<Vec<bool>>,
    }

    impl StubService {
        fn new(responses: Vec<Result<String, ExtractError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                schema_flags: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerationService for StubService {
        async fn upload_document(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, ExtractError> {
            Ok("file-stub".to_string())
        }

        async fn generate(&self, request: &ExtractionRequest) -> Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.schema_flags
                .lock()
                .unwrap()
                .push(request.schema.is_some());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("stub service ran out of responses")
        }
    }

    fn valid_curriculum() -> Value {
        json!({
            "subject": "SVT",
            "cycle": "cycle 4",
            "chapters": [{
                "chapter_name": "Le vivant et son évolution",
                "concepts": [{
                    "concept_name": "Photosynthèse",
                    "description": "Production de matière organique à partir de lumière",
                    "grade_levels": ["5e"],
                    "prerequisites": []
                }]
            }]
        })
    }

    fn doc() -> DocumentRef {
        DocumentRef::InlineText("Programme de SVT, cycle 4".to_string())
    }

    #[tokio::test]
    async fn test_both_calls_produce_output_files() {
        let dir = tempfile::tempdir().unwrap();
        let body = valid_curriculum().to_string();
        let service = StubService::new(vec![Ok(body.clone()), Ok(body)]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        let report = extractor.run(&doc(), "programme").await;

        assert!(report.all_succeeded());
        assert_eq!(extractor.service().call_count(), 2);

        for suffix in ["unconstrained", "structured"] {
            let path = dir.path().join(format!("programme_{suffix}.json"));
            let written: Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(written, valid_curriculum(), "{suffix} content mismatch");
        }
    }

    #[tokio::test]
    async fn test_exactly_one_schema_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let body = valid_curriculum().to_string();
        let service = StubService::new(vec![Ok(body.clone()), Ok(body)]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        extractor.run(&doc(), "programme").await;

        let flags = extractor.service().schema_flags.lock().unwrap().clone();
        assert_eq!(flags, vec![false, true]);
    }

    #[tokio::test]
    async fn test_parse_failure_on_call_a_does_not_block_call_b() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = "Here is your curriculum: subject SVT...".to_string();
        let service = StubService::new(vec![Ok(garbage.clone()), Ok(valid_curriculum().to_string())]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        let report = extractor.run(&doc(), "programme").await;

        match report.unconstrained {
            Err(ExtractError::Parse { raw, .. }) => assert_eq!(raw, garbage),
            other => panic!("expected Parse error, got {:?}", other),
        }
        assert!(!dir.path().join("programme_unconstrained.json").exists());

        assert!(report.structured.is_ok());
        assert!(dir.path().join("programme_structured.json").exists());
    }

    #[tokio::test]
    async fn test_schema_violation_writes_no_structured_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut missing_chapters = valid_curriculum();
        missing_chapters.as_object_mut().unwrap().remove("chapters");

        let service = StubService::new(vec![
            Ok(valid_curriculum().to_string()),
            Ok(missing_chapters.to_string()),
        ]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        let report = extractor.run(&doc(), "programme").await;

        assert!(report.unconstrained.is_ok());
        match report.structured {
            Err(ExtractError::Schema { violations }) => {
                assert!(violations.iter().any(|v| v.contains("chapters")));
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
        assert!(!dir.path().join("programme_structured.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_grade_level_fails_structured_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = valid_curriculum();
        bad["chapters"][0]["concepts"][0]["grade_levels"] = json!(["6e"]);

        let service = StubService::new(vec![
            Ok(valid_curriculum().to_string()),
            Ok(bad.to_string()),
        ]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        let report = extractor.run(&doc(), "programme").await;

        let err = report.structured.unwrap_err();
        assert!(err.to_string().contains("grade_levels"));
    }

    #[tokio::test]
    async fn test_service_failure_on_call_b_keeps_call_a_output() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService::new(vec![
            Ok(valid_curriculum().to_string()),
            Err(ExtractError::EmptyResponse),
        ]);

        let extractor = Extractor::new(service, dir.path().to_path_buf());
        let report = extractor.run(&doc(), "programme").await;

        assert!(report.unconstrained.is_ok());
        assert!(dir.path().join("programme_unconstrained.json").exists());
        assert!(matches!(
            report.structured,
            Err(ExtractError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_runs_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let body = valid_curriculum().to_string();

        for _ in 0..2 {
            let service = StubService::new(vec![Ok(body.clone()), Ok(body.clone())]);
            let extractor = Extractor::new(service, dir.path().to_path_buf());
            let report = extractor.run(&doc(), "programme").await;
            assert!(report.all_succeeded());
        }

        let first = std::fs::read(dir.path().join("programme_unconstrained.json")).unwrap();
        let second = std::fs::read(dir.path().join("programme_structured.json")).unwrap();

        // Re-run with the same deterministic stub and compare bytes.
        let service = StubService::new(vec![Ok(body.clone()), Ok(body)]);
        let extractor = Extractor::new(service, dir.path().to_path_buf());
        extractor.run(&doc(), "programme").await;

        assert_eq!(
            first,
            std::fs::read(dir.path().join("programme_unconstrained.json")).unwrap()
        );
        assert_eq!(
            second,
            std::fs::read(dir.path().join("programme_structured.json")).unwrap()
        );
    }
}
