use serde_json::Value;

use crate::llm::DocumentRef;

/// Instruction for the unconstrained call: the expected shape is described in
/// prose only, no machine-checked schema travels with the request.
pub fn freeform_instruction() -> String {
    r#"You are an expert curriculum analyst. Read the provided programme document and extract its full structure.

RETURN ONLY a valid JSON object with this exact structure:
{
  "subject": "the school subject",
  "cycle": "the educational cycle",
  "chapters": [
    {
      "chapter_name": "name of the chapter",
      "concepts": [
        {
          "concept_name": "name of the concept",
          "description": "one or two sentences describing the concept",
          "grade_levels": ["5e", "4e", "3e"],
          "prerequisites": ["names of concepts this one builds on"]
        }
      ]
    }
  ]
}

RULES:
- grade_levels lists only the levels at which the concept is taught
- prerequisites may be empty but must be present
- NO EXTRA TEXT, NO MARKDOWN, JUST THE JSON OBJECT"#
        .to_string()
}

/// Instruction for the schema-constrained call: the serialized schema is
/// embedded verbatim and exact conformance is demanded.
pub fn structured_instruction(schema: &Value) -> String {
    format!(
        r#"You are an expert curriculum analyst. Read the provided programme document and extract its full structure.

Return EXACTLY one JSON object conforming to this JSON Schema:
{}

NOTHING ELSE."#,
        serde_json::to_string_pretty(schema).unwrap_or_default()
    )
}

/// User message carrying the document itself: either a reference to the
/// uploaded copy, or the decoded text inline.
pub fn document_message(document: &DocumentRef) -> String {
    match document {
        DocumentRef::FileId(file_id) => format!(
            "Analyse the uploaded programme document (file id {}) and return the requested JSON.",
            file_id
        ),
        DocumentRef::InlineText(text) => format!(
            "Analyse the following programme document and return the requested JSON.\n\nDOCUMENT:\n{}",
            text
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_instruction_embeds_schema() {
        let schema = json!({"type": "object", "required": ["subject"]});
        let instruction = structured_instruction(&schema);
        assert!(instruction.contains("\"required\""));
        assert!(instruction.contains("JSON Schema"));
    }

    #[test]
    fn test_document_message_references_file_id() {
        let msg = document_message(&DocumentRef::FileId("file-abc123".to_string()));
        assert!(msg.contains("file-abc123"));
    }

    #[test]
    fn test_document_message_inlines_text() {
        let msg = document_message(&DocumentRef::InlineText("Chapitre 1".to_string()));
        assert!(msg.contains("DOCUMENT:\nChapitre 1"));
    }
}
