use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Grade levels covered by a cycle-4 programme.
pub const GRADE_LEVELS: [&str; 3] = ["5e", "4e", "3e"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curriculum {
    pub subject: String,
    pub cycle: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_name: String,
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub concept_name: String,
    pub description: String,
    pub grade_levels: Vec<String>,
    pub prerequisites: Vec<String>,
}

/// The JSON Schema for a [`Curriculum`].
///
/// Declared once and reused in two places: sent to the service as the
/// structured-output constraint, and applied locally as the authoritative
/// post-hoc check (server-side enforcement is best effort only).
pub fn curriculum_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "subject": { "type": "string" },
            "cycle": { "type": "string" },
            "chapters": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "chapter_name": { "type": "string" },
                        "concepts": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "type": "object",
                                "properties": {
                                    "concept_name": { "type": "string" },
                                    "description": { "type": "string" },
                                    "grade_levels": {
                                        "type": "array",
                                        "minItems": 1,
                                        "items": { "enum": GRADE_LEVELS }
                                    },
                                    "prerequisites": {
                                        "type": "array",
                                        "items": { "type": "string" }
                                    }
                                },
                                "required": [
                                    "concept_name",
                                    "description",
                                    "grade_levels",
                                    "prerequisites"
                                ],
                                "additionalProperties": false
                            }
                        }
                    },
                    "required": ["chapter_name", "concepts"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["subject", "cycle", "chapters"],
        "additionalProperties": false
    })
}
