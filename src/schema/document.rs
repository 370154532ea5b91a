/// Compiled story document — types, RON loading, and validation.
///
/// The document is the immutable input to the interpreter: a graph of
/// passages produced by an external authoring tool, handed to the engine
/// at construction and never mutated during a session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::value::{AssignOp, Value};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("entry passage '{0}' is not defined")]
    MissingEntry(PassageId),
    #[error("passage '{from}' has a choice targeting undefined passage '{target}'")]
    DanglingTarget { from: PassageId, target: PassageId },
    #[error("passage '{0}' is not defined")]
    UnknownPassage(PassageId),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Identifier of a passage within a document. Doubles as the engine's
/// cursor type: opaque to the host, meaningful only to the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassageId(pub String);

impl PassageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PassageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One linear content unit inside a passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// A run of narrative text, emitted as a text block.
    Text(String),
    /// A colon-delimited tag directive, e.g. `"image:evidence1.png"`
    /// or `"mint:Sword"`. Interpreted by the tag dispatcher.
    Tag(String),
    /// A variable mutation applied while advancing.
    Assign {
        name: String,
        op: AssignOp,
        value: Value,
    },
}

/// A player option offered at the end of a passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDef {
    pub text: String,
    pub target: PassageId,
}

/// A node of the narrative graph: linear steps followed by zero or more
/// choices. No choices marks a terminal passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub choices: Vec<ChoiceDef>,
}

/// A compiled story: entry point, declared variables with defaults, and
/// the passage graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDocument {
    pub entry: PassageId,
    #[serde(default)]
    pub variables: HashMap<String, Value>,
    pub passages: HashMap<PassageId, Passage>,
}

impl StoryDocument {
    /// Load a story document from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<StoryDocument, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a story document from a RON string.
    pub fn parse_ron(input: &str) -> Result<StoryDocument, DocumentError> {
        let doc: StoryDocument = ron::from_str(input)?;
        Ok(doc)
    }

    /// Check graph integrity: the entry passage exists and every choice
    /// targets a defined passage.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if !self.passages.contains_key(&self.entry) {
            return Err(DocumentError::MissingEntry(self.entry.clone()));
        }
        for (id, passage) in &self.passages {
            for choice in &passage.choices {
                if !self.passages.contains_key(&choice.target) {
                    return Err(DocumentError::DanglingTarget {
                        from: id.clone(),
                        target: choice.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Passage ids not reachable from the entry point. Authoring debris,
    /// reported by the linter; never an execution error.
    pub fn unreachable_passages(&self) -> Vec<PassageId> {
        let mut visited: Vec<&PassageId> = Vec::new();
        let mut stack = vec![&self.entry];
        while let Some(id) = stack.pop() {
            if visited.contains(&id) {
                continue;
            }
            visited.push(id);
            if let Some(passage) = self.passages.get(id) {
                for choice in &passage.choices {
                    stack.push(&choice.target);
                }
            }
        }
        let mut missing: Vec<PassageId> = self
            .passages
            .keys()
            .filter(|id| !visited.contains(id))
            .cloned()
            .collect();
        missing.sort_by(|a, b| a.0.cmp(&b.0));
        missing
    }

    /// Names assigned somewhere in the graph but absent from the declared
    /// variable table. Linter material, tolerated at runtime.
    pub fn undeclared_assignments(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for passage in self.passages.values() {
            for step in &passage.steps {
                if let Step::Assign { name, .. } = step {
                    if !self.variables.contains_key(name) && !names.contains(name) {
                        names.push(name.clone());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_passage_doc() -> StoryDocument {
        StoryDocument::parse_ron(
            r#"(
                entry: PassageId("start"),
                variables: { "combat": Number(10.0) },
                passages: {
                    PassageId("start"): (
                        steps: [Text("Hello")],
                        choices: [(text: "Onward", target: PassageId("end"))],
                    ),
                    PassageId("end"): (
                        steps: [Text("Goodbye")],
                        choices: [],
                    ),
                },
            )"#,
        )
        .unwrap()
    }

    #[test]
    fn parse_minimal_document() {
        let doc = two_passage_doc();
        assert_eq!(doc.entry, PassageId::new("start"));
        assert_eq!(doc.passages.len(), 2);
        assert_eq!(doc.variables["combat"], Value::Number(10.0));
    }

    #[test]
    fn parse_assign_step() {
        let doc = StoryDocument::parse_ron(
            r#"(
                entry: PassageId("a"),
                passages: {
                    PassageId("a"): (
                        steps: [Assign(name: "combat", op: Add, value: Number(5.0))],
                        choices: [],
                    ),
                },
            )"#,
        )
        .unwrap();
        let passage = &doc.passages[&PassageId::new("a")];
        assert_eq!(
            passage.steps[0],
            Step::Assign {
                name: "combat".to_string(),
                op: AssignOp::Add,
                value: Value::Number(5.0),
            }
        );
    }

    #[test]
    fn validate_ok() {
        assert!(two_passage_doc().validate().is_ok());
    }

    #[test]
    fn validate_missing_entry() {
        let mut doc = two_passage_doc();
        doc.entry = PassageId::new("nowhere");
        assert!(matches!(
            doc.validate(),
            Err(DocumentError::MissingEntry(id)) if id == PassageId::new("nowhere")
        ));
    }

    #[test]
    fn validate_dangling_target() {
        let mut doc = two_passage_doc();
        doc.passages
            .get_mut(&PassageId::new("start"))
            .unwrap()
            .choices
            .push(ChoiceDef {
                text: "Secret door".to_string(),
                target: PassageId::new("missing"),
            });
        assert!(matches!(
            doc.validate(),
            Err(DocumentError::DanglingTarget { target, .. })
                if target == PassageId::new("missing")
        ));
    }

    #[test]
    fn unreachable_passages_found() {
        let mut doc = two_passage_doc();
        doc.passages.insert(
            PassageId::new("orphan"),
            Passage {
                steps: vec![Step::Text("never shown".to_string())],
                choices: vec![],
            },
        );
        assert_eq!(doc.unreachable_passages(), vec![PassageId::new("orphan")]);
    }

    #[test]
    fn unreachable_empty_for_connected_graph() {
        assert!(two_passage_doc().unreachable_passages().is_empty());
    }

    #[test]
    fn undeclared_assignments_found() {
        let doc = StoryDocument::parse_ron(
            r#"(
                entry: PassageId("a"),
                variables: { "declared": Number(0.0) },
                passages: {
                    PassageId("a"): (
                        steps: [
                            Assign(name: "declared", op: Set, value: Number(1.0)),
                            Assign(name: "phantom", op: Set, value: Number(1.0)),
                        ],
                        choices: [],
                    ),
                },
            )"#,
        )
        .unwrap();
        assert_eq!(doc.undeclared_assignments(), vec!["phantom".to_string()]);
    }

    #[test]
    fn ron_round_trip() {
        let doc = two_passage_doc();
        let serialized = ron::to_string(&doc).unwrap();
        let back: StoryDocument = ron::from_str(&serialized).unwrap();
        assert_eq!(back.entry, doc.entry);
        assert_eq!(back.passages.len(), doc.passages.len());
    }
}
