/// Execution state — the interpreter's position, live variables, and
/// pending choice set. One value per session, mutated only by the engine.

use rustc_hash::FxHashMap;

use crate::schema::document::{ChoiceDef, PassageId, StoryDocument};
use crate::schema::value::{AssignOp, Value};

/// Where the session sits in its lifecycle.
///
/// `Ready` covers both a freshly constructed engine and the moment right
/// after a `choose`: the one situation in which `advance` is legal.
/// `Exhausted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    AwaitingChoice,
    Exhausted,
}

impl Status {
    /// Short label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::AwaitingChoice => "awaiting-choice",
            Self::Exhausted => "exhausted",
        }
    }
}

/// The mutable half of a story session. The document itself stays
/// immutable; everything that moves lives here.
#[derive(Debug, Clone)]
pub struct ExecutionState {
    pub(crate) cursor: PassageId,
    pub(crate) variables: FxHashMap<String, Value>,
    pub(crate) pending_choices: Vec<ChoiceDef>,
    pub(crate) status: Status,
}

impl ExecutionState {
    /// Seed a state from the document's entry point and declared
    /// variable defaults.
    pub fn from_document(document: &StoryDocument) -> Self {
        let mut variables = FxHashMap::default();
        for (name, value) in &document.variables {
            variables.insert(name.clone(), value.clone());
        }
        Self {
            cursor: document.entry.clone(),
            variables,
            pending_choices: Vec::new(),
            status: Status::Ready,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn pending_choices(&self) -> &[ChoiceDef] {
        &self.pending_choices
    }

    /// Current value of a variable, if declared or previously assigned.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Apply one assignment step. `Add` adds numbers and concatenates
    /// strings; mixing the two is a type mismatch. Assigning an
    /// undeclared name inserts it (the linter flags these at authoring
    /// time; execution stays permissive).
    pub(crate) fn apply_assign(
        &mut self,
        name: &str,
        op: AssignOp,
        operand: &Value,
    ) -> Result<(), TypeMismatch> {
        match op {
            AssignOp::Set => {
                self.variables.insert(name.to_string(), operand.clone());
                Ok(())
            }
            AssignOp::Add => match (self.variables.get(name), operand) {
                (Some(Value::Number(current)), Value::Number(delta)) => {
                    let sum = current + delta;
                    self.variables.insert(name.to_string(), Value::Number(sum));
                    Ok(())
                }
                (Some(Value::Text(current)), Value::Text(suffix)) => {
                    let joined = format!("{current}{suffix}");
                    self.variables.insert(name.to_string(), Value::Text(joined));
                    Ok(())
                }
                (None, _) => {
                    // Add to an absent variable behaves as Set.
                    self.variables.insert(name.to_string(), operand.clone());
                    Ok(())
                }
                _ => Err(TypeMismatch {
                    name: name.to_string(),
                }),
            },
        }
    }
}

/// An `Add` assignment crossed number and string. Carried up into the
/// engine's error enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::StoryDocument;

    fn doc_with_vars() -> StoryDocument {
        StoryDocument::parse_ron(
            r#"(
                entry: PassageId("start"),
                variables: {
                    "combat": Number(10.0),
                    "weapon": Text("fists"),
                },
                passages: {
                    PassageId("start"): (steps: [], choices: []),
                },
            )"#,
        )
        .unwrap()
    }

    #[test]
    fn seeded_from_document_defaults() {
        let state = ExecutionState::from_document(&doc_with_vars());
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(state.variable("combat"), Some(&Value::Number(10.0)));
        assert_eq!(
            state.variable("weapon"),
            Some(&Value::Text("fists".to_string()))
        );
        assert!(state.pending_choices().is_empty());
    }

    #[test]
    fn assign_set_replaces() {
        let mut state = ExecutionState::from_document(&doc_with_vars());
        state
            .apply_assign("weapon", AssignOp::Set, &Value::Text("sword".to_string()))
            .unwrap();
        assert_eq!(
            state.variable("weapon"),
            Some(&Value::Text("sword".to_string()))
        );
    }

    #[test]
    fn assign_add_numbers() {
        let mut state = ExecutionState::from_document(&doc_with_vars());
        state
            .apply_assign("combat", AssignOp::Add, &Value::Number(5.0))
            .unwrap();
        assert_eq!(state.variable("combat"), Some(&Value::Number(15.0)));
    }

    #[test]
    fn assign_add_strings_concatenates() {
        let mut state = ExecutionState::from_document(&doc_with_vars());
        state
            .apply_assign("weapon", AssignOp::Add, &Value::Text(" of dawn".to_string()))
            .unwrap();
        assert_eq!(
            state.variable("weapon"),
            Some(&Value::Text("fists of dawn".to_string()))
        );
    }

    #[test]
    fn assign_add_mixed_types_rejected() {
        let mut state = ExecutionState::from_document(&doc_with_vars());
        let err = state
            .apply_assign("combat", AssignOp::Add, &Value::Text("oops".to_string()))
            .unwrap_err();
        assert_eq!(err.name, "combat");
        // Original value untouched
        assert_eq!(state.variable("combat"), Some(&Value::Number(10.0)));
    }

    #[test]
    fn assign_add_to_absent_behaves_as_set() {
        let mut state = ExecutionState::from_document(&doc_with_vars());
        state
            .apply_assign("luck", AssignOp::Add, &Value::Number(3.0))
            .unwrap();
        assert_eq!(state.variable("luck"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Ready.label(), "ready");
        assert_eq!(Status::AwaitingChoice.label(), "awaiting-choice");
        assert_eq!(Status::Exhausted.label(), "exhausted");
    }
}
