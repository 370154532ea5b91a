/// The advance engine: deterministic traversal of a compiled story
/// document, one passage per advance, blocking at branch points.
///
/// The host calls `advance()` exactly once after construction and
/// exactly once after each `choose()`; the state machine enforces that
/// contract rather than trusting the caller.

use std::collections::HashMap;
use thiserror::Error;

use crate::core::output::{Choice, OutputBlock};
use crate::core::policy::EnginePolicy;
use crate::core::state::{ExecutionState, Status, TypeMismatch};
use crate::core::tags::{SideEffectHandler, TagDispatcher};
use crate::schema::document::{DocumentError, Passage, Step, StoryDocument};
use crate::schema::value::Value;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error("choice index {index} out of range (have {len} choices)")]
    ChoiceOutOfRange { index: usize, len: usize },
    #[error("'{op}' called while {status}")]
    InvalidState { op: &'static str, status: &'static str },
    #[error("'Add' assignment to '{name}' mixes number and string")]
    TypeMismatch { name: String },
}

impl From<TypeMismatch> for EngineError {
    fn from(err: TypeMismatch) -> Self {
        Self::TypeMismatch { name: err.name }
    }
}

/// What one advance cycle produced: the fresh output buffer and the
/// choices now pending. Empty choices means the story has ended.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    pub blocks: Vec<OutputBlock>,
    pub choices: Vec<Choice>,
}

impl AdvanceOutcome {
    pub fn is_end(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A single story session. Built via `StoryEngine::builder(document)`.
pub struct StoryEngine {
    document: StoryDocument,
    state: ExecutionState,
    dispatcher: TagDispatcher,
    policy: EnginePolicy,
    blocks: Vec<OutputBlock>,
}

/// Builder for constructing a `StoryEngine`.
pub struct StoryEngineBuilder {
    document: StoryDocument,
    policy: EnginePolicy,
    handlers: Vec<(String, SideEffectHandler)>,
}

impl StoryEngine {
    pub fn builder(document: StoryDocument) -> StoryEngineBuilder {
        StoryEngineBuilder {
            document,
            policy: EnginePolicy::default(),
            handlers: Vec::new(),
        }
    }

    /// Traverse from the cursor to the next branch point (or the end of
    /// the graph), rebuilding the output buffer from scratch.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, EngineError> {
        if self.state.status() != Status::Ready {
            return Err(EngineError::InvalidState {
                op: "advance",
                status: self.state.status().label(),
            });
        }

        let passage = self.current_passage()?.clone();
        let mut blocks = Vec::new();
        for step in &passage.steps {
            match step {
                Step::Text(text) => blocks.push(OutputBlock::Text(text.clone())),
                Step::Tag(raw) => self.dispatcher.dispatch(raw, &mut blocks),
                Step::Assign { name, op, value } => {
                    self.state.apply_assign(name, *op, value)?;
                }
            }
        }

        self.state.pending_choices = passage.choices.clone();
        self.state.status = if passage.choices.is_empty() {
            Status::Exhausted
        } else {
            Status::AwaitingChoice
        };
        self.blocks = blocks;

        Ok(AdvanceOutcome {
            blocks: self.blocks.clone(),
            choices: self.choices(),
        })
    }

    /// Take the choice at `index`. Moves the cursor to the choice's
    /// target and clears the buffer; produces no output itself — the
    /// host calls `advance()` next. An out-of-range index leaves every
    /// piece of state untouched.
    pub fn choose(&mut self, index: usize) -> Result<(), EngineError> {
        if self.state.status() != Status::AwaitingChoice {
            return Err(EngineError::InvalidState {
                op: "choose",
                status: self.state.status().label(),
            });
        }
        let len = self.state.pending_choices.len();
        if index >= len {
            return Err(EngineError::ChoiceOutOfRange { index, len });
        }

        self.state.cursor = self.state.pending_choices[index].target.clone();
        self.state.pending_choices.clear();
        self.blocks.clear();
        self.state.status = Status::Ready;
        Ok(())
    }

    /// Register a side-effect handler after construction. Same registry
    /// the builder writes into.
    pub fn register_effect<F>(&mut self, prefix: impl Into<String>, handler: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.dispatcher.register(prefix, Box::new(handler));
    }

    /// The buffer produced by the most recent `advance()`.
    pub fn output_blocks(&self) -> &[OutputBlock] {
        &self.blocks
    }

    /// The currently pending choices, indexed for `choose`.
    pub fn choices(&self) -> Vec<Choice> {
        self.state
            .pending_choices
            .iter()
            .enumerate()
            .map(|(index, def)| Choice {
                index,
                text: def.text.clone(),
            })
            .collect()
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn is_finished(&self) -> bool {
        self.state.status() == Status::Exhausted
    }

    /// Current values for the requested variable names. Names with no
    /// binding are omitted.
    pub fn variable_snapshot(&self, names: &[&str]) -> HashMap<String, Value> {
        let mut snapshot = HashMap::new();
        for name in names {
            if let Some(value) = self.state.variable(name) {
                snapshot.insert((*name).to_string(), value.clone());
            }
        }
        snapshot
    }

    /// The policy's stat set in declaration order, for HUD display.
    /// Recomputed on demand; never independently mutated.
    pub fn stat_projection(&self) -> Vec<(String, Value)> {
        self.policy
            .stats
            .iter()
            .filter_map(|name| {
                self.state
                    .variable(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    fn current_passage(&self) -> Result<&Passage, EngineError> {
        let cursor = &self.state.cursor;
        self.document
            .passages
            .get(cursor)
            .ok_or_else(|| EngineError::Document(DocumentError::UnknownPassage(cursor.clone())))
    }
}

impl std::fmt::Debug for StoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryEngine")
            .field("status", &self.state.status())
            .field("cursor", &self.state.cursor)
            .field("pending_choices", &self.state.pending_choices.len())
            .finish()
    }
}

impl StoryEngineBuilder {
    pub fn policy(mut self, policy: EnginePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Wire a side-effect directive prefix (e.g. `"mint"`) to a host
    /// callback. The callback receives the trimmed payload.
    pub fn on_effect<F>(mut self, prefix: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.handlers.push((prefix.into(), Box::new(handler)));
        self
    }

    /// Validate the document and construct the engine in `Ready` state.
    pub fn build(self) -> Result<StoryEngine, EngineError> {
        self.document.validate()?;
        let state = ExecutionState::from_document(&self.document);
        let mut dispatcher = TagDispatcher::new(self.policy.storage_hosts.clone());
        for (prefix, handler) in self.handlers {
            dispatcher.register(prefix, handler);
        }
        Ok(StoryEngine {
            document: self.document,
            state,
            dispatcher,
            policy: self.policy,
            blocks: Vec::new(),
        })
    }
}
