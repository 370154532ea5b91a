//! WASM bindings for story-engine — powers the playable web demos.

use wasm_bindgen::prelude::*;

use story_engine::core::engine::StoryEngine;
use story_engine::core::output::{Choice, OutputBlock};
use story_engine::core::policy::EnginePolicy;
use story_engine::schema::document::StoryDocument;

// ---------------------------------------------------------------------------
// Embedded story data — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const RELIC_HUNT: &str = include_str!("../../story_data/relic_hunt.ron");
    pub const CASE_FILE: &str = include_str!("../../story_data/case_file.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct AdvanceInfo {
    blocks: Vec<OutputBlock>,
    choices: Vec<Choice>,
    finished: bool,
}

#[derive(serde::Serialize)]
struct StatInfo {
    name: String,
    value: String,
}

fn builtin_story(name: &str) -> Option<(&'static str, EnginePolicy)> {
    match name {
        "relic_hunt" => Some((
            data::RELIC_HUNT,
            EnginePolicy::with_stats(&["combat", "resilience", "weapon"]),
        )),
        "case_file" => Some((data::CASE_FILE, EnginePolicy::minimal())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// StorySession — the main exported struct
// ---------------------------------------------------------------------------

/// One playable story session. The page renders what `advance` returns,
/// calls `choose` with the clicked button's index, then calls `advance`
/// again — and resets its scroll position, since each result replaces
/// the previous content rather than appending to it.
#[wasm_bindgen]
pub struct StorySession {
    engine: StoryEngine,
}

#[wasm_bindgen]
impl StorySession {
    /// Open one of the embedded demo stories: "relic_hunt" or "case_file".
    #[wasm_bindgen(constructor)]
    pub fn new(story: &str) -> Result<StorySession, JsError> {
        let (source, policy) = builtin_story(story)
            .ok_or_else(|| JsError::new(&format!("Unknown story: {story}")))?;
        Self::build(source, policy)
    }

    /// Open a session over caller-supplied RON with an optional
    /// comma-separated stat list.
    pub fn from_ron(source: &str, stats: &str) -> Result<StorySession, JsError> {
        let names: Vec<&str> = stats
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        Self::build(source, EnginePolicy::with_stats(&names))
    }

    /// Wire a side-effect directive prefix (e.g. "mint") to a JS
    /// callback. The callback receives the directive payload string.
    pub fn on_effect(&mut self, prefix: &str, callback: js_sys::Function) {
        self.engine.register_effect(prefix, move |payload| {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(payload));
        });
    }

    /// Run one advance cycle. Returns JSON:
    /// `{"blocks": [{"kind": "text", "content": "..."}], "choices": [...], "finished": false}`
    pub fn advance(&mut self) -> Result<String, JsError> {
        let outcome = self
            .engine
            .advance()
            .map_err(|e| JsError::new(&format!("Advance error: {e}")))?;
        let info = AdvanceInfo {
            finished: outcome.is_end(),
            blocks: outcome.blocks,
            choices: outcome.choices,
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Take the choice at `index`. Call `advance` immediately after.
    pub fn choose(&mut self, index: usize) -> Result<(), JsError> {
        self.engine
            .choose(index)
            .map_err(|e| JsError::new(&format!("Choose error: {e}")))
    }

    /// Current stat projection as a JSON array of `{name, value}`.
    pub fn stats(&self) -> Result<String, JsError> {
        let stats: Vec<StatInfo> = self
            .engine
            .stat_projection()
            .into_iter()
            .map(|(name, value)| StatInfo {
                name,
                value: value.to_string(),
            })
            .collect();
        serde_json::to_string(&stats)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// JSON array of embedded story identifiers.
    pub fn available_stories() -> String {
        serde_json::to_string(&["relic_hunt", "case_file"]).unwrap_or_else(|_| "[]".to_string())
    }
}

// Private helpers
impl StorySession {
    fn build(source: &str, policy: EnginePolicy) -> Result<StorySession, JsError> {
        let document = StoryDocument::parse_ron(source)
            .map_err(|e| JsError::new(&format!("Document parse error: {e}")))?;
        let engine = StoryEngine::builder(document)
            .policy(policy)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(StorySession { engine })
    }
}
