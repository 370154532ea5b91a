use serde::{Deserialize, Serialize};

/// A unit of renderable content produced by one advance cycle.
///
/// Blocks are emitted in document order; interleaved text and image
/// directives keep their relative order. The buffer is rebuilt from
/// scratch on every advance — it never accumulates across choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum OutputBlock {
    /// A run of narrative text.
    Text(String),
    /// A resolved image source URL or path.
    Image(String),
}

/// A player option as presented to the host: display text plus the
/// index to pass back into `choose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: usize,
    pub text: String,
}
