//! Story Engine — a deterministic interpreter for compiled branching narratives.
//!
//! Walks a pre-compiled story document (passages of text, inline tag
//! directives, and variable assignments), accumulates renderable output
//! blocks, tracks live game state, and offers the player choices that
//! branch execution. Purely in-memory, synchronous, single-session.

pub mod core;
pub mod schema;
