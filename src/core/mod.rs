pub mod engine;
pub mod output;
pub mod policy;
pub mod state;
pub mod tags;
