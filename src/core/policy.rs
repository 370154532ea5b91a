/// Engine policy — per-story configuration that keeps one traversal
/// serving every story variant.
///
/// A stats-driven adventure projects a fixed set of variables for the
/// HUD; a plain case-file story projects none. Both run on the same
/// engine with a different policy value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Variable names projected read-only for display, in display order.
    #[serde(default)]
    pub stats: Vec<String>,
    /// Hostname substrings that mark an image payload as a remote
    /// storage key (resolved with an `https://` prefix).
    #[serde(default = "default_storage_hosts")]
    pub storage_hosts: Vec<String>,
}

fn default_storage_hosts() -> Vec<String> {
    vec!["supabase.co".to_string()]
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            stats: Vec::new(),
            storage_hosts: default_storage_hosts(),
        }
    }
}

impl EnginePolicy {
    /// Policy with no stat projection. The "case file" shape.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Policy projecting the given stat names.
    pub fn with_stats(stats: &[&str]) -> Self {
        Self {
            stats: stats.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_stats_and_supabase_host() {
        let policy = EnginePolicy::default();
        assert!(policy.stats.is_empty());
        assert_eq!(policy.storage_hosts, vec!["supabase.co".to_string()]);
    }

    #[test]
    fn with_stats_keeps_order() {
        let policy = EnginePolicy::with_stats(&["combat", "resilience", "weapon"]);
        assert_eq!(
            policy.stats,
            vec!["combat".to_string(), "resilience".to_string(), "weapon".to_string()]
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let policy: EnginePolicy = ron::from_str("(stats: [\"combat\"])").unwrap();
        assert_eq!(policy.stats, vec!["combat".to_string()]);
        assert_eq!(policy.storage_hosts, vec!["supabase.co".to_string()]);
    }
}
