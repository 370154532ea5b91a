/// Tag interpreter — classifies and dispatches inline tag directives.
///
/// Directives ride alongside narrative text as `"<prefix>:<payload>"`
/// strings. The prefix before the first colon selects a handler:
/// `image` is a built-in rendering directive that contributes to the
/// output buffer; host-registered prefixes (e.g. `mint`) fire a side
/// effect and produce no output; anything else is silently dropped so
/// newer authoring-tool tags never break older runtimes.

use rustc_hash::FxHashMap;

use crate::core::output::OutputBlock;

/// A host callback invoked with a side-effect directive's payload.
pub type SideEffectHandler = Box<dyn FnMut(&str)>;

/// Split a raw directive on the first colon. A directive without a
/// colon is a bare prefix with an empty payload. Payloads may contain
/// further colons; only the first one splits.
pub fn split_directive(raw: &str) -> (&str, &str) {
    match raw.split_once(':') {
        Some((prefix, payload)) => (prefix, payload),
        None => (raw, ""),
    }
}

/// Resolve an image payload to a renderable source.
///
/// Three-way classification, in order: a payload carrying a URI scheme
/// is used as-is; a payload naming a known storage host gets an
/// `https://` prefix; anything else is a root-relative bundled asset.
/// Lets authors mix absolute URLs, bucket keys, and local assets in one
/// document without a separate metadata field.
pub fn resolve_asset_path(payload: &str, storage_hosts: &[String]) -> String {
    let trimmed = payload.trim();
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    if storage_hosts.iter().any(|host| trimmed.contains(host.as_str())) {
        return format!("https://{trimmed}");
    }
    format!("/{trimmed}")
}

/// Registry of side-effect handlers plus the storage-host list used by
/// the built-in `image` directive.
#[derive(Default)]
pub struct TagDispatcher {
    handlers: FxHashMap<String, SideEffectHandler>,
    storage_hosts: Vec<String>,
}

impl TagDispatcher {
    pub fn new(storage_hosts: Vec<String>) -> Self {
        Self {
            handlers: FxHashMap::default(),
            storage_hosts,
        }
    }

    /// Register a side-effect handler for a prefix. Re-registering a
    /// prefix replaces the previous handler.
    pub fn register(&mut self, prefix: impl Into<String>, handler: SideEffectHandler) {
        self.handlers.insert(prefix.into(), handler);
    }

    pub fn is_registered(&self, prefix: &str) -> bool {
        self.handlers.contains_key(prefix)
    }

    /// Interpret one directive. Rendering directives append to the
    /// in-progress buffer; side-effect directives fire their handler;
    /// unrecognized prefixes do nothing.
    pub fn dispatch(&mut self, raw: &str, blocks: &mut Vec<OutputBlock>) {
        let (prefix, payload) = split_directive(raw);
        if prefix == "image" {
            let src = resolve_asset_path(payload, &self.storage_hosts);
            blocks.push(OutputBlock::Image(src));
        } else if let Some(handler) = self.handlers.get_mut(prefix) {
            handler(payload.trim());
        }
    }
}

impl std::fmt::Debug for TagDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut prefixes: Vec<&String> = self.handlers.keys().collect();
        prefixes.sort();
        f.debug_struct("TagDispatcher")
            .field("handlers", &prefixes)
            .field("storage_hosts", &self.storage_hosts)
            .finish()
    }
}
