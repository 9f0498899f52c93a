//! Name-keyed tool lookup with industry presets.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::builtin;
use super::tool::Tool;

/// Tool names bound when a preset key is unknown.
pub const DEFAULT_PRESET_TOOLS: &[&str] = &["get_current_time"];

/// Registry of tools available to sessions.
///
/// Built once at startup, then shared read-only behind an `Arc`.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    presets: BTreeMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool and preset.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tool in builtin::all_tools() {
            registry.register(tool);
        }
        for (key, names) in builtin::presets() {
            registry.register_preset(key, names);
        }
        registry
    }

    /// Add a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        if self.tools.insert(tool.name().to_string(), tool).is_some() {
            debug!("Replaced registered tool");
        }
        self
    }

    /// Define or replace a preset.
    pub fn register_preset<I, S>(&mut self, key: impl Into<String>, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presets
            .insert(key.into(), names.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Resolve names in order, skipping unknown names and repeated names.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<dyn Tool>> {
        let mut seen = HashSet::new();
        names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| seen.insert(*name))
            .filter_map(|name| {
                let tool = self.get(name);
                if tool.is_none() {
                    debug!(tool = name, "Ignoring unknown tool name");
                }
                tool
            })
            .collect()
    }

    /// Resolve a preset key. Unknown keys get [`DEFAULT_PRESET_TOOLS`].
    pub fn resolve_by_preset(&self, key: &str) -> Vec<Arc<dyn Tool>> {
        match self.presets.get(key) {
            Some(names) => self.resolve(names),
            None => {
                debug!(preset = key, "Unknown preset, using default tools");
                self.resolve(DEFAULT_PRESET_TOOLS)
            }
        }
    }

    /// Registered tools, sorted by name.
    pub fn tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    pub fn presets(&self) -> &BTreeMap<String, Vec<String>> {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("presets", &self.presets)
            .finish()
    }
}
