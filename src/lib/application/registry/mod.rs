//! Tools discovered on the connected host for the duration of one run.

mod catalog;

use std::collections::HashMap;
use tracing::{info, warn};

use crate::application::tooling::{ChannelError, ToolSession};
use crate::domain::{CatalogEntry, ToolDescriptor};

pub use catalog::{PLACEHOLDER_LINE, render_catalog};

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Queries the host once and indexes the readable descriptors.
    pub async fn discover<S>(session: &mut S) -> Result<Self, ChannelError>
    where
        S: ToolSession + ?Sized,
    {
        let entries = session.list_tools().await?;
        let registry = Self::from_entries(entries);
        info!(
            tools = registry.len(),
            unreadable = registry.entries.len() - registry.len(),
            "Tool discovery complete"
        );
        Ok(registry)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut index = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if let Some(descriptor) = entry.descriptor() {
                if index.contains_key(&descriptor.name) {
                    warn!(tool = %descriptor.name, "Duplicate tool name; keeping first entry");
                    continue;
                }
                index.insert(descriptor.name.clone(), position);
            }
        }
        Self { entries, index }
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index
            .get(name)
            .and_then(|position| self.entries[*position].descriptor())
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().filter_map(CatalogEntry::descriptor)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn catalog(&self) -> String {
        render_catalog(&self.entries)
    }
}
