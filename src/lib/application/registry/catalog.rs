use crate::domain::CatalogEntry;

pub const PLACEHOLDER_LINE: &str = "Error processing tool";

/// One line per entry: `index. name(param: type, ...) - description`.
pub fn render_catalog(entries: &[CatalogEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let number = position + 1;
            match entry {
                CatalogEntry::Tool(descriptor) => {
                    format!("{number}. {} - {}", descriptor.signature(), descriptor.description)
                }
                CatalogEntry::Unreadable { .. } => format!("{number}. {PLACEHOLDER_LINE}"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
