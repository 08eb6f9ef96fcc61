//! Unified diff preview for `clawboot patch-config --dry-run`.

use similar::TextDiff;

use clawboot_core::paths::CONFIG_FILE;

use crate::document::Document;

/// Render the pending patch as a unified diff, or `None` when the patch
/// would change nothing. No files are written.
pub fn preview(before: &Document, after: &Document) -> Option<String> {
    let old = render(before);
    let new = render(after);
    if old == new {
        return None;
    }

    let old_header = format!("a/{CONFIG_FILE}");
    let new_header = format!("b/{CONFIG_FILE}");
    Some(
        TextDiff::from_lines(&old, &new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string(),
    )
}

fn render(doc: &Document) -> String {
    let mut pretty = serde_json::to_string_pretty(doc.as_value())
        .unwrap_or_else(|_| String::from("{}"));
    pretty.push('\n');
    pretty
}
