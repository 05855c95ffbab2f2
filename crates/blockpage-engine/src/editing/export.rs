use crate::editing::{Block, BlockKind, Document, Orientation};

const SEPARATOR: &str = "\n";

/// Opening tag of the flex container wrapping an exported layout block.
///
/// Only the direction hint depends on orientation; the regions inside are
/// exported in stored order.
pub fn layout_container_open(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::ImageFirst => r#"<div class="flex gap-4 my-4">"#,
        Orientation::TextFirst => r#"<div class="flex flex-row-reverse gap-4 my-4">"#,
    }
}

fn export_block(block: &Block) -> String {
    match block.kind() {
        BlockKind::Text | BlockKind::Image => block.content().to_string(),
        BlockKind::Layout(orientation) => format!(
            "{}{}</div>",
            layout_container_open(orientation),
            block.content()
        ),
    }
}

impl Document {
    /// Flatten the blocks into final HTML markup, one block per line
    pub fn export_html(&self) -> String {
        self.blocks()
            .iter()
            .map(export_block)
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// Exported markup wrapped in a standalone HTML page
    pub fn export_page(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            html_escape::encode_text(title),
            self.export_html()
        )
    }
}
