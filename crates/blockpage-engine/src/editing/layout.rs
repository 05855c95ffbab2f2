//! Markup fragments for new blocks and the two-region layout composer.

use crate::editing::block::Orientation;

/// Default content of a new text block
pub const TEXT_STARTER: &str = "<p>Start typing...</p>";

/// Text region of a new layout block
pub const TEXT_REGION: &str = r#"<div class="w-1/2"><p>Start typing...</p></div>"#;

/// Image region awaiting content. Matched byte-for-byte when an image is bound.
pub const IMAGE_PLACEHOLDER_REGION: &str =
    r#"<div class="w-1/2"><p class="text-center text-gray-400">Click to add image</p></div>"#;

const REGION_OPEN: &str = r#"<div class="w-1/2">"#;
const REGION_CLOSE: &str = "</div>";

/// Build the initial content of a layout block
pub fn compose(orientation: Orientation) -> String {
    match orientation {
        Orientation::ImageFirst => format!("{IMAGE_PLACEHOLDER_REGION}{TEXT_REGION}"),
        Orientation::TextFirst => format!("{TEXT_REGION}{IMAGE_PLACEHOLDER_REGION}"),
    }
}

/// Image-rendering fragment for a payload (normally a data URL)
pub fn image_fragment(payload: &str) -> String {
    format!(
        r#"<img src="{}" alt="Uploaded image" class="max-w-full h-auto" />"#,
        html_escape::encode_double_quoted_attribute(payload)
    )
}

/// Layout region holding the image for a payload
pub fn filled_image_region(payload: &str) -> String {
    format!("{REGION_OPEN}{}{REGION_CLOSE}", image_fragment(payload))
}
