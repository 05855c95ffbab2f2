//! Placeholder matching for image binding.
//!
//! A layout block's content is a run of top-level `<div ...>...</div>`
//! regions. Only a whole top-level region equal to
//! [`IMAGE_PLACEHOLDER_REGION`] counts as a placeholder; the same text nested
//! inside a user-edited region is left alone.

use std::ops::Range;

use crate::editing::layout::{IMAGE_PLACEHOLDER_REGION, filled_image_region};

/// Byte ranges of the top-level `div` regions in `content`, in order.
///
/// Unterminated regions are not reported.
pub fn top_level_regions(content: &str) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut pos = 0;

    while let Some(offset) = content[pos..].find('<') {
        let at = pos + offset;
        let rest = &content[at..];

        if is_tag(rest, "<div") {
            if depth == 0 {
                start = at;
            }
            depth += 1;
            pos = at + "<div".len();
        } else if is_tag(rest, "</div") {
            let Some(close) = rest.find('>') else {
                break;
            };
            pos = at + close + 1;
            match depth {
                // stray closing tag between regions
                0 => {}
                1 => {
                    depth = 0;
                    regions.push(start..pos);
                }
                _ => depth -= 1,
            }
        } else {
            pos = at + 1;
        }
    }

    regions
}

fn is_tag(rest: &str, name: &str) -> bool {
    rest.starts_with(name)
        && matches!(
            rest.as_bytes().get(name.len()),
            Some(b' ' | b'>' | b'/' | b'\t' | b'\n' | b'\r')
        )
}

/// Range of the first top-level region that is exactly the image placeholder
pub fn find_placeholder(content: &str) -> Option<Range<usize>> {
    top_level_regions(content)
        .into_iter()
        .find(|region| &content[region.clone()] == IMAGE_PLACEHOLDER_REGION)
}

pub fn has_placeholder(content: &str) -> bool {
    find_placeholder(content).is_some()
}

/// Replace the placeholder region with the image region for `payload`.
///
/// Every byte outside the placeholder region is preserved. Returns `None`
/// when there is no placeholder left to fill.
pub fn fill_placeholder(content: &str, payload: &str) -> Option<String> {
    let region = find_placeholder(content)?;
    let image_region = filled_image_region(payload);

    let mut filled = String::with_capacity(content.len() - region.len() + image_region.len());
    filled.push_str(&content[..region.start]);
    filled.push_str(&image_region);
    filled.push_str(&content[region.end..]);
    Some(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::block::Orientation;
    use crate::editing::layout::{TEXT_REGION, compose};

    #[test]
    fn test_regions_of_composed_layout() {
        let content = compose(Orientation::ImageFirst);
        let regions = top_level_regions(&content);

        assert_eq!(regions.len(), 2);
        assert_eq!(&content[regions[0].clone()], IMAGE_PLACEHOLDER_REGION);
        assert_eq!(&content[regions[1].clone()], TEXT_REGION);
    }

    #[test]
    fn test_nested_divs_stay_in_one_region() {
        let content = r#"<div class="w-1/2"><div><p>a</p></div></div><div class="w-1/2">b</div>"#;
        let regions = top_level_regions(content);

        assert_eq!(regions.len(), 2);
        assert_eq!(
            &content[regions[0].clone()],
            r#"<div class="w-1/2"><div><p>a</p></div></div>"#
        );
    }

    #[test]
    fn test_unterminated_region_is_ignored() {
        let content = r#"<div class="w-1/2"><p>a</p>"#;
        assert!(top_level_regions(content).is_empty());
    }

    #[test]
    fn test_divider_tag_is_not_a_div() {
        let content = "<divider></divider><p>x</p>";
        assert!(top_level_regions(content).is_empty());
    }

    #[test]
    fn test_fill_text_first_layout_keeps_text_region() {
        let content = compose(Orientation::TextFirst);
        let filled = fill_placeholder(&content, "DATA1").unwrap();

        assert!(filled.starts_with(TEXT_REGION));
        assert!(filled.ends_with(&filled_image_region("DATA1")));
    }

    #[test]
    fn test_fill_keeps_whitespace_between_regions() {
        let content = format!("{IMAGE_PLACEHOLDER_REGION}\n  {TEXT_REGION}");
        let filled = fill_placeholder(&content, "DATA1").unwrap();

        assert_eq!(
            filled,
            format!("{}\n  {TEXT_REGION}", filled_image_region("DATA1"))
        );
    }

    #[test]
    fn test_nested_placeholder_text_is_not_matched() {
        let content = format!(r#"<div class="w-1/2"><p>note</p>{IMAGE_PLACEHOLDER_REGION}</div>"#);
        assert_eq!(fill_placeholder(&content, "DATA1"), None);
    }

    #[test]
    fn test_placeholder_text_outside_a_region_is_not_matched() {
        let content = "<p>Click to add image</p>";
        assert!(!has_placeholder(content));
    }

    #[test]
    fn test_filled_layout_has_no_placeholder() {
        let filled = fill_placeholder(&compose(Orientation::ImageFirst), "DATA1").unwrap();
        assert_eq!(fill_placeholder(&filled, "DATA2"), None);
    }
}
