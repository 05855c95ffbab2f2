//! Turning a user-selected image file into a data URL payload.
//!
//! Non-image files are ignored rather than reported: callers get `Ok(None)`
//! and leave the document untouched.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::mpsc::Sender;
use std::thread;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::editing::BlockId;
use crate::io::IoError;

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?P<media>[a-zA-Z0-9!#$&^_.+-]+/[a-zA-Z0-9!#$&^_.+-]+)?(?P<params>(;[^;,]*)*?)(?P<b64>;base64)?,")
        .expect("data URL pattern is valid")
});

/// Declared media type of a file, judged by its extension
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "txt" | "md" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(media_type)
}

/// Encode raw image bytes as a base64 data URL
pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    let preamble = format!("data:{media_type};base64,");
    let mut data_url = String::with_capacity(preamble.len() + bytes.len().div_ceil(3) * 4);
    data_url.push_str(&preamble);
    STANDARD.encode_string(bytes, &mut data_url);
    data_url
}

/// Read an image file into a data URL
///
/// Returns `Ok(None)` for files whose declared media type is not `image/*`.
pub fn read_image_data_url(path: &Path) -> Result<Option<String>, IoError> {
    let Some(media_type) = media_type_for_path(path).filter(|t| t.starts_with("image/")) else {
        log::debug!("Ignoring non-image file {}", path.display());
        return Ok(None);
    };
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    Ok(Some(encode_data_url(media_type, &bytes)))
}

/// Completion of a background image read
#[derive(Debug)]
pub struct ImageLoaded {
    /// Block the image was requested for; `None` appends a new image block
    pub target: Option<BlockId>,
    pub path: PathBuf,
    pub result: Result<Option<String>, IoError>,
}

/// Read an image on a background thread and post exactly one completion.
///
/// There is no cancellation: if several loads are in flight, each completion
/// is delivered and applied in the order the reads finish. For a layout the
/// first completion fills the placeholder and later ones find nothing to
/// fill; a text or image block takes whichever completion arrives last.
pub fn spawn_image_load(
    path: PathBuf,
    target: Option<BlockId>,
    completions: Sender<ImageLoaded>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let result = read_image_data_url(&path);
        let loaded = ImageLoaded {
            target,
            path,
            result,
        };
        if completions.send(loaded).is_err() {
            log::debug!("Image load finished after the editor closed");
        }
    })
}

/// Header fields of a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub media_type: Option<&'a str>,
    pub base64: bool,
    pub payload: &'a str,
}

pub fn parse_data_url(url: &str) -> Option<DataUrl<'_>> {
    let captures = DATA_URL.captures(url)?;
    let header_len = captures.get(0)?.end();
    Some(DataUrl {
        media_type: captures.name("media").map(|m| m.as_str()),
        base64: captures.name("b64").is_some(),
        payload: &url[header_len..],
    })
}
