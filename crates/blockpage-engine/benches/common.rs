// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use blockpage_engine::{BlockKind, Document, Orientation};

#[allow(dead_code)]
pub fn generate_document(size: usize) -> Document {
    let kinds = [
        BlockKind::Text,
        BlockKind::Layout(Orientation::ImageFirst),
        BlockKind::Image,
        BlockKind::Layout(Orientation::TextFirst),
    ];

    let mut doc = Document::new();
    for i in 0..size {
        doc = doc.append(kinds[i % kinds.len()]);
    }
    doc
}

#[allow(dead_code)]
pub fn generate_filled_document(size: usize) -> Document {
    let doc = generate_document(size);
    let payload = format!("data:image/png;base64,{}", "iVBORw0KGgo".repeat(64));
    doc.ids()
        .into_iter()
        .fold(doc, |doc, id| doc.insert_image(payload.as_str(), Some(id)))
}
