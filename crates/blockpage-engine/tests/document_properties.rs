use blockpage_engine::editing::image::top_level_regions;
use blockpage_engine::editing::layout::{
    TEXT_REGION, TEXT_STARTER, filled_image_region, image_fragment,
};
use blockpage_engine::{BlockId, BlockKind, Cmd, Document, Orientation};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// Small deterministic generator so the id-combination checks are repeatable
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

const KINDS: [BlockKind; 4] = [
    BlockKind::Text,
    BlockKind::Image,
    BlockKind::Layout(Orientation::ImageFirst),
    BlockKind::Layout(Orientation::TextFirst),
];

#[fixture]
fn mixed_document() -> Document {
    let doc = KINDS
        .iter()
        .chain(KINDS.iter())
        .fold(Document::new(), |doc, kind| doc.append(*kind));
    let ids = doc.ids();
    doc.insert_image("data:image/png;base64,AAAA", Some(ids[2]))
        .update_content(ids[0], "<p>first</p>")
        .insert_image("data:image/png;base64,BBBB", None)
}

#[rstest]
fn reorder_onto_itself_is_identity(mixed_document: Document) {
    for id in mixed_document.ids() {
        assert_eq!(mixed_document.reorder(id, id), mixed_document);
    }
}

#[rstest]
fn unknown_ids_leave_document_unchanged(mixed_document: Document) {
    let missing = BlockId::new();
    let present = mixed_document.ids()[3];

    assert_eq!(mixed_document.delete(missing), mixed_document);
    assert_eq!(
        mixed_document.update_content(missing, "<p>x</p>"),
        mixed_document
    );
    assert_eq!(mixed_document.reorder(missing, present), mixed_document);
    assert_eq!(mixed_document.reorder(present, missing), mixed_document);
    assert_eq!(mixed_document.reorder(missing, BlockId::new()), mixed_document);
}

#[rstest]
fn random_reorders_keep_every_block(mixed_document: Document) {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut doc = mixed_document.clone();
    let mut expected_ids = mixed_document.ids();
    expected_ids.sort();

    for _ in 0..500 {
        let ids = doc.ids();
        let dragged = ids[rng.below(ids.len())];
        let target = ids[rng.below(ids.len())];

        let target_slot = doc.position(target).unwrap();
        let moving_down = doc.position(dragged).unwrap() < target_slot;

        let patch = doc.apply(Cmd::Reorder { dragged, target });
        let after = &patch.document;
        if dragged != target {
            // dragged takes the target's slot and the target shifts toward the vacated one
            assert_eq!(after.position(dragged), Some(target_slot));
            let shifted = if moving_down { target_slot - 1 } else { target_slot + 1 };
            assert_eq!(after.position(target), Some(shifted));
        } else {
            assert_eq!(after, &doc);
        }
        doc = patch.document;

        let mut ids_now = doc.ids();
        ids_now.sort();
        assert_eq!(ids_now, expected_ids);
    }
}

#[rstest]
fn random_deletes_remove_exactly_one(mixed_document: Document) {
    let mut rng = XorShift(42);
    let mut doc = mixed_document;

    while !doc.is_empty() {
        let ids = doc.ids();
        let id = ids[rng.below(ids.len())];
        let after = doc.delete(id);

        assert_eq!(after.len(), doc.len() - 1);
        assert!(!after.contains(id));
        let mut expected = ids.clone();
        expected.retain(|other| *other != id);
        assert_eq!(after.ids(), expected);
        doc = after;
    }
}

#[rstest]
#[case(BlockKind::Text)]
#[case(BlockKind::Image)]
#[case(BlockKind::Layout(Orientation::ImageFirst))]
#[case(BlockKind::Layout(Orientation::TextFirst))]
fn append_adds_one_block_with_a_fresh_id(mixed_document: Document, #[case] kind: BlockKind) {
    let patch = mixed_document.apply(Cmd::Append { kind });
    let new_id = patch.changed.unwrap();

    assert_eq!(patch.document.len(), mixed_document.len() + 1);
    assert!(!mixed_document.contains(new_id));
    assert_eq!(patch.document.ids().last(), Some(&new_id));
    assert_eq!(patch.document.blocks().last().unwrap().kind(), kind);
}

#[rstest]
fn storage_round_trip(mixed_document: Document) {
    let stored = mixed_document.to_storage_string().unwrap();
    assert_eq!(Document::from_storage_str(&stored), mixed_document);
}

#[rstest]
#[case("plain words")]
#[case("<h1>Legacy page</h1>\n<p>body</p>")]
#[case("[not json")]
#[case("null")]
fn raw_strings_load_as_one_text_block(#[case] raw: &str) {
    let doc = Document::from_storage_str(raw);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.blocks()[0].kind(), BlockKind::Text);
    assert_eq!(doc.blocks()[0].content(), raw);
}

#[rstest]
#[case(Orientation::ImageFirst)]
#[case(Orientation::TextFirst)]
fn binding_keeps_sibling_region_bytes(#[case] orientation: Orientation) {
    let doc = Document::new().append(BlockKind::Layout(orientation));
    let id = doc.ids()[0];
    let edited_text = r#"<div class="w-1/2"><p>My <em>own</em> caption</p></div>"#;

    // user edits the text region first
    let before_content = doc.blocks()[0]
        .content()
        .replacen(TEXT_REGION, edited_text, 1);
    let doc = doc.update_content(id, before_content.clone());

    let after = doc.insert_image("DATA1", Some(id));
    let content = after.blocks()[0].content();

    let before_regions = top_level_regions(&before_content);
    let after_regions = top_level_regions(content);
    let (text_index, image_index) = match orientation {
        Orientation::ImageFirst => (1, 0),
        Orientation::TextFirst => (0, 1),
    };
    assert_eq!(
        &content[after_regions[text_index].clone()],
        &before_content[before_regions[text_index].clone()]
    );
    assert_eq!(
        &content[after_regions[image_index].clone()],
        filled_image_region("DATA1")
    );
}

#[rstest]
fn untargeted_image_appends_at_end(mixed_document: Document) {
    let after = mixed_document.insert_image("DATA1", None);

    assert_eq!(after.len(), mixed_document.len() + 1);
    assert_eq!(&after.blocks()[..mixed_document.len()], mixed_document.blocks());
    let last = after.blocks().last().unwrap();
    assert_eq!(last.kind(), BlockKind::Image);
    assert_eq!(last.content(), image_fragment("DATA1"));
}

#[test]
fn export_wraps_layouts_by_orientation() {
    let doc = Document::new()
        .append(BlockKind::Layout(Orientation::TextFirst))
        .append(BlockKind::Layout(Orientation::ImageFirst));
    let html = doc.export_html();
    let lines: Vec<&str> = html.split('\n').collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!(
            r#"<div class="flex flex-row-reverse gap-4 my-4">{}</div>"#,
            doc.blocks()[0].content()
        )
    );
    assert_eq!(
        lines[1],
        format!(
            r#"<div class="flex gap-4 my-4">{}</div>"#,
            doc.blocks()[1].content()
        )
    );
}

#[test]
fn editing_session_scenario() {
    // Given an empty document
    let doc = Document::new();

    // When a text block and an image-first layout are added
    let doc = doc.append(BlockKind::Text);
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.blocks()[0].content(), TEXT_STARTER);
    let first = doc.ids()[0];

    let doc = doc.append(BlockKind::Layout(Orientation::ImageFirst));
    let second = doc.ids()[1];
    let layout_before = doc.blocks()[1].content().to_string();

    // And an image is bound to the layout
    let doc = doc.insert_image("DATA1", Some(second));
    let layout_after = doc.blocks()[1].content().to_string();
    let text_region = &layout_before[top_level_regions(&layout_before)[1].clone()];
    assert_eq!(
        layout_after,
        format!("{}{text_region}", filled_image_region("DATA1"))
    );

    // And the text block is dragged onto the layout
    let doc = doc.reorder(first, second);
    assert_eq!(doc.ids(), vec![second, first]);

    // Then the export has the wrapped layout followed by the text block
    assert_eq!(
        doc.export_html(),
        format!(
            "<div class=\"flex gap-4 my-4\">{layout_after}</div>\n{TEXT_STARTER}"
        )
    );
}
