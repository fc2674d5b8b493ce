// Integration tests for reading outlines out of PDF documents
// Documents are assembled with lopdf in memory, a few are written to disk first

mod common;

use common::TestPdf;
use lopdf::{dictionary, Object, StringFormat};
use pdftoc::{
    load_toc, Destination, OutlineElement, OutlineEntry, PageResolver, PdfOutline, TocError,
    TocTree,
};

fn titles(elements: &[OutlineElement]) -> Vec<String> {
    elements
        .iter()
        .map(|element| match element {
            OutlineElement::Entry(entry) => entry.title.clone(),
            OutlineElement::Nested(children) => format!("[{}]", titles(children).join(",")),
        })
        .collect()
}

#[test]
fn test_document_without_outline() {
    let pdf = PdfOutline::from_document(TestPdf::new(2).doc);

    assert_eq!(pdf.page_count(), 2);
    assert!(pdf.parse_outline().unwrap().is_empty());
}

#[test]
fn test_nested_outline_follows_owner() {
    let mut test_pdf = TestPdf::new(5);
    let intro = test_pdf.item("Intro", 0);
    let chapter = test_pdf.item("Chapter 1", 1);
    let section_a = test_pdf.item("Section 1.1", 2);
    let section_b = test_pdf.item("Section 1.2", 3);
    let appendix = test_pdf.item("Appendix", 4);
    test_pdf.link_children(chapter, &[section_a, section_b]);
    test_pdf.set_outline(&[intro, chapter, appendix]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert_eq!(
        titles(&outline),
        vec!["Intro", "Chapter 1", "[Section 1.1,Section 1.2]", "Appendix"]
    );
}

#[test]
fn test_explicit_destinations_resolve_to_zero_based_pages() {
    let mut test_pdf = TestPdf::new(3);
    let first = test_pdf.item("First", 0);
    let last = test_pdf.item("Last", 2);
    test_pdf.set_outline(&[first, last]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let tree = TocTree::build(&pdf.parse_outline().unwrap(), &pdf).unwrap();

    let pages: Vec<i64> = tree
        .pre_order()
        .into_iter()
        .map(|id| tree.node(id).page_number)
        .collect();
    assert_eq!(pages, vec![0, 2]);
}

#[test]
fn test_goto_action_destination() {
    let mut test_pdf = TestPdf::new(4);
    let item = test_pdf.bare_item("Via action");
    let dest = vec![Object::Reference(test_pdf.pages[3]), "Fit".into()];
    test_pdf.set(
        item,
        "A",
        dictionary! {
            "S" => "GoTo",
            "D" => dest,
        },
    );
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let tree = TocTree::build(&pdf.parse_outline().unwrap(), &pdf).unwrap();

    assert_eq!(tree.node(tree.roots()[0]).page_number, 3);
}

#[test]
fn test_named_destination_from_dests_dictionary() {
    let mut test_pdf = TestPdf::new(3);
    let dest = vec![Object::Reference(test_pdf.pages[1]), "Fit".into()];
    let dests = test_pdf.doc.add_object(dictionary! {
        "chap2" => dictionary! { "D" => dest },
    });
    let catalog = test_pdf.catalog;
    test_pdf.set(catalog, "Dests", dests);

    let item = test_pdf.bare_item("Chapter 2");
    test_pdf.set(item, "Dest", Object::Name(b"chap2".to_vec()));
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();
    match &outline[0] {
        OutlineElement::Entry(entry) => {
            assert!(matches!(&entry.destination, Destination::Named(name) if name == "chap2"));
            assert_eq!(pdf.resolve_page_number(entry).unwrap(), 1);
        }
        other => panic!("expected an entry, got {:?}", other),
    }
}

#[test]
fn test_named_destination_from_name_tree_kids() {
    let mut test_pdf = TestPdf::new(3);
    let dest = vec![Object::Reference(test_pdf.pages[2]), "Fit".into()];
    let leaf = test_pdf.doc.add_object(dictionary! {
        "Names" => vec![Object::string_literal("end"), Object::Array(dest)],
    });
    let names = test_pdf.doc.add_object(dictionary! {
        "Dests" => dictionary! { "Kids" => vec![Object::Reference(leaf)] },
    });
    let catalog = test_pdf.catalog;
    test_pdf.set(catalog, "Names", names);

    let item = test_pdf.bare_item("The End");
    test_pdf.set(item, "Dest", Object::string_literal("end"));
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let tree = TocTree::build(&pdf.parse_outline().unwrap(), &pdf).unwrap();

    assert_eq!(tree.node(tree.roots()[0]).page_number, 2);
}

#[test]
fn test_items_without_destination_are_skipped() {
    let mut test_pdf = TestPdf::new(2);
    let intro = test_pdf.item("Intro", 0);
    let header = test_pdf.bare_item("Part I");
    let link = test_pdf.bare_item("Website");
    test_pdf.set(
        link,
        "A",
        dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal("https://example.com"),
        },
    );
    let appendix = test_pdf.item("Appendix", 1);
    test_pdf.set_outline(&[intro, header, link, appendix]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert_eq!(titles(&outline), vec!["Intro", "Appendix"]);
    let tree = TocTree::build(&outline, &pdf).unwrap();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_children_of_skipped_item_attach_to_previous_sibling() {
    let mut test_pdf = TestPdf::new(3);
    let intro = test_pdf.item("Intro", 0);
    let header = test_pdf.bare_item("Part I");
    let chapter = test_pdf.item("Chapter 1", 1);
    let appendix = test_pdf.item("Appendix", 2);
    test_pdf.link_children(header, &[chapter]);
    test_pdf.set_outline(&[intro, header, appendix]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let tree = TocTree::build(&pdf.parse_outline().unwrap(), &pdf).unwrap();

    let mut text = Vec::new();
    tree.write_text(&mut text).unwrap();
    assert_eq!(
        String::from_utf8(text).unwrap(),
        "Intro:0\n  Chapter 1:1\nAppendix:2\n"
    );
}

#[test]
fn test_children_of_leading_skipped_item_are_malformed() {
    let mut test_pdf = TestPdf::new(2);
    let header = test_pdf.bare_item("Part I");
    let chapter = test_pdf.item("Chapter 1", 0);
    let appendix = test_pdf.item("Appendix", 1);
    test_pdf.link_children(header, &[chapter]);
    test_pdf.set_outline(&[header, appendix]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert_eq!(titles(&outline), vec!["[Chapter 1]", "Appendix"]);
    assert!(matches!(
        TocTree::build(&outline, &pdf),
        Err(TocError::MalformedOutline { position: 0 })
    ));
}

#[test]
fn test_goto_action_wins_over_dest() {
    let mut test_pdf = TestPdf::new(3);
    // Dest points at page 0, the action at page 2
    let item = test_pdf.item("Both", 0);
    let dest = vec![Object::Reference(test_pdf.pages[2]), "Fit".into()];
    test_pdf.set(
        item,
        "A",
        dictionary! {
            "S" => "GoTo",
            "D" => dest,
        },
    );
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let tree = TocTree::build(&pdf.parse_outline().unwrap(), &pdf).unwrap();

    assert_eq!(tree.node(tree.roots()[0]).page_number, 2);
}

#[test]
fn test_dest_to_non_page_is_read_error() {
    let mut test_pdf = TestPdf::new(1);
    let item = test_pdf.bare_item("Broken");
    let catalog = test_pdf.catalog;
    let dest = vec![Object::Reference(catalog), "Fit".into()];
    test_pdf.set(item, "Dest", dest);
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert!(matches!(
        TocTree::build(&outline, &pdf),
        Err(TocError::PdfRead(_))
    ));
}

#[test]
fn test_unknown_named_destination_is_read_error() {
    let pdf = PdfOutline::from_document(TestPdf::new(1).doc);
    let entry = OutlineEntry::new("Lost", Destination::Named("nope".to_string()));

    assert!(matches!(
        pdf.resolve_page_number(&entry),
        Err(TocError::PdfRead(_))
    ));
}

#[test]
fn test_sibling_cycle_stops_walk() {
    let mut test_pdf = TestPdf::new(2);
    let a = test_pdf.item("A", 0);
    let b = test_pdf.item("B", 1);
    test_pdf.set_outline(&[a, b]);
    // B points back at A
    test_pdf.set(b, "Next", a);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert_eq!(titles(&outline), vec!["A", "B"]);
}

#[test]
fn test_utf16_title() {
    let mut test_pdf = TestPdf::new(1);
    let item = test_pdf.item("placeholder", 0);
    // "目录" in UTF-16BE with byte order mark
    let title = vec![0xFE, 0xFF, 0x76, 0xEE, 0x5F, 0x55];
    test_pdf.set(item, "Title", Object::String(title, StringFormat::Hexadecimal));
    test_pdf.set_outline(&[item]);

    let pdf = PdfOutline::from_document(test_pdf.doc);
    let outline = pdf.parse_outline().unwrap();

    assert_eq!(titles(&outline), vec!["目录"]);
}

#[test]
fn test_load_toc_from_file() {
    let mut test_pdf = TestPdf::new(3);
    let one = test_pdf.item("One", 0);
    let two = test_pdf.item("Two", 1);
    let two_a = test_pdf.item("Two A", 2);
    test_pdf.link_children(two, &[two_a]);
    test_pdf.set_outline(&[one, two]);

    let path = std::env::temp_dir().join(format!("pdftoc_load_{}.pdf", std::process::id()));
    test_pdf.doc.save(&path).expect("write test PDF");

    let tree = load_toc(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut text = Vec::new();
    tree.write_text(&mut text).unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), "One:0\nTwo:1\n  Two A:2\n");
}

#[test]
fn test_open_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("pdftoc_does_not_exist.pdf");
    let result = PdfOutline::open(&path);

    assert!(matches!(result, Err(TocError::Io(_))));
}
