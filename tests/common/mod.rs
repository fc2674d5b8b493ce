// Shared fixtures: outline builders and lopdf documents assembled in memory
#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId};
use pdftoc::{Destination, OutlineElement, OutlineEntry, PageResolver, Result, TocError};

/// Entry whose destination carries its page index directly
pub fn entry(title: &str, page: i64) -> OutlineElement {
    OutlineElement::Entry(OutlineEntry::new(
        title,
        Destination::Explicit(vec![Object::Integer(page)]),
    ))
}

pub fn nested(children: Vec<OutlineElement>) -> OutlineElement {
    OutlineElement::Nested(children)
}

/// Resolves the integer destinations produced by `entry`
pub struct IndexResolver;

impl PageResolver for IndexResolver {
    fn resolve_page_number(&self, entry: &OutlineEntry) -> Result<i64> {
        match &entry.destination {
            Destination::Explicit(items) => match items.first() {
                Some(Object::Integer(page)) => Ok(*page),
                _ => Err(TocError::PdfRead("not an index".to_string())),
            },
            _ => Err(TocError::PdfRead(format!("{} has no page", entry.title))),
        }
    }
}

/// A document with `page_count` empty pages and a catalog, ready for an outline
pub struct TestPdf {
    pub doc: Document,
    pub pages: Vec<ObjectId>,
    pub catalog: ObjectId,
}

impl TestPdf {
    pub fn new(page_count: usize) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let pages: Vec<ObjectId> = (0..page_count)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => pages.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
                "Count" => page_count as i64,
            }),
        );

        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        Self { doc, pages, catalog }
    }

    /// Outline item pointing at page `page` with an explicit `/Fit` destination
    pub fn item(&mut self, title: &str, page: usize) -> ObjectId {
        let dest = vec![Object::Reference(self.pages[page]), "Fit".into()];
        self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Dest" => dest,
        })
    }

    /// Outline item with only a title, destination keys left to the caller
    pub fn bare_item(&mut self, title: &str) -> ObjectId {
        self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        })
    }

    pub fn set(&mut self, id: ObjectId, key: &str, value: impl Into<Object>) {
        self.doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .expect("dictionary object")
            .set(key, value);
    }

    /// Chain `items` as siblings under `parent` through /First, /Last and /Next
    pub fn link_children(&mut self, parent: ObjectId, items: &[ObjectId]) {
        let (Some(&first), Some(&last)) = (items.first(), items.last()) else {
            return;
        };
        self.set(parent, "First", first);
        self.set(parent, "Last", last);
        for pair in items.windows(2) {
            self.set(pair[0], "Next", pair[1]);
            self.set(pair[1], "Prev", pair[0]);
        }
        for &item in items {
            self.set(item, "Parent", parent);
        }
    }

    /// Install an /Outlines dictionary whose top level is `items`
    pub fn set_outline(&mut self, items: &[ObjectId]) -> ObjectId {
        let outlines = self.doc.add_object(dictionary! {
            "Type" => "Outlines",
        });
        self.link_children(outlines, items);
        let catalog = self.catalog;
        self.set(catalog, "Outlines", outlines);
        outlines
    }
}
