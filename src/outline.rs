use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Result, TocError};

/// Outlines nested deeper than this are cut off
const MAX_DEPTH: usize = 64;

/// One element of a nested outline: an entry, or the children of the entry right before it
#[derive(Debug, Clone)]
pub enum OutlineElement {
    Entry(OutlineEntry),
    Nested(Vec<OutlineElement>),
}

/// Title of an outline item plus its still unresolved jump target
#[derive(Debug, Clone)]
pub struct OutlineEntry {
    pub title: String,
    pub destination: Destination,
}

#[derive(Debug, Clone)]
pub enum Destination {
    /// Destination array, `[page_ref /Fit ...]`
    Explicit(Vec<Object>),
    /// Named destination looked up through the catalog
    Named(String),
    Missing,
}

impl OutlineEntry {
    pub fn new(title: impl Into<String>, destination: Destination) -> Self {
        Self {
            title: title.into(),
            destination,
        }
    }
}

/// Turns an outline entry into the zero-based index of the page it points at
pub trait PageResolver {
    fn resolve_page_number(&self, entry: &OutlineEntry) -> Result<i64>;
}

/// A loaded PDF document, read for its outline and page tree
pub struct PdfOutline {
    document: Document,
    page_indices: HashMap<ObjectId, i64>,
}

impl PdfOutline {
    /// Load a PDF file. The file handle is released before this returns.
    pub fn open(path: &Path) -> Result<Self> {
        let document = {
            let file = File::open(path)?;
            Document::load_from(file)?
        };
        debug!("Loaded {} ({} objects)", path.display(), document.objects.len());
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: Document) -> Self {
        // lopdf numbers pages from 1
        let page_indices = document
            .get_pages()
            .into_iter()
            .map(|(number, id)| (id, i64::from(number) - 1))
            .collect();

        Self {
            document,
            page_indices,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_indices.len()
    }

    /// Read the outline as a nested sequence, children following their owning entry
    pub fn parse_outline(&self) -> Result<Vec<OutlineElement>> {
        let catalog = self.catalog()?;

        let outlines = match catalog.get(b"Outlines") {
            Ok(obj) => self.resolve(obj)?,
            Err(_) => {
                debug!("Document has no outline");
                return Ok(Vec::new());
            }
        };
        let outlines = outlines
            .as_dict()
            .map_err(|_| TocError::PdfRead("/Outlines is not a dictionary".to_string()))?;

        match outlines.get(b"First") {
            Ok(Object::Reference(first)) => self.walk_siblings(*first, 0),
            _ => Ok(Vec::new()),
        }
    }

    fn walk_siblings(&self, first: ObjectId, depth: usize) -> Result<Vec<OutlineElement>> {
        let mut elements = Vec::new();
        if depth >= MAX_DEPTH {
            warn!("Outline nested deeper than {} levels, ignoring the rest", MAX_DEPTH);
            return Ok(elements);
        }

        let mut visited = HashSet::new();
        let mut current = Some(first);

        while let Some(id) = current {
            if !visited.insert(id) {
                warn!("Outline item {:?} links back to an earlier sibling", id);
                break;
            }

            let item = self
                .document
                .get_object(id)
                .and_then(Object::as_dict)
                .map_err(|e| TocError::PdfRead(format!("outline item {:?}: {}", id, e)))?;

            let title = match item.get(b"Title") {
                Ok(obj) => decode_text(self.resolve(obj)?),
                Err(_) => String::new(),
            };
            // Items without a destination (headers, URI actions) are dropped, their
            // children still follow and attach to the previous sibling
            match self.destination_of(item)? {
                Destination::Missing => {
                    debug!("Skipping outline item '{}' without destination", title);
                }
                destination => {
                    elements.push(OutlineElement::Entry(OutlineEntry { title, destination }));
                }
            }

            if let Ok(Object::Reference(child)) = item.get(b"First") {
                let children = self.walk_siblings(*child, depth + 1)?;
                if !children.is_empty() {
                    elements.push(OutlineElement::Nested(children));
                }
            }

            current = match item.get(b"Next") {
                Ok(Object::Reference(next)) => Some(*next),
                _ => None,
            };
        }

        Ok(elements)
    }

    /// The `/D` of a `/GoTo` action first, then `/Dest`
    fn destination_of(&self, item: &Dictionary) -> Result<Destination> {
        if let Ok(action) = item.get(b"A") {
            if let Ok(action) = self.resolve(action)?.as_dict() {
                let is_goto = matches!(action.get(b"S"), Ok(Object::Name(name)) if name == b"GoTo");
                if is_goto {
                    if let Ok(dest) = action.get(b"D") {
                        return Ok(self.to_destination(self.resolve(dest)?));
                    }
                }
            }
        }

        if let Ok(dest) = item.get(b"Dest") {
            return Ok(self.to_destination(self.resolve(dest)?));
        }

        Ok(Destination::Missing)
    }

    fn to_destination(&self, obj: &Object) -> Destination {
        match obj {
            Object::Array(items) => Destination::Explicit(items.clone()),
            Object::String(bytes, _) => Destination::Named(decode_bytes(bytes)),
            Object::Name(name) => Destination::Named(String::from_utf8_lossy(name).into_owned()),
            _ => Destination::Missing,
        }
    }

    fn page_of_array(&self, items: &[Object]) -> Result<i64> {
        match items.first() {
            Some(Object::Reference(page)) => self.page_indices.get(page).copied().ok_or_else(|| {
                TocError::PdfRead(format!("destination points at {:?}, which is not a page", page))
            }),
            // Remote-style destinations carry the page index directly
            Some(Object::Integer(index)) if *index >= 0 => Ok(*index),
            _ => Err(TocError::PdfRead("destination array has no page".to_string())),
        }
    }

    fn lookup_named(&self, name: &str) -> Result<i64> {
        let catalog = self.catalog()?;

        if let Ok(names) = catalog.get(b"Names") {
            if let Ok(names) = self.resolve(names)?.as_dict() {
                if let Ok(tree) = names.get(b"Dests") {
                    if let Ok(tree) = self.resolve(tree)?.as_dict() {
                        if let Some(target) = self.search_name_tree(tree, name.as_bytes(), 0)? {
                            return self.page_of_named_target(target);
                        }
                    }
                }
            }
        }

        if let Ok(dests) = catalog.get(b"Dests") {
            if let Ok(dests) = self.resolve(dests)?.as_dict() {
                if let Ok(target) = dests.get(name.as_bytes()) {
                    return self.page_of_named_target(target);
                }
            }
        }

        Err(TocError::PdfRead(format!("named destination '{}' not found", name)))
    }

    fn search_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &[u8],
        depth: usize,
    ) -> Result<Option<&'a Object>> {
        if depth >= MAX_DEPTH {
            return Ok(None);
        }

        if let Ok(names) = node.get(b"Names") {
            if let Ok(pairs) = self.resolve(names)?.as_array() {
                for pair in pairs.chunks(2) {
                    if let [Object::String(name, _), value] = pair {
                        if name.as_slice() == key {
                            return Ok(Some(value));
                        }
                    }
                }
            }
        }

        if let Ok(kids) = node.get(b"Kids") {
            if let Ok(kids) = self.resolve(kids)?.as_array() {
                for kid in kids {
                    if let Ok(kid) = self.resolve(kid)?.as_dict() {
                        if let Some(found) = self.search_name_tree(kid, key, depth + 1)? {
                            return Ok(Some(found));
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// A named target is either a destination array or a dictionary holding one under `/D`
    fn page_of_named_target(&self, target: &Object) -> Result<i64> {
        match self.resolve(target)? {
            Object::Array(items) => self.page_of_array(items),
            Object::Dictionary(dict) => match dict.get(b"D") {
                Ok(dest) => match self.resolve(dest)? {
                    Object::Array(items) => self.page_of_array(items),
                    _ => Err(TocError::PdfRead("named destination /D is not an array".to_string())),
                },
                Err(_) => Err(TocError::PdfRead("named destination has no /D".to_string())),
            },
            _ => Err(TocError::PdfRead("unsupported named destination".to_string())),
        }
    }

    fn catalog(&self) -> Result<&Dictionary> {
        let root = self
            .document
            .trailer
            .get(b"Root")
            .map_err(|_| TocError::PdfRead("trailer has no /Root".to_string()))?;
        self.resolve(root)?
            .as_dict()
            .map_err(|_| TocError::PdfRead("/Root is not a dictionary".to_string()))
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.document.get_object(*id)?),
            other => Ok(other),
        }
    }
}

impl PageResolver for PdfOutline {
    fn resolve_page_number(&self, entry: &OutlineEntry) -> Result<i64> {
        match &entry.destination {
            Destination::Explicit(items) => self.page_of_array(items),
            Destination::Named(name) => self.lookup_named(name),
            Destination::Missing => Err(TocError::PdfRead(format!(
                "outline entry '{}' has no destination",
                entry.title
            ))),
        }
    }
}

fn decode_text(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => decode_bytes(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        _ => String::new(),
    }
}

/// UTF-16BE when the byte order mark is present, otherwise one char per byte
fn decode_bytes(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
