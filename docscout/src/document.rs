/// Extraction of paragraph text from documents.
///
/// The search pipeline only needs one capability from a document format:
/// "give me the text of each paragraph, in order, or tell me why you can't".
/// [`DocumentReader`] is that boundary, and [`DocxReader`] implements it for
/// Office Open XML word processing files.
///
/// # The .docx Layout
///
/// A `.docx` file is a zip archive. The main story lives in the
/// `word/document.xml` part:
///
/// ```xml
/// <w:document>
///   <w:body>
///     <w:p><w:r><w:t>the hirusha </w:t></w:r><w:r><w:t>report</w:t></w:r></w:p>
///     <w:tbl>...</w:tbl>
///   </w:body>
/// </w:document>
/// ```
///
/// Only paragraphs that are direct children of `w:body` are returned; table
/// cells and other nested containers are not part of the body paragraph list.
/// A paragraph's text comes from its runs (`w:r`, directly or inside a
/// `w:hyperlink`). Within a run, `w:t` contributes its text, `w:tab` and
/// `w:ptab` render as `\t`, `w:noBreakHyphen` as `-`, and `w:br`/`w:cr` as
/// `\n` unless the break is a page or column break. Paragraph and run
/// properties, drawings and text boxes contribute nothing.
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

const DOCUMENT_PART: &str = "word/document.xml";

/// Largest main document part that will be buffered
const MAX_PART_BYTES: u64 = 256 * 1024 * 1024;

/// Source of paragraph text for a document path
pub trait DocumentReader: Send + Sync {
    /// Returns the text of every paragraph in document order
    fn paragraphs(&self, path: &Path) -> SearchResult<Vec<String>>;
}

/// Reads paragraphs out of `.docx` files
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl DocxReader {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(path: &Path) -> SearchResult<String> {
        let file = File::open(path).map_err(|e| SearchError::document_unreadable(path, e))?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| SearchError::document_unreadable(path, e))?;
        let part = archive.by_name(DOCUMENT_PART).map_err(|e| {
            SearchError::document_unreadable(path, format!("{}: {}", DOCUMENT_PART, e))
        })?;

        // Declared sizes are untrusted; no capacity hint
        let mut bytes = Vec::new();
        part.take(MAX_PART_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| SearchError::document_unreadable(path, e))?;
        if bytes.len() as u64 > MAX_PART_BYTES {
            return Err(SearchError::document_unreadable(
                path,
                format!("{} is larger than {} bytes", DOCUMENT_PART, MAX_PART_BYTES),
            ));
        }
        String::from_utf8(bytes).map_err(|e| SearchError::document_unreadable(path, e))
    }
}

impl DocumentReader for DocxReader {
    fn paragraphs(&self, path: &Path) -> SearchResult<Vec<String>> {
        trace!("Reading paragraphs from: {}", path.display());
        let xml = Self::read_document_part(path)?;
        parse_body_paragraphs(&xml).map_err(|reason| SearchError::document_unreadable(path, reason))
    }
}

/// Tracks where the parser is relative to `w:body`, the open paragraph and the
/// open run. Every `*_depth` is the element depth at which that element opened.
#[derive(Default)]
struct ParagraphCollector {
    depth: usize,
    body_depth: Option<usize>,
    paragraph_depth: Option<usize>,
    hyperlink_depth: Option<usize>,
    run_depth: Option<usize>,
    text_depth: Option<usize>,
    current: String,
    paragraphs: Vec<String>,
}

impl ParagraphCollector {
    fn at_body_level(&self) -> bool {
        self.body_depth.is_some_and(|body| body + 1 == self.depth)
    }

    /// Whether an element opening at `depth` is a run of the current paragraph
    fn is_paragraph_run(&self, depth: usize) -> bool {
        self.run_depth.is_none()
            && (self.paragraph_depth == Some(depth - 1) || self.hyperlink_depth == Some(depth - 1))
    }

    fn start(&mut self, element: &BytesStart<'_>) {
        self.depth += 1;
        let depth = self.depth;
        match element.local_name().as_ref() {
            b"body" if self.body_depth.is_none() => self.body_depth = Some(depth),
            b"p" if self.paragraph_depth.is_none() && self.at_body_level() => {
                self.paragraph_depth = Some(depth);
                self.current.clear();
            }
            b"hyperlink" if self.paragraph_depth == Some(depth - 1) => {
                self.hyperlink_depth = Some(depth)
            }
            b"r" if self.is_paragraph_run(depth) => self.run_depth = Some(depth),
            b"t" if self.run_depth == Some(depth - 1) => self.text_depth = Some(depth),
            _ if self.run_depth == Some(depth - 1) => self.run_content(element),
            _ => {}
        }
    }

    fn empty(&mut self, element: &BytesStart<'_>) {
        // Self-closing elements never change depth
        match element.local_name().as_ref() {
            b"p" if self.paragraph_depth.is_none() && self.body_depth == Some(self.depth) => {
                self.paragraphs.push(String::new());
            }
            _ if self.run_depth == Some(self.depth) => self.run_content(element),
            _ => {}
        }
    }

    /// Inline content of a run other than `w:t`
    fn run_content(&mut self, element: &BytesStart<'_>) {
        match element.local_name().as_ref() {
            b"tab" | b"ptab" => self.current.push('\t'),
            b"noBreakHyphen" => self.current.push('-'),
            b"br" if is_layout_break(element) => {}
            b"br" | b"cr" => self.current.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self) {
        let depth = Some(self.depth);
        if self.text_depth == depth {
            self.text_depth = None;
        }
        if self.run_depth == depth {
            self.run_depth = None;
        }
        if self.hyperlink_depth == depth {
            self.hyperlink_depth = None;
        }
        if self.paragraph_depth == depth {
            self.paragraphs.push(std::mem::take(&mut self.current));
            self.paragraph_depth = None;
        }
        if self.body_depth == depth {
            self.body_depth = None;
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        if self.text_depth.is_some() {
            self.current.push_str(text);
        }
    }
}

/// Page and column breaks end a layout unit rather than a line
fn is_layout_break(element: &BytesStart<'_>) -> bool {
    element.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"type"
            && matches!(attr.value.as_ref(), b"page" | b"column")
    })
}

/// Parses WordprocessingML and returns the text of each body paragraph
pub(crate) fn parse_body_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut collector = ParagraphCollector::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => collector.start(&e),
            Ok(Event::Empty(e)) => collector.empty(&e),
            Ok(Event::End(_)) => collector.end(),
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                collector.text(&text);
            }
            Ok(Event::CData(c)) => collector.text(&String::from_utf8_lossy(&c)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
        }
    }

    Ok(collector.paragraphs)
}
