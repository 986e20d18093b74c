//! Paginated Document Writer — a top-to-bottom text cursor over a `lopdf::Document`.
//!
//! The writer appends pages to an existing document and never touches the pages
//! that were already there. Each draw call checks for vertical space first and
//! starts a new page when the next line would cross the bottom margin, so nothing
//! is ever drawn below `margin`.
//!
//! Operations for the active page are buffered and written as that page's content
//! stream when the cursor moves to a new page or `finish` is called.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::layout::font_metrics::{encode_win_ansi, get_metrics, StandardFont};
use crate::layout::wrap::wrap_lines;
use crate::render::RenderError;

/// A4 in points, used when no page size can be read from the document.
pub const A4_SIZE: (f32, f32) = (595.28, 841.89);

/// Space consumed after a heading.
const HEADING_TRAILING: f32 = 8.0;
/// Space consumed after each body line, and once more after each paragraph.
const LINE_TRAILING: f32 = 4.0;

const REGULAR_FONT_KEY: &str = "F1";
const BOLD_FONT_KEY: &str = "F2";

/// Fixed typographic settings for one document.
#[derive(Debug, Clone)]
pub struct WriterStyle {
    pub margin: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// RGB, each component 0.0 – 1.0.
    pub heading_color: [f32; 3],
    pub body_color: [f32; 3],
}

impl Default for WriterStyle {
    fn default() -> Self {
        Self {
            margin: 50.0,
            heading_size: 16.0,
            body_size: 11.0,
            heading_color: [0.1, 0.3, 0.6],
            body_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Cursor state for the page currently being written.
///
/// `cursor_y` only decreases until a page break resets it to `page_height - margin`.
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    pub page: ObjectId,
    pub cursor_y: f32,
    pub margin: f32,
    pub content_width: f32,
    pub page_width: f32,
    pub page_height: f32,
}

#[derive(Debug, Clone, Copy)]
struct FontResources {
    regular: ObjectId,
    bold: ObjectId,
}

impl FontResources {
    fn embed(doc: &mut Document) -> Self {
        let mut add = |font: StandardFont| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            })
        };
        Self {
            regular: add(StandardFont::Helvetica),
            bold: add(StandardFont::HelveticaBold),
        }
    }
}

/// Stateful writer scoped to a single render call.
pub struct DocumentWriter<'a> {
    doc: &'a mut Document,
    pages_root: ObjectId,
    fonts: FontResources,
    style: WriterStyle,
    cursor: LayoutCursor,
    ops: Vec<Operation>,
    pages_added: usize,
}

impl<'a> DocumentWriter<'a> {
    /// Appends one blank page to `doc` and positions the cursor at its top margin.
    ///
    /// The new page copies the size of the document's last page (A4 if unknown).
    pub fn append_to(doc: &'a mut Document, style: WriterStyle) -> Result<Self, RenderError> {
        let pages_root = pages_root(doc)?;
        let last_page = doc.get_pages().values().next_back().copied();
        let (page_width, page_height) = last_page
            .and_then(|id| page_size(doc, id))
            .unwrap_or(A4_SIZE);

        let fonts = FontResources::embed(doc);
        let page = add_blank_page(doc, pages_root, fonts, page_width, page_height)?;

        let cursor = LayoutCursor {
            page,
            cursor_y: page_height - style.margin,
            margin: style.margin,
            content_width: page_width - 2.0 * style.margin,
            page_width,
            page_height,
        };

        Ok(Self {
            doc,
            pages_root,
            fonts,
            style,
            cursor,
            ops: Vec::new(),
            pages_added: 1,
        })
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    /// Starts a new page when drawing `needed` more units would reach the bottom margin.
    pub fn ensure_space(&mut self, needed: f32) -> Result<(), RenderError> {
        if self.cursor.cursor_y - needed > self.cursor.margin {
            return Ok(());
        }

        self.flush_page()?;
        let page = add_blank_page(
            self.doc,
            self.pages_root,
            self.fonts,
            self.cursor.page_width,
            self.cursor.page_height,
        )?;
        self.pages_added += 1;

        let (width, height) =
            page_size(self.doc, page).unwrap_or((self.cursor.page_width, self.cursor.page_height));
        self.cursor.page = page;
        self.cursor.page_width = width;
        self.cursor.page_height = height;
        self.cursor.content_width = width - 2.0 * self.cursor.margin;
        self.cursor.cursor_y = height - self.cursor.margin;

        debug!(pages_added = self.pages_added, "fallback writer started a new page");
        Ok(())
    }

    /// Draws a bold heading at the left margin in the heading colour.
    pub fn draw_heading(&mut self, text: &str) -> Result<(), RenderError> {
        let size = self.style.heading_size;
        self.ensure_space(size + HEADING_TRAILING)?;
        self.cursor.cursor_y -= size;
        let color = self.style.heading_color;
        self.draw_text(text, self.cursor.margin, StandardFont::HelveticaBold, size, color);
        self.cursor.cursor_y -= HEADING_TRAILING;
        Ok(())
    }

    /// Wraps and draws a paragraph at body size, then adds paragraph spacing.
    pub fn draw_paragraph(&mut self, text: &str) -> Result<(), RenderError> {
        self.draw_paragraph_indented(text, 0.0)
    }

    /// Like `draw_paragraph`, shifted right by `indent` with the wrap width reduced to match.
    pub fn draw_paragraph_indented(&mut self, text: &str, indent: f32) -> Result<(), RenderError> {
        let size = self.style.body_size;
        let metrics = get_metrics(StandardFont::Helvetica);
        let max_width = (self.cursor.content_width - indent).max(0.0);
        let lines = wrap_lines(text, |s| metrics.measure_str(s), size, max_width);

        for line in &lines {
            self.body_line(line, indent, StandardFont::Helvetica)?;
        }
        self.cursor.cursor_y -= LINE_TRAILING;
        Ok(())
    }

    /// Draws body-size text, e.g. an experience header, wrapped with the metrics
    /// of the chosen font but without paragraph spacing.
    pub fn draw_text_line(&mut self, text: &str, bold: bool) -> Result<(), RenderError> {
        let font = if bold {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        };
        let metrics = get_metrics(font);
        let lines = wrap_lines(
            text,
            |s| metrics.measure_str(s),
            self.style.body_size,
            self.cursor.content_width,
        );
        for line in &lines {
            self.body_line(line, 0.0, font)?;
        }
        Ok(())
    }

    /// Writes the last page's content stream and returns how many pages were appended.
    pub fn finish(mut self) -> Result<usize, RenderError> {
        self.flush_page()?;
        Ok(self.pages_added)
    }

    fn body_line(&mut self, text: &str, indent: f32, font: StandardFont) -> Result<(), RenderError> {
        let size = self.style.body_size;
        self.ensure_space(size + LINE_TRAILING)?;
        self.cursor.cursor_y -= size;
        let color = self.style.body_color;
        self.draw_text(text, self.cursor.margin + indent, font, size, color);
        self.cursor.cursor_y -= LINE_TRAILING;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, font: StandardFont, size: f32, color: [f32; 3]) {
        let font_key = match font {
            StandardFont::Helvetica => REGULAR_FONT_KEY,
            StandardFont::HelveticaBold => BOLD_FONT_KEY,
        };
        let [r, g, b] = color;
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font_key.into(), size.into()]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Td", vec![x.into(), self.cursor.cursor_y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn flush_page(&mut self) -> Result<(), RenderError> {
        if self.ops.is_empty() {
            return Ok(());
        }
        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let stream_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        self.doc
            .get_object_mut(self.cursor.page)
            .and_then(Object::as_dict_mut)?
            .set("Contents", stream_id);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page tree helpers
// ────────────────────────────────────────────────────────────────────────────

fn pages_root(doc: &Document) -> Result<ObjectId, RenderError> {
    Ok(doc.catalog()?.get(b"Pages")?.as_reference()?)
}

fn add_blank_page(
    doc: &mut Document,
    pages_root: ObjectId,
    fonts: FontResources,
    width: f32,
    height: f32,
) -> Result<ObjectId, RenderError> {
    let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_root,
        "MediaBox" => media_box,
        "Resources" => dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT_KEY => fonts.regular,
                BOLD_FONT_KEY => fonts.bold,
            },
        },
    });

    let pages = doc.get_object_mut(pages_root).and_then(Object::as_dict_mut)?;
    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)?
        .push(Object::Reference(page_id));
    pages.set("Count", count + 1);

    Ok(page_id)
}

/// Reads a page's MediaBox, following `Parent` links for inherited boxes.
pub fn page_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut node = page_id;
    // Page trees are shallow; the bound guards against Parent cycles.
    for _ in 0..16 {
        let dict = doc.get_dictionary(node).ok()?;
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let media_box = match media_box {
                Object::Reference(id) => doc.get_object(*id).ok()?,
                other => other,
            };
            let nums: Vec<f32> = media_box
                .as_array()
                .ok()?
                .iter()
                .filter_map(number)
                .collect();
            if let [x0, y0, x1, y1] = nums[..] {
                return Some(((x1 - x0).abs(), (y1 - y0).abs()));
            }
            return None;
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory PDF fixtures shared by writer and fallback tests.

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a valid PDF with `pages` pages of the given size, each showing "Original page N".
    pub fn sample_pdf(pages: usize, width: i64, height: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for n in 1..=pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("Original page {n}"))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    /// Every `Tj` string drawn on the pages after the first `skip` pages, in order.
    pub fn drawn_strings(doc: &Document, skip: usize) -> Vec<String> {
        doc.get_pages()
            .values()
            .skip(skip)
            .flat_map(|page_id| {
                let raw = doc.get_page_content(*page_id).unwrap_or_default();
                Content::decode(&raw).map(|c| c.operations).unwrap_or_default()
            })
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    /// Every `Td` y-coordinate drawn on the pages after the first `skip` pages.
    pub fn baselines(doc: &Document, skip: usize) -> Vec<f32> {
        doc.get_pages()
            .values()
            .skip(skip)
            .flat_map(|page_id| {
                let raw = doc.get_page_content(*page_id).unwrap_or_default();
                Content::decode(&raw).map(|c| c.operations).unwrap_or_default()
            })
            .filter(|op| op.operator == "Td")
            .filter_map(|op| match op.operands.get(1) {
                Some(Object::Real(y)) => Some(*y as f32),
                Some(Object::Integer(y)) => Some(*y as f32),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{baselines, drawn_strings, sample_pdf};
    use super::*;

    fn load(pages: usize) -> Document {
        Document::load_mem(&sample_pdf(pages, 612, 792)).unwrap()
    }

    #[test]
    fn test_append_to_adds_one_blank_page() {
        let mut doc = load(2);
        let writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        assert_eq!(writer.finish().unwrap(), 1);
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_new_page_copies_inherited_media_box() {
        let mut doc = load(1);
        let writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let cursor = writer.cursor().clone();
        writer.finish().unwrap();
        assert_eq!(page_size(&doc, cursor.page), Some((612.0, 792.0)));
        assert!((cursor.cursor_y - (792.0 - 50.0)).abs() < 1e-3);
        assert!((cursor.content_width - (612.0 - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_heading_consumes_size_plus_trailing_space() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let start = writer.cursor().cursor_y;
        writer.draw_heading("Tailored Summary").unwrap();
        assert!((start - writer.cursor().cursor_y - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_paragraph_consumes_line_height_per_line_plus_spacing() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let start = writer.cursor().cursor_y;
        writer.draw_paragraph("One short line").unwrap();
        // 11 (line) + 4 (trailing) + 4 (paragraph spacing)
        assert!((start - writer.cursor().cursor_y - 19.0).abs() < 1e-3);
    }

    #[test]
    fn test_ensure_space_breaks_page_at_margin() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let first_page = writer.cursor().page;
        let available = writer.cursor().cursor_y - writer.cursor().margin;
        writer.ensure_space(available - 1.0).unwrap();
        assert_eq!(writer.cursor().page, first_page);
        writer.ensure_space(available).unwrap();
        assert_ne!(writer.cursor().page, first_page);
        assert_eq!(writer.finish().unwrap(), 2);
    }

    #[test]
    fn test_long_content_paginates_without_crossing_margin() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let paragraph = "Shipped reliable systems under pressure. ".repeat(40);
        for i in 0..12 {
            writer.draw_heading(&format!("Section {i}")).unwrap();
            writer.draw_paragraph(&paragraph).unwrap();
        }
        let added = writer.finish().unwrap();
        assert!(added > 1, "expected pagination, got {added} page(s)");
        assert_eq!(doc.get_pages().len(), 1 + added);

        for y in baselines(&doc, 1) {
            assert!(y > 50.0, "baseline {y} crosses the bottom margin");
        }
    }

    #[test]
    fn test_original_page_content_is_untouched() {
        let mut doc = load(2);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        writer.draw_heading("Appended").unwrap();
        writer.finish().unwrap();

        let original = drawn_strings(&doc, 0);
        assert_eq!(original[0], "Original page 1");
        assert_eq!(original[1], "Original page 2");
        assert_eq!(drawn_strings(&doc, 2), vec!["Appended".to_string()]);
    }

    #[test]
    fn test_long_bold_line_wraps_inside_content_width() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        let width = writer.cursor().content_width;
        let header = "Extremely Long Company Name Incorporated International Holdings - \
            Principal Distributed Systems Engineer, Platform Reliability (2015-2024)";
        writer.draw_text_line(header, true).unwrap();
        writer.finish().unwrap();

        let lines = drawn_strings(&doc, 1);
        assert!(lines.len() > 1, "header was not wrapped: {lines:?}");
        let bold = get_metrics(StandardFont::HelveticaBold);
        for line in &lines {
            assert!(bold.measure_str(line) * 11.0 <= width, "{line} overflows");
        }
    }

    #[test]
    fn test_indented_paragraph_starts_right_of_margin() {
        let mut doc = load(1);
        let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default()).unwrap();
        writer.draw_paragraph_indented("Indented summary", 12.0).unwrap();
        writer.finish().unwrap();

        let page_id = *doc.get_pages().values().last().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let td = content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .unwrap();
        assert_eq!(number(&td.operands[0]), Some(62.0));
    }
}
