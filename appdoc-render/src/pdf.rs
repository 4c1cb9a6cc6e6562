//! Text-flow PDF output via printpdf.
//!
//! The HTML is reduced to plain text lines (see [`crate::html_text`]),
//! wrapped, and laid out top to bottom on fixed-size pages with the
//! built-in Helvetica faces. No CSS, images or tables.

use appdoc_core::document::{HeaderRepeat, PageNumbers, PdfOptions, PdfRenderError, PdfRenderer};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::debug;

use crate::html_text::{extract_lines, wrap};

/// Page geometry and type sizes. Defaults to A4 portrait.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub font_size_pt: f32,
    pub header_font_size_pt: f32,
    pub line_height_mm: f32,
    /// Characters per line before wrapping.
    pub wrap_columns: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            font_size_pt: 10.0,
            header_font_size_pt: 12.0,
            line_height_mm: 5.5,
            wrap_columns: 95,
        }
    }
}

impl PageLayout {
    /// Text rows that fit between the top margin and the footer band.
    pub fn rows_per_page(&self) -> usize {
        let usable = self.height_mm - 2.0 * self.margin_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub show_header: bool,
    pub lines: Vec<String>,
}

/// Split `body` into pages of `rows_per_page`, reserving room for the
/// header (plus one spacer row) on pages that show it. Always returns at
/// least one page.
pub fn paginate(
    body: &[String],
    header_rows: usize,
    repeat: HeaderRepeat,
    rows_per_page: usize,
) -> Vec<Page> {
    let reserved = if header_rows == 0 { 0 } else { header_rows + 1 };
    let mut pages = Vec::new();
    let mut remaining = body;

    loop {
        let show_header = header_rows > 0
            && match repeat {
                HeaderRepeat::AllPages => true,
                HeaderRepeat::FirstPageOnly => pages.is_empty(),
            };
        let capacity = if show_header {
            rows_per_page.saturating_sub(reserved).max(1)
        } else {
            rows_per_page.max(1)
        };

        let take = capacity.min(remaining.len());
        let (page, rest) = remaining.split_at(take);
        pages.push(Page {
            show_header,
            lines: page.to_vec(),
        });
        remaining = rest;

        if remaining.is_empty() {
            return pages;
        }
    }
}

/// [`PdfRenderer`] that writes plain text pages with printpdf.
///
/// Output is not byte-for-byte reproducible: printpdf stamps each document
/// with its creation time and a random id.
#[derive(Debug, Clone)]
pub struct PrintPdfRenderer {
    title: String,
    layout: PageLayout,
}

impl PrintPdfRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            layout: PageLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    fn wrapped(&self, html: &str) -> Vec<String> {
        extract_lines(html)
            .iter()
            .flat_map(|line| wrap(line, self.layout.wrap_columns))
            .collect()
    }

    fn write_lines(
        &self,
        layer: &PdfLayerReference,
        lines: &[String],
        top: f32,
        size: f32,
        font: &IndirectFontRef,
    ) -> f32 {
        let mut y = top;
        for line in lines {
            if !line.is_empty() {
                layer.use_text(line.as_str(), size, Mm(self.layout.margin_mm), Mm(y), font);
            }
            y -= self.layout.line_height_mm;
        }
        y
    }
}

impl PdfRenderer for PrintPdfRenderer {
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, PdfRenderError> {
        let layout = &self.layout;
        let header = self.wrapped(&options.header.html);
        let body = self.wrapped(html);
        let pages = paginate(&body, header.len(), options.header.repeat, layout.rows_per_page());
        debug!(pages = pages.len(), lines = body.len(), "laying out PDF");

        let (doc, first_page, first_layer) = PdfDocument::new(
            self.title.clone(),
            Mm(layout.width_mm),
            Mm(layout.height_mm),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfRenderError::Generation(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfRenderError::Generation(e.to_string()))?;

        let total = pages.len();
        for (index, page) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) =
                    doc.add_page(Mm(layout.width_mm), Mm(layout.height_mm), "Layer 1");
                doc.get_page(page_index).get_layer(layer_index)
            };

            let mut y = layout.height_mm - layout.margin_mm;
            if page.show_header {
                y = self.write_lines(&layer, &header, y, layout.header_font_size_pt, &bold);
                y -= layout.line_height_mm;
            }
            self.write_lines(&layer, &page.lines, y, layout.font_size_pt, &regular);

            if options.page_numbers == PageNumbers::Numeric {
                layer.use_text(
                    format!("Page {} of {}", index + 1, total),
                    layout.font_size_pt,
                    Mm(layout.width_mm / 2.0 - 10.0),
                    Mm(layout.margin_mm / 2.0),
                    &regular,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|e| PdfRenderError::Generation(e.to_string()))
    }
}
