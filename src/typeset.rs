//! Pure in-process typesetting backend producing SVG output.
//!
//! The HTML is parsed into a tree once and the font asset is read once at
//! construction; each render call then performs block layout and emits a
//! fresh SVG document. No process or network I/O happens per iteration, so
//! this backend measures pure computational rendering cost.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use scraper::{Html, Selector};

use crate::{Error, RenderOutput, Renderer, Result, Viewport};

/// Font file the typeset benchmark loads from the fonts directory.
pub const DEFAULT_FONT_FILE: &str = "Montserrat-Regular.ttf";

/// Fixed output size, matching the dimensions the benchmark has always used.
pub const RENDER_VIEWPORT: Viewport = Viewport {
    width: 800,
    height: 1200,
};

const PAGE_PADDING: u32 = 16;
const BLOCK_GAP: u32 = 12;
const HEADING_FONT_SIZE: u32 = 32;
const BODY_FONT_SIZE: u32 = 16;

#[derive(Debug)]
struct FontFace {
    family: String,
    data_b64: String,
}

/// A laid-out run of wrapped text lines at one position.
struct TextBlock {
    x: u32,
    y: u32,
    font_size: u32,
    line_height: u32,
    lines: Vec<String>,
}

/// Layout-engine-backed renderer: HTML in, SVG out, all in process.
#[derive(Debug)]
pub struct TypesetRenderer {
    document: Html,
    font: FontFace,
    viewport: Viewport,
}

impl TypesetRenderer {
    /// Parse the document and load the font asset, both exactly once.
    pub fn new(html: &str, font_path: &Path) -> Result<Self> {
        let data = fs::read(font_path).map_err(|e| {
            Error::Io(format!("Failed to read font {}: {}", font_path.display(), e))
        })?;
        let family = font_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "serif".to_string());
        Ok(Self::from_font_bytes(html, &family, data))
    }

    /// Build a renderer from font bytes already in memory.
    pub fn from_font_bytes(html: &str, family: &str, data: Vec<u8>) -> Self {
        Self {
            document: Html::parse_document(html),
            font: FontFace {
                family: family.to_string(),
                data_b64: STANDARD.encode(&data),
            },
            viewport: RENDER_VIEWPORT,
        }
    }
}

impl Renderer for TypesetRenderer {
    fn label(&self) -> &str {
        "typeset"
    }

    fn artifact_ext(&self) -> &str {
        "svg"
    }

    fn render(&mut self, _output_path: &Path) -> Result<RenderOutput> {
        let blocks = layout_document(&self.document, self.viewport);
        let svg = emit_svg(&blocks, &self.font, self.viewport);
        Ok(RenderOutput::Payload(svg.into_bytes()))
    }
}

/// Compute a basic block layout: a heading (h1, falling back to the document
/// title) followed by paragraphs, stacked vertically until the viewport is
/// exhausted. Line breaks are estimated from an average character advance.
fn layout_document(document: &Html, viewport: Viewport) -> Vec<TextBlock> {
    let content_width = viewport.width.saturating_sub(PAGE_PADDING * 2);
    let mut y = PAGE_PADDING;
    let mut blocks = Vec::new();

    let h1_sel = Selector::parse("h1").unwrap();
    let title_sel = Selector::parse("title").unwrap();
    let heading = document
        .select(&h1_sel)
        .next()
        .or_else(|| document.select(&title_sel).next())
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();

    if !heading.trim().is_empty() {
        let block = make_block(heading.trim(), PAGE_PADDING, y, HEADING_FONT_SIZE, content_width);
        y += block_height(&block) + BLOCK_GAP;
        blocks.push(block);
    }

    let p_sel = Selector::parse("p").unwrap();
    for p in document.select(&p_sel) {
        if y >= viewport.height {
            break;
        }
        let text = p.text().collect::<String>();
        if text.trim().is_empty() {
            continue;
        }
        let block = make_block(text.trim(), PAGE_PADDING, y, BODY_FONT_SIZE, content_width);
        y += block_height(&block) + BLOCK_GAP;
        blocks.push(block);
    }

    blocks
}

fn make_block(text: &str, x: u32, y: u32, font_size: u32, content_width: u32) -> TextBlock {
    // Average advance of roughly 0.6em per character.
    let char_width = (font_size * 3 / 5).max(1);
    let chars_per_line = (content_width / char_width).max(1) as usize;
    TextBlock {
        x,
        y,
        font_size,
        line_height: font_size + font_size / 4,
        lines: wrap_text(text, chars_per_line),
    }
}

fn block_height(block: &TextBlock) -> u32 {
    block.lines.len() as u32 * block.line_height
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn emit_svg(blocks: &[TextBlock], font: &FontFace, viewport: Viewport) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = viewport.width,
        h = viewport.height
    );
    svg.push_str(&format!(
        "<defs><style>@font-face {{ font-family: '{}'; src: url('data:font/ttf;base64,{}'); }}</style></defs>",
        font.family, font.data_b64
    ));
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>",
        viewport.width, viewport.height
    ));

    for block in blocks {
        for (i, line) in block.lines.iter().enumerate() {
            // Text y is the baseline; offset each line by one line height.
            let baseline = block.y + block.line_height * (i as u32 + 1);
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"#000000\">{}</text>",
                block.x,
                baseline,
                font.family,
                block.font_size,
                escape_xml(line)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_splits_long_runs() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_text_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("hello world", 40), vec!["hello world"]);
    }

    #[test]
    fn layout_places_heading_before_paragraphs() {
        let html = "<html><head><title>Fallback</title></head>\
                    <body><h1>Heading</h1><p>Body text</p></body></html>";
        let document = Html::parse_document(html);
        let blocks = layout_document(&document, RENDER_VIEWPORT);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].font_size, HEADING_FONT_SIZE);
        assert_eq!(blocks[0].lines, vec!["Heading"]);
        assert_eq!(blocks[1].font_size, BODY_FONT_SIZE);
        assert!(blocks[1].y > blocks[0].y);
    }

    #[test]
    fn layout_falls_back_to_document_title() {
        let html = "<html><head><title>The Title</title></head><body><p>x</p></body></html>";
        let document = Html::parse_document(html);
        let blocks = layout_document(&document, RENDER_VIEWPORT);
        assert_eq!(blocks[0].lines, vec!["The Title"]);
    }

    #[test]
    fn escape_xml_handles_markup_characters() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }
}
