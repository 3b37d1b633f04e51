//! Page layout primitives on top of lopdf content streams

use lopdf::content::Operation;
use lopdf::{Object, ObjectId, StringFormat};

/// A4 portrait, in PDF points
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Room kept free at the bottom for the page footer
const FOOTER_HEIGHT: f32 = 20.0;
/// Usable height of an empty page
pub const BODY_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN - FOOTER_HEIGHT;

/// Helvetica advance widths (1/1000 em) for ASCII 0x20..=0x7E
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width used for accented letters and other non-ASCII WinAnsi glyphs
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }

    pub fn base_font(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
        }
    }
}

/// Approximate rendered width of WinAnsi-encoded text
pub fn text_width(text: &[u8], font: Font, size: f32) -> f32 {
    let units: u32 = text
        .iter()
        .map(|&b| match b {
            0x20..=0x7E => HELVETICA_WIDTHS[(b - 0x20) as usize] as u32,
            // ellipsis, per mille, OE, em dash, trade mark, AE
            0x85 | 0x89 | 0x8C | 0x97 | 0x99 | 0xC6 => 1000,
            0x9C => 944,
            0xE6 => 889,
            _ => FALLBACK_WIDTH as u32,
        })
        .sum();
    let bold_factor = if font == Font::Bold { 1.05 } else { 1.0 };
    units as f32 * size / 1000.0 * bold_factor
}

/// Greedy word wrap; words wider than the line are split
pub fn wrap(text: &[u8], font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for word in text.split(|&b| b == b' ').filter(|w| !w.is_empty()) {
        let candidate_width = if current.is_empty() {
            text_width(word, font, size)
        } else {
            text_width(&current, font, size) + text_width(b" ", font, size) + text_width(word, font, size)
        };
        if candidate_width <= max_width {
            if !current.is_empty() {
                current.push(b' ');
            }
            current.extend_from_slice(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        // Hard-split words that cannot fit on a line of their own
        for &b in word {
            if !current.is_empty() && text_width(&current, font, size) + text_width(&[b], font, size) > max_width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(b);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub type Rgb = (f32, f32, f32);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const GREY: Rgb = (0.85, 0.85, 0.85);

/// One finished page: its drawing operations and the images it uses
#[derive(Debug, Default)]
pub struct Page {
    pub operations: Vec<Operation>,
    pub images: Vec<(String, ObjectId)>,
}

/// Top-to-bottom writer that starts new pages as content overflows
pub struct PageCursor {
    pages: Vec<Page>,
    y: f32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Current baseline position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Space left above the footer
    pub fn remaining(&self) -> f32 {
        self.y - MARGIN - FOOTER_HEIGHT
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` still fits. Returns true on a break.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if height > self.remaining() && !self.page_is_empty() {
            self.new_page();
            return true;
        }
        false
    }

    fn page_is_empty(&self) -> bool {
        self.page().operations.is_empty()
    }

    fn page(&self) -> &Page {
        // Invariant: `pages` is never empty
        &self.pages[self.pages.len() - 1]
    }

    fn page_mut(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Draw one line of text with its baseline at the cursor
    pub fn text(&mut self, x: f32, font: Font, size: f32, text: &[u8]) {
        let y = self.y;
        self.text_at(x, y, font, size, text);
    }

    fn text_at(&mut self, x: f32, y: f32, font: Font, size: f32, text: &[u8]) {
        let ops = &mut self.page_mut().operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().to_vec()), Object::Real(size)],
        ));
        ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(text.to_vec(), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let ops = &mut self.page_mut().operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "rg",
            vec![Object::Real(color.0), Object::Real(color.1), Object::Real(color.2)],
        ));
        ops.push(Operation::new(
            "re",
            vec![
                Object::Real(x),
                Object::Real(y),
                Object::Real(width),
                Object::Real(height),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    /// Horizontal rule at the cursor
    pub fn rule(&mut self, x: f32, width: f32, color: Rgb) {
        let y = self.y;
        let ops = &mut self.page_mut().operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "RG",
            vec![Object::Real(color.0), Object::Real(color.1), Object::Real(color.2)],
        ));
        ops.push(Operation::new("w", vec![Object::Real(0.5)]));
        ops.push(Operation::new("m", vec![Object::Real(x), Object::Real(y)]));
        ops.push(Operation::new("l", vec![Object::Real(x + width), Object::Real(y)]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    /// Place an image XObject with its lower-left corner at (x, y)
    pub fn image(&mut self, name: String, id: ObjectId, x: f32, y: f32, width: f32, height: f32) {
        let page = self.page_mut();
        page.operations.push(Operation::new("q", vec![]));
        page.operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(height),
                Object::Real(x),
                Object::Real(y),
            ],
        ));
        page.operations
            .push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        page.operations.push(Operation::new("Q", vec![]));
        page.images.push((name, id));
    }

    /// Stamp "<label> n / total" at the bottom of every page and hand them over
    pub fn finish(mut self, page_label: &[u8]) -> Vec<Page> {
        let total = self.pages.len();
        for index in 0..total {
            let mut footer = page_label.to_vec();
            footer.extend_from_slice(format!(" {} / {}", index + 1, total).as_bytes());
            let x = PAGE_WIDTH - MARGIN - text_width(&footer, Font::Regular, 8.0);
            let ops = &mut self.pages[index].operations;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![Object::Name(Font::Regular.resource_name().to_vec()), Object::Real(8.0)],
            ));
            ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(MARGIN / 2.0)]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(footer, StringFormat::Literal)],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
        self.pages
    }
}
