//! Caller-side document. The whole text lives in a rope; the frame shows the
//! part that fits, starting at a line boundary (`origin`).

use std::io::Read;

use core_draw::Display;
use core_frame::Frame;
use ropey::Rope;
use tracing::debug;

/// Runes handed to one `insert` call while filling.
const FILL_CHUNK: usize = 1024;

pub struct Document {
    rope: Rope,
    origin: usize,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            origin: 0,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        Ok(Self {
            rope: Rope::from_reader(reader)?,
            origin: 0,
        })
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char index of the first visible rune.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Move the origin to the start of `line`, clamped to the last line.
    /// The frame is not touched.
    pub fn set_origin_line(&mut self, line: usize) {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        self.origin = self.rope.line_to_char(line);
    }

    /// Append document text after what the frame already shows until the
    /// frame is full or the document runs out.
    pub fn fill<D: Display>(&self, f: &mut Frame<D>) {
        let len = self.rope.len_chars();
        while !f.last_line_full() {
            let start = self.origin + f.nchars();
            if start >= len {
                break;
            }
            let end = (start + FILL_CHUNK).min(len);
            let chunk = self.rope.slice(start..end).to_string();
            let before = f.nchars();
            f.insert_str(&chunk, before);
            if f.nchars() == before {
                break;
            }
        }
    }

    /// Scroll callback for `Frame::select`. A non-zero `delta` moves the
    /// origin by that many document lines and refills the frame, keeping the
    /// selection where it was in the document (clipped to what is visible).
    /// Zero asks for a repaint.
    pub fn scroll<D: Display>(&mut self, f: &mut Frame<D>, delta: i32) {
        if delta == 0 {
            f.redraw();
            return;
        }
        let (q0, q1) = (self.origin + f.p0(), self.origin + f.p1());
        let line = self.rope.char_to_line(self.origin) as i64 + i64::from(delta);
        let last = self.rope.len_lines().saturating_sub(1) as i64;
        let origin = self.rope.line_to_char(line.clamp(0, last) as usize);
        if origin == self.origin {
            return;
        }
        self.origin = origin;

        let n = f.nchars();
        f.delete(0, n);
        self.fill(f);

        let shown = self.origin + f.nchars();
        let visible = |q: usize| q.clamp(self.origin, shown) - self.origin;
        f.set_select(visible(q0), visible(q1));
        f.redraw();
        debug!(
            target: "runtime",
            delta,
            origin = self.origin,
            nchars = f.nchars(),
            "document_scrolled"
        );
    }

    /// Selection of `f` in document coordinates.
    pub fn selection<D: Display>(&self, f: &Frame<D>) -> (usize, usize) {
        (self.origin + f.p0(), self.origin + f.p1())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use core_draw::{CellFont, Color, MemDisplay, Palette, PixelFormat, Point, Rect};

    fn frame(cols: i32, lines: i32) -> Frame<MemDisplay> {
        let mut d = MemDisplay::new();
        let colors = [
            Color::WHITE,
            Color::PALE_YELLOW,
            Color::DARK_YELLOW,
            Color::BLACK,
            Color::YELLOW_GREEN,
        ];
        let pal = Palette::alloc_solid(&mut d, PixelFormat::Rgb24, colors).unwrap();
        let r = Rect::new(0, 0, cols * 10, lines * 12);
        let img = d
            .alloc_image(r, PixelFormat::Rgb24, false, Color::WHITE)
            .unwrap();
        Frame::init(d, r, Rc::new(CellFont::new(10, 12)), Some(img), Some(pal))
    }

    #[test]
    fn fill_stops_when_frame_is_full() {
        let doc = Document::from_text("aaaa\nbbbb\ncccc");
        let mut f = frame(8, 2);
        doc.fill(&mut f);
        assert_eq!(f.text(), "aaaa\nbbbb\n");
        assert!(f.last_line_full());
    }

    #[test]
    fn fill_stops_at_end_of_document() {
        let doc = Document::from_text("short");
        let mut f = frame(8, 3);
        doc.fill(&mut f);
        assert_eq!(f.text(), "short");
        assert!(!f.last_line_full());
    }

    #[test]
    fn fill_feeds_long_documents_in_chunks() {
        let text = "x".repeat(5 * FILL_CHUNK);
        let doc = Document::from_text(&text);
        let mut f = frame(80, 50);
        doc.fill(&mut f);
        assert_eq!(f.nchars(), 80 * 50);
        assert!(f.last_line_full());
    }

    #[test]
    fn scroll_moves_origin_by_lines_and_refills() {
        let mut doc = Document::from_text("aaaa\nbbbb\ncccc");
        let mut f = frame(8, 2);
        doc.fill(&mut f);
        doc.scroll(&mut f, 1);
        assert_eq!(doc.origin(), 5);
        assert_eq!(f.text(), "bbbb\ncccc");
        doc.scroll(&mut f, -5);
        assert_eq!(doc.origin(), 0);
        assert_eq!(f.text(), "aaaa\nbbbb\n");
    }

    #[test]
    fn scroll_keeps_selection_in_document_coordinates() {
        let mut doc = Document::from_text("aaaa\nbbbb\ncccc");
        let mut f = frame(8, 2);
        doc.fill(&mut f);
        f.set_select(6, 8);
        doc.scroll(&mut f, 1);
        assert_eq!((f.p0(), f.p1()), (1, 3));
        assert_eq!(doc.selection(&f), (6, 8));
    }

    #[test]
    fn scrolled_off_anchor_clamps_to_top() {
        let mut doc = Document::from_text("aaaa\nbbbb\ncccc");
        let mut f = frame(8, 2);
        doc.fill(&mut f);
        f.set_select(1, 7);
        doc.scroll(&mut f, 1);
        assert_eq!((f.p0(), f.p1()), (0, 2));
    }

    #[test]
    fn zero_delta_only_repaints() {
        let mut doc = Document::from_text("abc");
        let mut f = frame(8, 2);
        doc.fill(&mut f);
        doc.scroll(&mut f, 0);
        assert_eq!(doc.origin(), 0);
        assert_eq!(f.text(), "abc");
        assert_eq!(f.ptofchar(3), Point::new(30, 0));
    }

    #[test]
    fn origin_line_is_clamped() {
        let mut doc = Document::from_text("one\ntwo");
        doc.set_origin_line(9);
        assert_eq!(doc.origin(), 4);
    }
}
