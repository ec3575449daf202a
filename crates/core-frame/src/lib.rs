//! Text frames.
//!
//! A `Frame` shows a window of editable text inside a fixed rectangle of a
//! backing image: one font, line wrapping, tab stops, an insertion tick and a
//! highlighted selection. The caller owns the document; the frame keeps only
//! the visible prefix, split into boxes (see `boxes`).
//!
//! Every public operation leaves three things in agreement: the box array,
//! the pixels of the backing image, and the selection state. Insert and
//! delete keep repainting to a minimum by moving existing pixels with
//! self-blits on the backing image and only drawing what is new.
//!
//! Conditions that mean the three have diverged are traps (`error::trap`):
//! they log under `frame.trap` and panic. Calls that cannot do anything
//! (empty insert, delete past the end, no backing image) return quietly.

use std::rc::Rc;

use core_draw::{Display, Font, ImageId, Palette, Point, Rect};

mod boxes;
mod check;
mod delete;
mod draw;
mod error;
mod init;
mod insert;
mod layout;
mod ptofchar;
mod select;

pub use boxes::{BREAK_WID_UNSET, Break, BreakKind, BoxStore, FrBox, SLOP, TextRun};
pub use error::{FrameError, trap};
pub use layout::Geom;
pub use select::region;

/// Default tick width in pixels.
pub const FRTICKW: i32 = 3;
/// Growth step for scratch storage during insertion.
pub const DELTA: usize = 25;
/// Byte limit of one text box built from inserted runes.
pub const TMPSIZE: usize = 256;

pub struct Frame<D: Display> {
    display: D,
    image: Option<ImageId>,
    palette: Option<Palette>,
    geom: Geom,
    entire: Rect,
    boxes: BoxStore,
    p0: usize,
    p1: usize,
    nchars: usize,
    nlines: usize,
    maxlines: usize,
    last_line_full: bool,
    modified: bool,
    tick: Option<ImageId>,     // caret glyph
    tickback: Option<ImageId>, // pixels under the caret while shown
    ticked: bool,
    tick_width: i32,
    no_redraw: bool,
}

impl<D: Display> Frame<D> {
    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    pub fn palette(&self) -> Option<Palette> {
        self.palette
    }

    pub fn font(&self) -> &Rc<dyn Font> {
        &self.geom.font
    }

    pub fn geom(&self) -> &Geom {
        &self.geom
    }

    /// Text rectangle (height is a whole number of lines).
    pub fn r(&self) -> Rect {
        self.geom.r
    }

    pub fn entire(&self) -> Rect {
        self.entire
    }

    pub fn maxtab(&self) -> i32 {
        self.geom.maxtab
    }

    pub fn p0(&self) -> usize {
        self.p0
    }

    pub fn p1(&self) -> usize {
        self.p1
    }

    pub fn nchars(&self) -> usize {
        self.nchars
    }

    pub fn nlines(&self) -> usize {
        self.nlines
    }

    pub fn maxlines(&self) -> usize {
        self.maxlines
    }

    pub fn last_line_full(&self) -> bool {
        self.last_line_full
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn ticked(&self) -> bool {
        self.ticked
    }

    pub fn tick_width(&self) -> i32 {
        self.tick_width
    }

    pub fn no_redraw(&self) -> bool {
        self.no_redraw
    }

    /// Skip glyph rendering (fills still happen) until cleared.
    pub fn set_no_redraw(&mut self, no_redraw: bool) {
        self.no_redraw = no_redraw;
    }

    pub fn boxes(&self) -> &BoxStore {
        &self.boxes
    }

    /// Visible text, breaks included.
    pub fn text(&self) -> String {
        let mut s = String::new();
        for b in &self.boxes {
            match b {
                FrBox::Text(t) => s.push_str(&t.text),
                FrBox::Break(br) => s.push(br.kind.as_char()),
            }
        }
        s
    }

    /// Set the selection. Bounds are clamped and ordered. Only the tick is
    /// painted (hidden if shown); callers follow with `redraw` or `draw_sel`.
    pub fn set_select(&mut self, p0: usize, p1: usize) {
        if self.ticked {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, false);
        }
        let (a, b) = if p0 <= p1 { (p0, p1) } else { (p1, p0) };
        self.p0 = a.min(self.nchars);
        self.p1 = b.min(self.nchars);
    }

    /// Line count derived from where character `nchars` would be drawn.
    fn recount_lines(&mut self) {
        self.nlines = if self.boxes.is_empty() {
            0
        } else {
            let pt = self.ptofchar(self.nchars);
            let lines = (pt.y - self.geom.r.min.y) / self.geom.height() + 1;
            (lines.max(0) as usize).min(self.maxlines)
        };
    }

    /// Last-line-full rule for a layout that ended at `pt`.
    fn line_full_at(&self, pt: Point) -> bool {
        let r = self.geom.r;
        pt.y >= r.max.y || (pt.y + self.geom.height() >= r.max.y && pt.x >= r.max.x)
    }
}

impl<D: Display> Drop for Frame<D> {
    fn drop(&mut self) {
        for id in [self.tick.take(), self.tickback.take()].into_iter().flatten() {
            self.display.free_image(id);
        }
    }
}
