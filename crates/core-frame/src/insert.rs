//! Insertion.
//!
//! The new runes are boxed and laid out on their own first (the scratch
//! boxes), starting where `p0` is drawn. Then the existing boxes after `p0`
//! are walked twice at once: where each sits now (`pt0`) and where it will
//! sit once the insertion pushes it along (`pt1`). The walk stops as soon as
//! the two x coordinates agree; from there on the old layout is simply
//! shifted down by whole lines, which one block copy handles. The walked
//! boxes are blitted individually, last first, so no pixel is overwritten
//! before it has moved.

use core_draw::{ColorSlot, Display, Point, Rect};
use tracing::{debug, trace};

use crate::boxes::{BoxStore, BreakKind, FrBox};
use crate::draw::paint_text;
use crate::error::{FrameError, trap};
use crate::{DELTA, Frame, TMPSIZE};

/// Old and new position of one box that moves during insertion.
#[derive(Debug, Clone, Copy)]
struct Move {
    pt0: Point,
    pt1: Point,
}

/// Boxed form of the inserted runes, laid out at their destination.
struct Scratch {
    boxes: BoxStore,
    nchars: usize,
    end: Point,
    chopped: bool,
}

impl<D: Display> Frame<D> {
    /// Insert `runes` before character `p0`.
    pub fn insert(&mut self, runes: &[char], p0: usize) {
        let s: String = runes.iter().collect();
        self.insert_str(&s, p0);
    }

    /// Insert `text` before character `p0`. Content pushed below the last
    /// line is dropped from the frame.
    pub fn insert_str(&mut self, text: &str, p0: usize) {
        if p0 > self.nchars || text.is_empty() || self.image.is_none() {
            trace!(target: "frame.insert", p0, nchars = self.nchars, empty = text.is_empty(), "insert_noop");
            return;
        }
        let Some(pal) = self.palette else {
            trace!(target: "frame.insert", "insert_without_palette");
            return;
        };
        let Some(img) = self.image else {
            return;
        };
        let font = self.geom.font.clone();
        let r = self.geom.r;
        let h = self.geom.height();

        let mut n0 = self.boxes.find(0, 0, p0, &*font);
        let mut cn0 = p0;
        let nn0 = n0;
        let mut pt0 = self.ptofchar_nb(p0, n0);
        let opt0 = pt0;
        let mut ppt0 = pt0;
        let scratch = self.bxscan(text, &mut ppt0);
        let mut pt1 = scratch.end;
        let mut ppt1 = pt1;
        if n0 < self.boxes.len() {
            let b = self.boxes.get(n0);
            self.geom.cklinewrap(&mut pt0, b);
            self.geom.cklinewrap0(&mut ppt1, b);
        }
        self.modified = true;
        if self.p0 == self.p1 {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, false);
        }

        let mut chopped = scratch.chopped;
        if scratch.boxes.is_empty() {
            // Nothing of the insertion is visible: everything after p0 is
            // pushed off the frame.
            if n0 < self.boxes.len() {
                self.nchars -= self.boxes.strlen(n0);
                let last = self.boxes.len() - 1;
                self.boxes.del(n0, last);
                let corner = Point::new(r.max.x, r.max.y - h);
                self.selectpaint(opt0, corner, pal[ColorSlot::Back]);
            }
            self.finish_insert(p0, 0, true);
            return;
        }

        let mut pts: Vec<Move> = Vec::with_capacity(DELTA);
        while pt1.x != pt0.x && pt1.y != r.max.y && n0 < self.boxes.len() {
            let b = self.boxes.get(n0);
            self.geom.cklinewrap(&mut pt0, b);
            self.geom.cklinewrap0(&mut pt1, b);
            if b.is_text() {
                let n = self.geom.canfit(pt1, b);
                if n == 0 {
                    trap(FrameError::CannotFit { op: "insert", pt: pt1 });
                }
                if n != b.nrune() {
                    self.boxes.split(n0, n, &*font);
                }
            }
            if pt1.y == r.max.y {
                break;
            }
            pts.push(Move { pt0, pt1 });
            self.geom.advance(&mut pt0, self.boxes.get(n0));
            pt1.x += self.geom.newwid(pt1, self.boxes.get_mut(n0));
            cn0 += self.boxes.get(n0).nrune();
            n0 += 1;
        }
        if pt1.y > r.max.y {
            trap(FrameError::LayoutOverflow {
                op: "insert",
                pt: pt1,
                max_y: r.max.y,
            });
        }
        if pt1.y == r.max.y && n0 < self.boxes.len() {
            self.nchars -= self.boxes.strlen(n0);
            let last = self.boxes.len() - 1;
            self.boxes.del(n0, last);
            chopped = true;
        } else if pt1.y != pt0.y && n0 < self.boxes.len() {
            if let Some(cut) = self.chop_frame(ppt1, p0, nn0) {
                chopped = true;
                if cut < n0 {
                    cn0 = p0 + self.walked_runes(nn0, cut);
                    pts.truncate(cut - nn0);
                }
            }
            let q0 = pt0.y + h;
            let q1 = pt1.y + h;
            if pt1.y < r.max.y {
                if q1 < r.max.y {
                    self.display.draw(
                        img,
                        Rect::new(r.min.x, q1, r.max.x, r.max.y),
                        img,
                        Point::new(r.min.x, q0),
                    );
                }
                self.display.draw(
                    img,
                    Rect::new(pt1.x, pt1.y, pt1.x + (r.max.x - pt0.x), q1),
                    img,
                    pt0,
                );
            }
        }

        // Move the walked boxes, last first.
        let high = pal[ColorSlot::High];
        let back = pal[ColorSlot::Back];
        let in_sel = |f: &Self, c: usize| f.p0 <= c && c < f.p1;
        let mut y = if pt1.y == r.max.y { pt1.y } else { 0 };
        for (i, mv) in pts.iter().enumerate().rev() {
            let bn = nn0 + i;
            let pt = mv.pt1;
            let b = self.boxes.get(bn);
            let wid = b.wid();
            if b.is_text() {
                let nrune = b.nrune();
                self.display
                    .draw(img, Rect::new(pt.x, pt.y, pt.x + wid, pt.y + h), img, mv.pt0);
                if pt.y < y {
                    let col = if in_sel(self, cn0) { high } else { back };
                    self.display
                        .draw(img, Rect::new(pt.x + wid, pt.y, r.max.x, pt.y + h), col, Point::ZERO);
                }
                y = pt.y;
                cn0 -= nrune;
            } else {
                let x = (pt.x + wid).min(r.max.x);
                cn0 -= 1;
                let col = if in_sel(self, cn0) { high } else { back };
                self.display
                    .draw(img, Rect::new(pt.x, pt.y, x, pt.y + h), col, Point::ZERO);
                y = if pt.x == r.min.x { pt.y } else { 0 };
            }
        }

        // Insertion can extend the selection, so the test differs from the
        // one for moved boxes.
        let highlighted = self.p0 < p0 && p0 <= self.p1;
        let (col, text_col) = if highlighted {
            (high, pal[ColorSlot::HText])
        } else {
            (back, pal[ColorSlot::Text])
        };
        if ppt0.y > opt0.y {
            self.display
                .draw(img, Rect::new(opt0.x, opt0.y, r.max.x, opt0.y + h), col, Point::ZERO);
        }
        self.selectpaint(ppt0, ppt1, col);
        paint_text(
            &mut self.display,
            img,
            &self.geom,
            &scratch.boxes,
            ppt0,
            text_col,
            col,
            self.no_redraw,
        );

        let inserted = scratch.nchars;
        self.boxes.splice_from(nn0, scratch.boxes);
        let mut start = nn0;
        if start > 0 {
            let prev = self.boxes.get(start - 1);
            if prev.is_text() && ppt0.x - prev.wid() >= r.min.x {
                ppt0.x -= prev.wid();
                start -= 1;
            }
        }
        // Boxes past the meeting point keep their x but may now sit next to
        // a box they fit beside.
        let end = self.boxes.len();
        self.clean(ppt0, start, end);
        self.nchars += inserted;
        self.finish_insert(p0, inserted, chopped);
    }

    /// Selection, line count and tick bookkeeping after an insertion.
    fn finish_insert(&mut self, p0: usize, inserted: usize, chopped: bool) {
        if self.p0 >= p0 {
            self.p0 += inserted;
        }
        self.p0 = self.p0.min(self.nchars);
        if self.p1 >= p0 {
            self.p1 += inserted;
        }
        self.p1 = self.p1.min(self.nchars);
        self.recount_lines();
        if chopped {
            self.last_line_full = true;
        }
        if self.p0 == self.p1 {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, true);
        }
        debug!(
            target: "frame.insert",
            p0,
            inserted,
            nchars = self.nchars,
            nlines = self.nlines,
            chopped,
            "insert_complete"
        );
    }

    /// Box the runes of `text` and lay them out from `ppt` (wrapped first if
    /// nothing fits there).
    fn bxscan(&self, text: &str, ppt: &mut Point) -> Scratch {
        let font = &*self.geom.font;
        let mut boxes = BoxStore::new();
        let mut nchars = 0;
        let mut nl = 0;
        let mut delta = DELTA;
        let mut chars = text.chars().peekable();
        while chars.peek().is_some() && nl <= self.maxlines {
            if boxes.len() == boxes.capacity() {
                boxes.grow(delta);
                if delta < 10_000 {
                    delta *= 2;
                }
            }
            let Some(&c) = chars.peek() else {
                break;
            };
            if let Some(kind) = BreakKind::from_char(c) {
                chars.next();
                if kind == BreakKind::Newline {
                    nl += 1;
                }
                boxes.push(FrBox::brk(kind, font));
                nchars += 1;
                continue;
            }
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if BreakKind::from_char(c).is_some() || run.len() + c.len_utf8() >= TMPSIZE {
                    break;
                }
                run.push(c);
                chars.next();
            }
            let b = FrBox::text(run, font);
            nchars += b.nrune();
            boxes.push(b);
        }
        let mut chopped = false;
        if !boxes.is_empty() {
            self.geom.cklinewrap0(ppt, boxes.get(0));
        }
        let (end, dropped) = self.geom.layout(&mut boxes, *ppt);
        if dropped > 0 || chars.peek().is_some() {
            chopped = true;
        }
        Scratch {
            boxes,
            nchars: nchars - dropped,
            end,
            chopped,
        }
    }

    /// Runes in boxes `a..b`.
    fn walked_runes(&self, a: usize, b: usize) -> usize {
        self.boxes.as_slice()[a..b].iter().map(FrBox::nrune).sum()
    }

    /// Walk from box `bn` at `pt` (character `p`) and delete every box from
    /// the first one that would land below the frame. Returns the index of
    /// the first deleted box.
    pub(crate) fn chop_frame(&mut self, mut pt: Point, mut p: usize, bn: usize) -> Option<usize> {
        let max_y = self.geom.r.max.y;
        for nb in bn..self.boxes.len() {
            let b = self.boxes.get(nb);
            self.geom.cklinewrap(&mut pt, b);
            if pt.y >= max_y {
                let last = self.boxes.len() - 1;
                self.boxes.del(nb, last);
                self.nchars = p;
                self.nlines = self.maxlines;
                debug!(target: "frame.insert", at = nb, nchars = p, "chop_frame");
                return Some(nb);
            }
            p += b.nrune();
            self.geom.advance(&mut pt, b);
        }
        None
    }

    /// Merge adjacent text boxes in `n0..n1` that fit on their line together,
    /// then note whether the last line is full. `pt` is where box `n0` is
    /// drawn.
    pub(crate) fn clean(&mut self, mut pt: Point, n0: usize, mut n1: usize) {
        let c = self.geom.r.max.x;
        let mut nb = n0;
        while nb + 1 < n1 {
            self.geom.cklinewrap(&mut pt, self.boxes.get(nb));
            while nb + 1 < n1 {
                let (b0, b1) = (self.boxes.get(nb), self.boxes.get(nb + 1));
                if !(b0.is_text() && b1.is_text() && pt.x + b0.wid() + b1.wid() < c) {
                    break;
                }
                self.boxes.merge(nb);
                n1 -= 1;
            }
            self.geom.advance(&mut pt, self.boxes.get(nb));
            nb += 1;
        }
        while nb < self.boxes.len() {
            let b = self.boxes.get(nb);
            self.geom.cklinewrap(&mut pt, b);
            self.geom.advance(&mut pt, b);
            nb += 1;
        }
        self.last_line_full = self.line_full_at(pt);
    }
}
