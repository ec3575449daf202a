//! Layout primitives.
//!
//! Pure functions of the text rectangle, the font and the tab stop width.
//! They are methods on `Geom` rather than on the frame so that the scratch
//! boxes built during insertion can be laid out against the same geometry
//! without a second frame.

use std::fmt;
use std::rc::Rc;

use core_draw::{Font, Point, Rect};

use crate::boxes::{BoxStore, FrBox};
use crate::error::{FrameError, trap};

#[derive(Clone)]
pub struct Geom {
    pub r: Rect,
    pub font: Rc<dyn Font>,
    /// Tab stop spacing in pixels, measured from `r.min.x`.
    pub maxtab: i32,
}

impl fmt::Debug for Geom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geom")
            .field("r", &self.r)
            .field("font_height", &self.font.height())
            .field("maxtab", &self.maxtab)
            .finish()
    }
}

impl Geom {
    pub fn new(r: Rect, font: Rc<dyn Font>, maxtab: i32) -> Self {
        Self { r, font, maxtab }
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.font.height()
    }

    /// Start of the line below `p`.
    #[inline]
    fn next_line(&self, p: &mut Point) {
        p.x = self.r.min.x;
        p.y += self.height();
    }

    /// Runes of `b` that fit at `pt` before the right edge.
    pub fn canfit(&self, pt: Point, b: &FrBox) -> usize {
        let mut left = self.r.max.x - pt.x;
        match b {
            FrBox::Break(br) => usize::from(br.minwid <= left),
            FrBox::Text(t) => {
                if left >= t.wid {
                    return t.nrune;
                }
                for (nr, c) in t.text.chars().enumerate() {
                    left -= self.font.rune_width(c);
                    if left < 0 {
                        return nr;
                    }
                }
                t.nrune
            }
        }
    }

    /// Wrap `p` if the whole box (minimum width for breaks) does not fit.
    pub fn cklinewrap(&self, p: &mut Point, b: &FrBox) {
        if b.wrap_wid() > self.r.max.x - p.x {
            self.next_line(p);
        }
    }

    /// Wrap `p` only if not a single rune of `b` fits.
    pub fn cklinewrap0(&self, p: &mut Point, b: &FrBox) {
        if self.canfit(*p, b) == 0 {
            self.next_line(p);
        }
    }

    pub fn advance(&self, p: &mut Point, b: &FrBox) {
        if b.is_newline() {
            self.next_line(p);
        } else {
            p.x += b.wid();
        }
    }

    /// Width `b` occupies when drawn at `pt`. Only tabs vary.
    pub fn newwid0(&self, pt: Point, b: &FrBox) -> i32 {
        let FrBox::Break(br) = b else {
            return b.wid();
        };
        if !b.is_tab() {
            return br.wid;
        }
        let c = self.r.max.x;
        let mut start = pt.x;
        if start + br.minwid > c {
            start = self.r.min.x;
        }
        let maxtab = self.maxtab.max(1);
        let mut x = start + maxtab;
        x -= (x - self.r.min.x) % maxtab;
        if x - start < br.minwid || x > c {
            x = start + br.minwid;
        }
        x - start
    }

    /// `newwid0`, caching the result in the box.
    pub fn newwid(&self, pt: Point, b: &mut FrBox) -> i32 {
        let w = self.newwid0(pt, b);
        if let FrBox::Break(br) = b {
            br.wid = w;
        }
        w
    }

    /// Lay `boxes` out from `pt`, splitting text at wrap points and fixing tab
    /// widths. Boxes that would start on the line below the rectangle are
    /// deleted. Returns the point after the last kept box and the number of
    /// runes dropped.
    pub fn layout(&self, boxes: &mut BoxStore, mut pt: Point) -> (Point, usize) {
        let mut nb = 0;
        while nb < boxes.len() {
            self.cklinewrap0(&mut pt, boxes.get(nb));
            if pt.y == self.r.max.y {
                let dropped = boxes.strlen(nb);
                boxes.del(nb, boxes.len() - 1);
                return (pt, dropped);
            }
            let b = boxes.get_mut(nb);
            if b.is_text() {
                let nrune = b.nrune();
                let n = self.canfit(pt, b);
                if n == 0 {
                    trap(FrameError::CannotFit { op: "layout", pt });
                }
                if n != nrune {
                    boxes.split(nb, n, &*self.font);
                }
                pt.x += boxes.get(nb).wid();
            } else if b.is_newline() {
                self.next_line(&mut pt);
            } else {
                pt.x += self.newwid(pt, b);
            }
            nb += 1;
        }
        (pt, 0)
    }

    /// Snap `p` to the top of its line and clamp it to the right edge.
    pub fn grid(&self, mut p: Point) -> Point {
        let h = self.height();
        p.y -= self.r.min.y;
        p.y -= p.y % h;
        p.y += self.r.min.y;
        if p.x > self.r.max.x {
            p.x = self.r.max.x;
        }
        p
    }

    /// Pixel position of character `p`, walking `boxes` from `pt`.
    pub fn ptofchar_ptb(&self, boxes: &[FrBox], mut p: usize, mut pt: Point) -> Point {
        for b in boxes {
            self.cklinewrap(&mut pt, b);
            let l = b.nrune();
            if p < l {
                if let FrBox::Text(t) = b {
                    for c in t.text.chars().take(p) {
                        pt.x += self.font.rune_width(c);
                        if pt.x > self.r.max.x {
                            trap(FrameError::OffLine { pt });
                        }
                    }
                }
                break;
            }
            p -= l;
            self.advance(&mut pt, b);
        }
        pt
    }

    /// Character index at or just after pixel `pt`.
    pub fn charofpt(&self, boxes: &[FrBox], pt: Point) -> usize {
        let pt = self.grid(pt);
        let mut qt = self.r.min;
        let mut p = 0;
        let mut bn = 0;
        while bn < boxes.len() && qt.y < pt.y {
            let b = &boxes[bn];
            self.cklinewrap(&mut qt, b);
            if qt.y >= pt.y {
                break;
            }
            self.advance(&mut qt, b);
            p += b.nrune();
            bn += 1;
        }
        while bn < boxes.len() && qt.x <= pt.x {
            let b = &boxes[bn];
            self.cklinewrap(&mut qt, b);
            if qt.y > pt.y {
                break;
            }
            if qt.x + b.wid() > pt.x {
                match b {
                    FrBox::Break(_) => self.advance(&mut qt, b),
                    FrBox::Text(t) => {
                        let mut chars = t.text.chars();
                        loop {
                            let Some(c) = chars.next() else {
                                trap(FrameError::EndOfString { index: bn });
                            };
                            qt.x += self.font.rune_width(c);
                            if qt.x > pt.x {
                                break;
                            }
                            p += 1;
                        }
                    }
                }
            } else {
                p += b.nrune();
                self.advance(&mut qt, b);
            }
            bn += 1;
        }
        p
    }
}
