//! Paint primitives: range painting, the tick, selection fills, redraw.

use core_draw::{ColorSlot, Display, ImageId, Point, Rect};
use tracing::trace;

use crate::boxes::{BoxStore, FrBox, rune_offset};
use crate::layout::Geom;
use crate::Frame;

/// Draw every text box of `boxes` from `pt`. Breaks only advance.
#[allow(clippy::too_many_arguments)]
pub(crate) fn paint_text<D: Display + ?Sized>(
    display: &mut D,
    image: ImageId,
    geom: &Geom,
    boxes: &BoxStore,
    mut pt: Point,
    text: ImageId,
    back: ImageId,
    no_redraw: bool,
) {
    for b in boxes {
        geom.cklinewrap(&mut pt, b);
        if !no_redraw
            && let FrBox::Text(t) = b
        {
            display.draw_string(image, pt, text, Point::ZERO, &*geom.font, &t.text, back, Point::ZERO);
        }
        pt.x += b.wid();
    }
}

impl<D: Display> Frame<D> {
    /// Paint characters `p0..p1` starting at `pt` (which must be where `p0`
    /// is drawn). Returns the point after the range.
    pub fn drawsel0(&mut self, mut pt: Point, p0: usize, p1: usize, back: ImageId, text: ImageId) -> Point {
        let Some(img) = self.image else {
            return pt;
        };
        if p0 > p1 {
            trace!(target: "frame.select", p0, p1, "drawsel0_inverted_range");
            return pt;
        }
        let r = self.geom.r;
        let h = self.geom.height();
        let font = &*self.geom.font;
        let mut p = 0;
        let mut nb = 0;
        let mut trim = false;
        while nb < self.boxes.len() && p < p1 {
            let b = self.boxes.get(nb);
            let mut nr = b.nrune();
            nb += 1;
            if p + nr <= p0 {
                p += nr;
                continue;
            }
            if p >= p0 {
                let qt = pt;
                self.geom.cklinewrap(&mut pt, b);
                if pt.y > qt.y {
                    self.display
                        .draw(img, Rect::new(qt.x, qt.y, r.max.x, pt.y), back, qt);
                }
            }
            let mut s = match b {
                FrBox::Text(t) => t.text.as_str(),
                FrBox::Break(_) => "",
            };
            if p < p0 {
                let skip = p0 - p;
                s = &s[rune_offset(s, skip)..];
                nr -= skip;
                p = p0;
            }
            trim = false;
            if p + nr > p1 {
                nr -= p + nr - p1;
                trim = true;
            }
            let w = if !b.is_text() || nr == b.nrune() {
                b.wid()
            } else {
                font.string_n_width(s, nr)
            };
            let x = (pt.x + w).min(r.max.x);
            self.display
                .draw(img, Rect::new(pt.x, pt.y, x, pt.y + h), back, pt);
            if b.is_text() {
                self.display
                    .draw_string_n(img, pt, text, Point::ZERO, font, s, nr, back, Point::ZERO);
            }
            pt.x += w;
            p += nr;
        }
        // A range that ends with the last text box on a line extends its
        // fill to the right edge when the next box wraps.
        if p1 > p0 && nb > 0 && nb < self.boxes.len() && self.boxes.get(nb - 1).is_text() && !trim {
            let qt = pt;
            self.geom.cklinewrap(&mut pt, self.boxes.get(nb));
            if pt.y > qt.y {
                self.display
                    .draw(img, Rect::new(qt.x, qt.y, r.max.x, pt.y), back, qt);
            }
        }
        pt
    }

    /// Paint `p0..p1` from `pt` as selected or not. An empty range shows or
    /// hides the tick instead.
    pub fn draw_sel(&mut self, pt: Point, p0: usize, p1: usize, selected: bool) {
        if self.ticked {
            let t = self.ptofchar(self.p0);
            self.tick(t, false);
        }
        if p0 == p1 {
            self.tick(pt, selected);
            return;
        }
        let Some(pal) = self.palette else {
            trace!(target: "frame.select", "draw_sel_without_palette");
            return;
        };
        let (back, text) = if selected {
            (pal[ColorSlot::High], pal[ColorSlot::HText])
        } else {
            (pal[ColorSlot::Back], pal[ColorSlot::Text])
        };
        self.drawsel0(pt, p0, p1, back, text);
    }

    /// Show or hide the tick at `pt`. Saves the covered pixels on show and
    /// restores them on hide; does nothing if the state would not change.
    pub fn tick(&mut self, pt: Point, show: bool) {
        if self.ticked == show {
            return;
        }
        let (Some(tick), Some(tickback), Some(img)) = (self.tick, self.tickback, self.image) else {
            return;
        };
        let r = self.geom.r;
        if !r.contains(pt) {
            return;
        }
        let pt = Point::new(pt.x - 1, pt.y);
        let w = self.tick_width;
        let h = self.geom.height();
        let mut tr = Rect::new(pt.x, pt.y, pt.x + w, pt.y + h);
        // May enter the left border but not the right.
        if tr.max.x > r.max.x {
            tr.max.x = r.max.x;
        }
        if show {
            self.display
                .draw(tickback, Rect::new(0, 0, w, h), img, pt);
            self.display.draw(img, tr, tick, Point::ZERO);
        } else {
            self.display.draw(img, tr, tickback, Point::ZERO);
        }
        self.ticked = show;
        trace!(target: "frame.tick", x = pt.x, y = pt.y, show, "tick");
    }

    /// Fill the region between grid points `p0` and `p1` with `col`: the
    /// rest of `p0`'s line, any whole lines between, and the start of `p1`'s
    /// line. A `p0` at the right edge leaves its line untouched.
    pub fn selectpaint(&mut self, p0: Point, p1: Point, col: ImageId) {
        let Some(img) = self.image else {
            return;
        };
        let r = self.geom.r;
        let h = self.geom.height();
        if p0.y == r.max.y {
            return;
        }
        let q0 = Point::new(p0.x, p0.y + h);
        let q1 = Point::new(p1.x, p1.y + h);
        let n = (p1.y - p0.y) / h;
        let fill = |d: &mut D, rect: Rect| {
            if let Some(rect) = rect.intersect(&r) {
                d.draw(img, rect, col, Point::ZERO);
            }
        };
        if n == 0 {
            fill(&mut self.display, Rect::from_points(p0, q1));
        } else {
            fill(&mut self.display, Rect::new(p0.x, p0.y, r.max.x, q0.y));
            if n > 1 {
                fill(&mut self.display, Rect::new(r.min.x, q0.y, r.max.x, p1.y));
            }
            fill(&mut self.display, Rect::new(r.min.x, p1.y, q1.x, q1.y));
        }
    }

    /// Repaint all text: normal colors outside the selection, highlight
    /// inside. The tick survives.
    pub fn redraw(&mut self) {
        let Some(pal) = self.palette else {
            return;
        };
        let (back, text) = (pal[ColorSlot::Back], pal[ColorSlot::Text]);
        let (high, htext) = (pal[ColorSlot::High], pal[ColorSlot::HText]);
        if self.p0 == self.p1 {
            let ticked = self.ticked;
            if ticked {
                let pt = self.ptofchar(self.p0);
                self.tick(pt, false);
            }
            let pt = self.ptofchar(0);
            self.drawsel0(pt, 0, self.nchars, back, text);
            if ticked {
                let pt = self.ptofchar(self.p0);
                self.tick(pt, true);
            }
            return;
        }
        let pt = self.ptofchar(0);
        let pt = self.drawsel0(pt, 0, self.p0, back, text);
        let pt = self.drawsel0(pt, self.p0, self.p1, high, htext);
        self.drawsel0(pt, self.p1, self.nchars, back, text);
    }

    /// Draw every text box from `pt` with `text` over `back`.
    pub fn draw_text(&mut self, pt: Point, text: ImageId, back: ImageId) {
        let Some(img) = self.image else {
            return;
        };
        paint_text(
            &mut self.display,
            img,
            &self.geom,
            &self.boxes,
            pt,
            text,
            back,
            self.no_redraw,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use core_draw::{CellFont, Color, MemDisplay, Palette, PixelFormat};

    const BACK: Color = Color::PALE_YELLOW;
    const HIGH: Color = Color::DARK_YELLOW;

    fn frame() -> Frame<MemDisplay> {
        let mut d = MemDisplay::new();
        let pal = Palette::alloc_solid(
            &mut d,
            PixelFormat::Rgb24,
            [BACK, HIGH, Color::YELLOW_GREEN, Color::BLACK, Color::BLACK],
        )
        .unwrap();
        let img = d
            .alloc_image(Rect::new(0, 0, 80, 36), PixelFormat::Rgb24, false, BACK)
            .unwrap();
        let mut f = Frame::init(d, Rect::new(0, 0, 80, 36), Rc::new(CellFont::new(10, 12)), Some(img), Some(pal));
        f.set_maxtab(40);
        f
    }

    #[test]
    fn selectpaint_fills_l_shape() {
        let mut f = frame();
        let img = f.image().unwrap();
        let high = f.palette().unwrap()[ColorSlot::High];
        f.selectpaint(Point::new(50, 0), Point::new(20, 24), high);
        let d = f.display();
        assert!(d.is_solid(img, Rect::new(50, 0, 80, 12), HIGH));
        assert!(d.is_solid(img, Rect::new(0, 0, 50, 12), BACK));
        assert!(d.is_solid(img, Rect::new(0, 12, 80, 24), HIGH));
        assert!(d.is_solid(img, Rect::new(0, 24, 20, 36), HIGH));
        assert!(d.is_solid(img, Rect::new(20, 24, 80, 36), BACK));
    }

    #[test]
    fn tick_restores_pixels_on_hide() {
        let mut f = frame();
        f.insert_str("abc", 0);
        let img = f.image().unwrap();
        let before = f.display().snapshot(img).unwrap();
        // Insert leaves the tick shown at the end of the text.
        assert!(f.ticked());
        let pt = f.ptofchar(3);
        f.tick(pt, false);
        let hidden = f.display().snapshot(img).unwrap();
        f.tick(pt, true);
        assert_eq!(f.display().snapshot(img).unwrap(), before);
        assert_ne!(hidden, before);
        f.tick(pt, true);
        assert_eq!(f.display().snapshot(img).unwrap(), before);
    }

    #[test]
    fn tick_outside_rect_is_ignored() {
        let mut f = frame();
        f.tick(Point::new(80, 0), true);
        assert!(!f.ticked());
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut f = frame();
        f.insert_str("one\ttwo three four\nfive", 0);
        f.set_select(2, 9);
        f.redraw();
        let img = f.image().unwrap();
        let a = f.display().snapshot(img).unwrap();
        f.redraw();
        assert_eq!(f.display().snapshot(img).unwrap(), a);
    }

    #[test]
    fn selection_fill_extends_to_edge_at_wrap() {
        let mut f = frame();
        // The double-width rune has no room after "abcdefg" and wraps whole.
        f.insert_str("abcdefg界", 0);
        assert_eq!(f.ptofchar(7), Point::new(0, 12));
        let img = f.image().unwrap();
        let pt = f.ptofchar(4);
        f.draw_sel(pt, 4, 7, true);
        assert!(f.display().is_solid(img, Rect::new(70, 0, 80, 12), HIGH));
        assert_eq!(f.display().pixel(img, Point::new(39, 0)), Some(BACK));
    }
}
