//! Deletion.
//!
//! The mirror of insertion: boxes after the deleted range are walked from
//! where they are (`pt1`) to where they will be (`pt0`) until the x
//! coordinates meet, blitting each one; the rest of the frame then moves up
//! by whole lines in one copy and the vacated bottom is cleared.

use core_draw::{ColorSlot, Display, Point, Rect};
use tracing::{debug, trace};

use crate::Frame;
use crate::error::{FrameError, trap};

impl<D: Display> Frame<D> {
    /// Delete characters `p0..p1`. Returns how many lines the frame lost,
    /// which the caller may refill.
    pub fn delete(&mut self, p0: usize, p1: usize) -> usize {
        if p0 >= self.nchars || p0 >= p1 || self.image.is_none() {
            trace!(target: "frame.delete", p0, p1, nchars = self.nchars, "delete_noop");
            return 0;
        }
        let (Some(img), Some(pal)) = (self.image, self.palette) else {
            return 0;
        };
        let p1 = p1.min(self.nchars);
        let font = self.geom.font.clone();
        let r = self.geom.r;
        let h = self.geom.height();

        let mut n0 = self.boxes.find(0, 0, p0, &*font);
        if n0 == self.boxes.len() {
            trap(FrameError::DeleteOffEnd { p0 });
        }
        let mut n1 = self.boxes.find(n0, p0, p1, &*font);
        let mut pt0 = self.ptofchar_nb(p0, n0);
        let mut pt1 = self.ptofchar(p1);
        if self.p0 == self.p1 {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, false);
        }
        let nn0 = n0;
        let mut ppt0 = pt0;
        self.boxes.free(n0, n1 - 1);
        self.modified = true;

        let high = pal[ColorSlot::High];
        let back = pal[ColorSlot::Back];
        let mut cn1 = p1;
        while pt1.x != pt0.x && n1 < self.boxes.len() {
            let col = if self.p0 <= cn1 && cn1 < self.p1 { high } else { back };
            let old = pt0;
            self.geom.cklinewrap0(&mut pt0, self.boxes.get(n1));
            if pt0.y > old.y {
                // The rest of the line the box used to continue is now empty.
                self.display
                    .draw(img, Rect::new(old.x, old.y, r.max.x, old.y + h), col, Point::ZERO);
            }
            self.geom.cklinewrap(&mut pt1, self.boxes.get(n1));
            let b = self.boxes.get(n1);
            let n = self.geom.canfit(pt0, b);
            if n == 0 {
                trap(FrameError::CannotFit { op: "delete", pt: pt0 });
            }
            if b.is_text() {
                if n != b.nrune() {
                    self.boxes.split(n1, n, &*font);
                }
                let b = self.boxes.get(n1);
                let rect = Rect::new(pt0.x, pt0.y, pt0.x + b.wid(), pt0.y + h);
                self.display.draw(img, rect, img, pt1);
                cn1 += b.nrune();
            } else {
                let x = (pt0.x + self.geom.newwid0(pt0, b)).min(r.max.x);
                self.display
                    .draw(img, Rect::new(pt0.x, pt0.y, x, pt0.y + h), col, Point::ZERO);
                cn1 += 1;
            }
            self.geom.advance(&mut pt1, self.boxes.get(n1));
            pt0.x += self.geom.newwid(pt0, self.boxes.get_mut(n1));
            self.boxes.swap(n0, n1);
            n0 += 1;
            n1 += 1;
        }
        if n1 == self.boxes.len() && pt0.x != pt1.x {
            // Deleted the tail of the frame.
            self.selectpaint(pt0, pt1, back);
        }
        if pt1.y != pt0.y {
            let pt2 = self
                .geom
                .ptofchar_ptb(&self.boxes.as_slice()[n1..], usize::MAX, pt1);
            if pt2.y > r.max.y {
                trap(FrameError::LayoutOverflow {
                    op: "delete",
                    pt: pt2,
                    max_y: r.max.y,
                });
            }
            if n1 < self.boxes.len() {
                let q0 = pt0.y + h;
                let q1 = pt1.y + h;
                let q2 = (pt2.y + h).min(r.max.y);
                self.display.draw(
                    img,
                    Rect::new(pt0.x, pt0.y, pt0.x + (r.max.x - pt1.x), q0),
                    img,
                    pt1,
                );
                self.display.draw(
                    img,
                    Rect::new(r.min.x, q0, r.max.x, q0 + (q2 - q1)),
                    img,
                    Point::new(r.min.x, q1),
                );
                self.selectpaint(Point::new(pt2.x, pt2.y - (pt1.y - pt0.y)), pt2, back);
            } else {
                self.selectpaint(pt0, pt2, back);
            }
        }
        self.boxes.close(n0, n1 - 1);

        let mut start = nn0;
        if start > 0 {
            let prev = self.boxes.get(start - 1);
            if prev.is_text() && ppt0.x - prev.wid() >= r.min.x {
                ppt0.x -= prev.wid();
                start -= 1;
            }
        }
        let end = self.boxes.len();
        self.clean(ppt0, start, end);

        let gone = p1 - p0;
        if self.p1 > p1 {
            self.p1 -= gone;
        } else if self.p1 > p0 {
            self.p1 = p0;
        }
        if self.p0 > p1 {
            self.p0 -= gone;
        } else if self.p0 > p0 {
            self.p0 = p0;
        }
        self.nchars -= gone;
        if self.p0 == self.p1 {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, true);
        }
        let before = self.nlines;
        self.recount_lines();
        debug!(
            target: "frame.delete",
            p0,
            p1,
            nchars = self.nchars,
            nlines = self.nlines,
            freed = before.saturating_sub(self.nlines),
            "delete_complete"
        );
        before.saturating_sub(self.nlines)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use core_draw::{CellFont, Color, MemDisplay, Palette, PixelFormat};

    fn frame(lines: i32) -> Frame<MemDisplay> {
        let mut d = MemDisplay::new();
        let pal = Palette::alloc_solid(
            &mut d,
            PixelFormat::Rgb24,
            [Color::PALE_YELLOW, Color::DARK_YELLOW, Color::YELLOW_GREEN, Color::BLACK, Color::BLACK],
        )
        .unwrap();
        let r = Rect::new(0, 0, 80, 12 * lines);
        let img = d.alloc_image(r, PixelFormat::Rgb24, false, Color::PALE_YELLOW).unwrap();
        let mut f = Frame::init(d, r, Rc::new(CellFont::new(10, 12)), Some(img), Some(pal));
        f.set_maxtab(40);
        f
    }

    #[test]
    fn delete_past_end_is_noop() {
        let mut f = frame(3);
        f.insert_str("abc", 0);
        f.set_modified(false);
        assert_eq!(f.delete(3, 5), 0);
        assert_eq!(f.delete(2, 2), 0);
        assert!(!f.modified());
        assert_eq!(f.text(), "abc");
    }

    #[test]
    fn delete_clamps_end() {
        let mut f = frame(3);
        f.insert_str("abcdef", 0);
        f.delete(4, 100);
        assert_eq!(f.text(), "abcd");
        assert_eq!(f.nchars(), 4);
        f.check_invariants().unwrap();
    }

    #[test]
    fn deleting_newline_joins_lines_and_reports_lost_line() {
        let mut f = frame(3);
        f.insert_str("ab\ncd\nef", 0);
        assert_eq!(f.nlines(), 3);
        let lost = f.delete(2, 3);
        assert_eq!(lost, 1);
        assert_eq!(f.text(), "abcd\nef");
        assert_eq!(f.nlines(), 2);
        f.check_invariants().unwrap();
    }

    #[test]
    fn selection_shrinks_around_deleted_range() {
        let mut f = frame(3);
        f.insert_str("0123456789", 0);
        f.set_select(2, 8);
        f.delete(4, 6);
        assert_eq!((f.p0(), f.p1()), (2, 6));
        f.set_select(5, 6);
        f.delete(3, 7);
        assert_eq!((f.p0(), f.p1()), (3, 3));
    }

    #[test]
    fn pixels_match_fresh_layout_after_delete() {
        let mut f = frame(4);
        f.insert_str("hello\tworld\nsecond line", 0);
        f.delete(1, 8);
        let img = f.image().unwrap();
        let got = f.display().snapshot(img).unwrap();

        let mut g = frame(4);
        g.insert_str(&f.text(), 0);
        let want = g.display().snapshot(g.image().unwrap()).unwrap();
        assert_eq!(f.text(), "hrld\nsecond line");
        assert_eq!(got, want);
    }
}
