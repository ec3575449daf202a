//! Frame lifecycle: binding, geometry, the tick images, teardown.

use std::rc::Rc;

use core_config::{Config, ConfigContext};
use core_draw::{Color, ColorSlot, Display, Font, ImageId, Palette, Point, Rect};
use tracing::{debug, info, trace, warn};

use crate::boxes::BoxStore;
use crate::layout::Geom;
use crate::{FRTICKW, Frame};

impl<D: Display> Frame<D> {
    /// Bind a frame to `r` on `image`, measuring with `font` and painting
    /// with `palette`. Tab stops default to eight widths of "0".
    pub fn init(
        display: D,
        r: Rect,
        font: Rc<dyn Font>,
        image: Option<ImageId>,
        palette: Option<Palette>,
    ) -> Self {
        let maxtab = 8 * font.string_width("0");
        let mut f = Frame {
            display,
            image: None,
            palette,
            geom: Geom::new(r, font, maxtab),
            entire: r,
            boxes: BoxStore::new(),
            p0: 0,
            p1: 0,
            nchars: 0,
            nlines: 0,
            maxlines: 0,
            last_line_full: false,
            modified: false,
            tick: None,
            tickback: None,
            ticked: false,
            tick_width: FRTICKW,
            no_redraw: false,
        };
        f.set_rects(r, image);
        if f.palette.is_some() {
            f.init_tick();
        }
        debug!(
            target: "frame.init",
            x0 = r.min.x, y0 = r.min.y, x1 = r.max.x, y1 = r.max.y,
            maxlines = f.maxlines,
            maxtab,
            ticked_images = f.tick.is_some(),
            "frame_init"
        );
        f
    }

    /// Rebind geometry. The text rectangle loses any partial bottom line.
    /// Nothing is repainted.
    pub fn set_rects(&mut self, r: Rect, image: Option<ImageId>) {
        let h = self.geom.height();
        self.image = image;
        self.entire = r;
        self.geom.r = r;
        self.geom.r.max.y -= r.dy() % h;
        self.maxlines = (r.dy() / h).max(0) as usize;
    }

    /// Tab stop spacing in pixels.
    pub fn set_maxtab(&mut self, maxtab: i32) {
        self.geom.maxtab = maxtab.max(1);
    }

    /// Apply `frame.toml` settings: tab stops (in widths of "0") and the tick
    /// width, clamped to this frame's geometry. Rebuilds the tick.
    pub fn apply_config(&mut self, cfg: &mut Config) {
        let digit = self.geom.font.string_width("0").max(1);
        let ctx = ConfigContext::new(self.geom.r.dx(), self.geom.height(), digit);
        let (tab, tick) = cfg.apply_context(ctx);
        self.set_maxtab(i32::from(tab) * digit);
        self.tick_width = i32::from(tick);
        if self.palette.is_some() {
            self.init_tick();
        }
        info!(target: "frame.init", maxtab = self.geom.maxtab, tick_width = self.tick_width, "config_applied");
    }

    /// Replace the palette and rebuild the tick to match.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = Some(palette);
        self.init_tick();
    }

    /// (Re)build the tick images from the current palette and font. Failure
    /// to allocate leaves the frame without a tick.
    pub fn init_tick(&mut self) {
        let Some(pal) = self.palette else {
            trace!(target: "frame.tick", "init_tick_without_palette");
            return;
        };
        if self.ticked {
            let pt = self.ptofchar(self.p0);
            self.tick(pt, false);
        }
        self.free_tick();
        self.ticked = false;

        let h = self.geom.height();
        let w = self.tick_width;
        let format = self
            .image
            .and_then(|i| self.display.pixel_format(i))
            .unwrap_or_default();
        let r = Rect::new(0, 0, w, h);
        let tick = match self.display.alloc_image(r, format, false, Color::WHITE) {
            Ok(id) => id,
            Err(e) => {
                warn!(target: "frame.tick", error = %e, "tick_alloc_failed");
                return;
            }
        };
        let back = match self.display.alloc_image(r, format, false, Color::WHITE) {
            Ok(id) => id,
            Err(e) => {
                warn!(target: "frame.tick", error = %e, "tickback_alloc_failed");
                self.display.free_image(tick);
                return;
            }
        };
        let text = pal[ColorSlot::Text];
        self.display.draw(tick, r, pal[ColorSlot::Back], Point::ZERO);
        self.display
            .draw(tick, Rect::new(w / 2, 0, w / 2 + 1, h), text, Point::ZERO);
        self.display.draw(tick, Rect::new(0, 0, w, w), text, Point::ZERO);
        self.display
            .draw(tick, Rect::new(0, h - w, w, h), text, Point::ZERO);
        self.tick = Some(tick);
        self.tickback = Some(back);
    }

    /// Drop all boxes and reset the counters. With `freeall`, the tick
    /// images go too.
    pub fn clear(&mut self, freeall: bool) {
        if !self.boxes.is_empty() {
            let n = self.boxes.len();
            self.boxes.del(0, n - 1);
        }
        self.boxes = BoxStore::new();
        if freeall {
            self.free_tick();
        }
        self.ticked = false;
        self.nchars = 0;
        self.nlines = 0;
        self.p0 = 0;
        self.p1 = 0;
        self.last_line_full = false;
        trace!(target: "frame.init", freeall, "frame_clear");
    }

    fn free_tick(&mut self) {
        for id in [self.tick.take(), self.tickback.take()].into_iter().flatten() {
            self.display.free_image(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_draw::{CellFont, MemDisplay, PixelFormat};

    fn palette(d: &mut MemDisplay) -> Palette {
        Palette::alloc_solid(
            d,
            PixelFormat::Rgb24,
            [
                Color::PALE_YELLOW,
                Color::DARK_YELLOW,
                Color::YELLOW_GREEN,
                Color::BLACK,
                Color::BLACK,
            ],
        )
        .unwrap()
    }

    #[test]
    fn set_rects_rounds_down_to_whole_lines() {
        let mut d = MemDisplay::new();
        let img = d
            .alloc_image(Rect::new(0, 0, 100, 100), PixelFormat::Rgb24, false, Color::WHITE)
            .unwrap();
        let f = Frame::init(d, Rect::new(0, 0, 100, 40), Rc::new(CellFont::new(7, 13)), Some(img), None);
        assert_eq!(f.maxlines(), 3);
        assert_eq!(f.r(), Rect::new(0, 0, 100, 39));
        assert_eq!(f.entire(), Rect::new(0, 0, 100, 40));
        assert_eq!(f.maxtab(), 56);
    }

    #[test]
    fn tick_images_follow_palette() {
        let mut d = MemDisplay::new();
        let pal = palette(&mut d);
        let img = d
            .alloc_image(Rect::new(0, 0, 80, 39), PixelFormat::Rgb24, false, Color::WHITE)
            .unwrap();
        let f = Frame::init(d, Rect::new(0, 0, 80, 39), Rc::new(CellFont::new(10, 13)), Some(img), Some(pal));
        let tick = f.tick.unwrap();
        let d = f.display();
        // Bar in the middle column, squares at both ends, background elsewhere.
        assert_eq!(d.pixel(tick, Point::new(1, 6)), Some(Color::BLACK));
        assert_eq!(d.pixel(tick, Point::new(0, 6)), Some(Color::PALE_YELLOW));
        assert_eq!(d.pixel(tick, Point::new(0, 0)), Some(Color::BLACK));
        assert_eq!(d.pixel(tick, Point::new(2, 12)), Some(Color::BLACK));
    }

    #[test]
    fn allocation_failure_leaves_frame_tickless() {
        let mut d = MemDisplay::new();
        let pal = palette(&mut d);
        let img = d
            .alloc_image(Rect::new(0, 0, 80, 39), PixelFormat::Rgb24, false, Color::WHITE)
            .unwrap();
        d.set_alloc_failure(true);
        let mut f = Frame::init(d, Rect::new(0, 0, 80, 39), Rc::new(CellFont::new(10, 13)), Some(img), Some(pal));
        assert!(f.tick.is_none());
        f.tick(Point::new(0, 0), true);
        assert!(!f.ticked());
    }

    #[test]
    fn clear_freeall_releases_tick_images() {
        let mut d = MemDisplay::new();
        let pal = palette(&mut d);
        let img = d
            .alloc_image(Rect::new(0, 0, 80, 39), PixelFormat::Rgb24, false, Color::WHITE)
            .unwrap();
        let mut f = Frame::init(d, Rect::new(0, 0, 80, 39), Rc::new(CellFont::new(10, 13)), Some(img), Some(pal));
        let before = f.display().live_images();
        f.insert_str("abc", 0);
        f.clear(true);
        assert_eq!(f.display().live_images(), before - 2);
        assert_eq!((f.nchars(), f.nlines(), f.p0(), f.p1()), (0, 0, 0, 0));
        assert!(f.boxes().is_empty());
    }

    #[test]
    fn apply_config_sets_tab_stops_in_digit_widths() {
        let d = MemDisplay::new();
        let mut f = Frame::init(d, Rect::new(0, 0, 80, 39), Rc::new(CellFont::new(10, 13)), None, None);
        let mut cfg = Config::default();
        cfg.file.frame.tab_width = 4;
        f.apply_config(&mut cfg);
        assert_eq!(f.maxtab(), 40);
        cfg.file.frame.tab_width = 50;
        f.apply_config(&mut cfg);
        assert_eq!(f.maxtab(), 80);
    }
}
