//! In-memory display.
//!
//! Every image is a `Vec<u32>` of packed RGBA pixels. Glyphs are rendered as
//! a deterministic bit pattern derived from the rune, which is enough for
//! tests to tell text from background and one rune from another.

use std::io::{self, Write};

use tracing::trace;

use crate::{Color, Display, DrawError, Font, ImageId, PixelFormat, Point, Rect};

#[derive(Debug, Clone)]
struct MemImage {
    r: Rect,
    format: PixelFormat,
    repl: bool,
    pixels: Vec<u32>,
}

impl MemImage {
    fn index(&self, p: Point) -> Option<usize> {
        let (w, h) = (self.r.dx(), self.r.dy());
        let (mut x, mut y) = (p.x - self.r.min.x, p.y - self.r.min.y);
        if self.repl {
            x = x.rem_euclid(w);
            y = y.rem_euclid(h);
        } else if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        Some(y as usize * w as usize + x as usize)
    }

    fn get(&self, p: Point) -> Option<Color> {
        self.index(p).map(|i| Color(self.pixels[i]))
    }

    fn put(&mut self, p: Point, c: Color) {
        // Writes never wrap, even into replicated images.
        if !self.r.contains(p) {
            return;
        }
        if let Some(i) = self.index(p) {
            self.pixels[i] = self.format.quantize(c).0;
        }
    }
}

#[derive(Debug, Default)]
pub struct MemDisplay {
    images: Vec<Option<MemImage>>,
    fail_alloc: bool,
}

impl MemDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `alloc_image` fail (exercises tickless frames).
    pub fn set_alloc_failure(&mut self, fail: bool) {
        self.fail_alloc = fail;
    }

    /// Number of images currently allocated.
    pub fn live_images(&self) -> usize {
        self.images.iter().filter(|i| i.is_some()).count()
    }

    /// Convenience: 1×1 replicated solid.
    pub fn alloc_solid(&mut self, color: Color) -> Result<ImageId, DrawError> {
        self.alloc_image(Rect::new(0, 0, 1, 1), PixelFormat::Rgba32, true, color)
    }

    pub fn pixel(&self, id: ImageId, p: Point) -> Option<Color> {
        let img = self.image(id)?;
        if !img.r.contains(p) {
            return None;
        }
        img.get(p)
    }

    /// Copy of the raw pixel buffer, row-major over the image rectangle.
    pub fn snapshot(&self, id: ImageId) -> Option<Vec<u32>> {
        self.image(id).map(|i| i.pixels.clone())
    }

    /// Count pixels equal to `color` inside `r` (clipped to the image).
    pub fn count_color(&self, id: ImageId, r: Rect, color: Color) -> usize {
        let Some(img) = self.image(id) else {
            return 0;
        };
        let Some(r) = r.intersect(&img.r) else {
            return 0;
        };
        let want = img.format.quantize(color);
        let mut n = 0;
        for y in r.min.y..r.max.y {
            for x in r.min.x..r.max.x {
                if img.get(Point::new(x, y)) == Some(want) {
                    n += 1;
                }
            }
        }
        n
    }

    /// True when every pixel of `r` equals `color`.
    pub fn is_solid(&self, id: ImageId, r: Rect, color: Color) -> bool {
        if r.is_empty() {
            return true;
        }
        let area = (r.dx() * r.dy()) as usize;
        match self.image(id).and_then(|i| r.intersect(&i.r)) {
            Some(clipped) if clipped == r => self.count_color(id, r, color) == area,
            _ => false,
        }
    }

    /// Binary PPM (P6) dump of an image.
    pub fn write_ppm<W: Write>(&self, id: ImageId, mut w: W) -> io::Result<()> {
        let img = self
            .image(id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unknown image"))?;
        write!(w, "P6\n{} {}\n255\n", img.r.dx(), img.r.dy())?;
        let mut row = Vec::with_capacity(img.r.dx() as usize * 3);
        for chunk in img.pixels.chunks(img.r.dx() as usize) {
            row.clear();
            for &px in chunk {
                let c = Color(px);
                row.extend_from_slice(&[c.r(), c.g(), c.b()]);
            }
            w.write_all(&row)?;
        }
        Ok(())
    }

    fn image(&self, id: ImageId) -> Option<&MemImage> {
        self.images.get(id.0 as usize)?.as_ref()
    }

    fn image_mut(&mut self, id: ImageId) -> Option<&mut MemImage> {
        self.images.get_mut(id.0 as usize)?.as_mut()
    }
}

/// Glyph pattern: whitespace is blank; anything else sets a rune-dependent
/// subset of the cell interior.
fn glyph_bit(c: char, lx: i32, ly: i32, w: i32, h: i32) -> bool {
    if c.is_whitespace() || lx < 1 || lx >= w - 1 || ly < 2 || ly >= h - 2 {
        return false;
    }
    let seed = (c as u32).wrapping_mul(2_654_435_761);
    (seed >> ((lx * 3 + ly) % 29)) & 1 == 1 || lx == 1
}

impl Display for MemDisplay {
    fn alloc_image(
        &mut self,
        r: Rect,
        format: PixelFormat,
        repl: bool,
        color: Color,
    ) -> Result<ImageId, DrawError> {
        if self.fail_alloc {
            return Err(DrawError::Alloc {
                rect: r,
                reason: "allocation disabled",
            });
        }
        if r.is_empty() {
            return Err(DrawError::Alloc {
                rect: r,
                reason: "empty rectangle",
            });
        }
        let n = r.dx() as usize * r.dy() as usize;
        let img = MemImage {
            r,
            format,
            repl,
            pixels: vec![format.quantize(color).0; n],
        };
        // Handle 0 is never issued.
        if self.images.is_empty() {
            self.images.push(None);
        }
        let id = ImageId(self.images.len() as u32);
        self.images.push(Some(img));
        trace!(target: "draw.mem", id = id.0, w = r.dx(), h = r.dy(), repl, "alloc_image");
        Ok(id)
    }

    fn free_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn image_rect(&self, id: ImageId) -> Option<Rect> {
        self.image(id).map(|i| i.r)
    }

    fn pixel_format(&self, id: ImageId) -> Option<PixelFormat> {
        self.image(id).map(|i| i.format)
    }

    fn gen_draw(
        &mut self,
        dst: ImageId,
        r: Rect,
        src: ImageId,
        sp: Point,
        mask: Option<ImageId>,
        mp: Point,
    ) {
        let (Some(d), Some(s)) = (self.image(dst), self.image(src)) else {
            trace!(target: "draw.mem", dst = dst.0, src = src.0, "draw_unknown_image");
            return;
        };
        let m = match mask {
            Some(id) => match self.image(id) {
                Some(m) => Some(m),
                None => return,
            },
            None => None,
        };
        let sdelta = sp - r.min;
        let mdelta = mp - r.min;
        let mut clip = match r.intersect(&d.r) {
            Some(c) => c,
            None => return,
        };
        if !s.repl {
            clip = match clip.intersect(&s.r.translate(r.min - sp)) {
                Some(c) => c,
                None => return,
            };
        }
        if let Some(m) = m
            && !m.repl
        {
            clip = match clip.intersect(&m.r.translate(r.min - mp)) {
                Some(c) => c,
                None => return,
            };
        }
        // Read everything first so overlapping self-copies behave.
        let mut staged = Vec::with_capacity((clip.dx() * clip.dy()) as usize);
        for y in clip.min.y..clip.max.y {
            for x in clip.min.x..clip.max.x {
                let p = Point::new(x, y);
                if let Some(m) = m
                    && m.get(p + mdelta).is_none_or(|c| c.a() == 0)
                {
                    continue;
                }
                if let Some(c) = s.get(p + sdelta) {
                    staged.push((p, c));
                }
            }
        }
        if let Some(d) = self.image_mut(dst) {
            for (p, c) in staged {
                d.put(p, c);
            }
        }
    }

    fn draw_string_n(
        &mut self,
        dst: ImageId,
        pt: Point,
        src: ImageId,
        sp: Point,
        font: &dyn Font,
        text: &str,
        nrunes: usize,
        bg: ImageId,
        bgp: Point,
    ) -> Point {
        let h = font.height();
        let start = pt;
        let mut pt = pt;
        for c in text.chars().take(nrunes) {
            let w = font.rune_width(c);
            let off = pt - start;
            self.draw(dst, Rect::new(pt.x, pt.y, pt.x + w, pt.y + h), bg, bgp + off);
            let Some(ink) = self.image(src).and_then(|s| s.get(sp + off)) else {
                pt.x += w;
                continue;
            };
            if let Some(d) = self.image_mut(dst) {
                for ly in 0..h {
                    for lx in 0..w {
                        if glyph_bit(c, lx, ly, w, h) {
                            d.put(Point::new(pt.x + lx, pt.y + ly), ink);
                        }
                    }
                }
            }
            pt.x += w;
        }
        pt
    }
}
