//! Raster capabilities consumed by the text frame.
//!
//! The frame never touches pixels directly. It talks to a `Display`, which
//! owns every image and hands out opaque `ImageId` handles, and measures text
//! through a `Font`. Keeping images behind handles lets one primitive
//! (`gen_draw`) express copies between images *and* scrolls within one image
//! (`src == dst`), which the frame uses to move text without repainting it.
//!
//! Contract for implementors:
//! - `gen_draw` copies `src` (aligned so that `sp` lands on `r.min`) into
//!   `r` of `dst`, clipped to `dst`'s rectangle and, for non-replicated
//!   sources, to the source rectangle. Replicated images tile the plane.
//! - Overlapping self-copies behave like `memmove`.
//! - A mask pixel with zero alpha leaves the destination untouched.
//! - Unknown handles are ignored; only `alloc_image` reports errors.
//! - Text drawing fills each glyph cell from `bg` before rendering the glyph
//!   with `src`, and returns the point just past the last drawn rune.
//!
//! `MemDisplay` is a complete in-memory implementation used by the tests and
//! the demo binary; `CellFont` is its companion fixed-cell font.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

mod font;
mod geom;
pub mod mem;
mod palette;

pub use font::{CellFont, Font};
pub use geom::{Point, Rect};
pub use mem::MemDisplay;
pub use palette::{Color, ColorSlot, NCOL, Palette, PixelFormat};

/// Opaque handle to an image owned by a `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ImageId(pub u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("cannot allocate image {rect:?}: {reason}")]
    Alloc { rect: Rect, reason: &'static str },
    #[error("unknown image {0:?}")]
    UnknownImage(ImageId),
}

pub trait Display {
    fn alloc_image(
        &mut self,
        r: Rect,
        format: PixelFormat,
        repl: bool,
        color: Color,
    ) -> Result<ImageId, DrawError>;

    fn free_image(&mut self, id: ImageId);

    fn image_rect(&self, id: ImageId) -> Option<Rect>;

    fn pixel_format(&self, id: ImageId) -> Option<PixelFormat>;

    /// Masked copy. See the module docs for alignment and clipping.
    fn gen_draw(
        &mut self,
        dst: ImageId,
        r: Rect,
        src: ImageId,
        sp: Point,
        mask: Option<ImageId>,
        mp: Point,
    );

    /// Draw up to `nrunes` runes of `text` at `pt` over a `bg` background.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Point;

    /// Opaque copy.
    fn draw(&mut self, dst: ImageId, r: Rect, src: ImageId, sp: Point) {
        self.gen_draw(dst, r, src, sp, None, Point::ZERO);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_string(
        &mut self,
        dst: ImageId,
        pt: Point,
        src: ImageId,
        sp: Point,
        font: &dyn Font,
        text: &str,
        bg: ImageId,
        bgp: Point,
    ) -> Point {
        self.draw_string_n(dst, pt, src, sp, font, text, usize::MAX, bg, bgp)
    }
}

impl<D: Display + ?Sized> Display for &mut D {
    fn alloc_image(
        &mut self,
        r: Rect,
        format: PixelFormat,
        repl: bool,
        color: Color,
    ) -> Result<ImageId, DrawError> {
        (**self).alloc_image(r, format, repl, color)
    }

    fn free_image(&mut self, id: ImageId) {
        (**self).free_image(id)
    }

    fn image_rect(&self, id: ImageId) -> Option<Rect> {
        (**self).image_rect(id)
    }

    fn pixel_format(&self, id: ImageId) -> Option<PixelFormat> {
        (**self).pixel_format(id)
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
        (**self).gen_draw(dst, r, src, sp, mask, mp)
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
        (**self).draw_string_n(dst, pt, src, sp, font, text, nrunes, bg, bgp)
    }
}

/// Shared display: several frames (and the caller) can hold the same
/// connection. Borrows last for a single primitive.
impl<D: Display> Display for Rc<RefCell<D>> {
    fn alloc_image(
        &mut self,
        r: Rect,
        format: PixelFormat,
        repl: bool,
        color: Color,
    ) -> Result<ImageId, DrawError> {
        self.borrow_mut().alloc_image(r, format, repl, color)
    }

    fn free_image(&mut self, id: ImageId) {
        self.borrow_mut().free_image(id)
    }

    fn image_rect(&self, id: ImageId) -> Option<Rect> {
        self.borrow().image_rect(id)
    }

    fn pixel_format(&self, id: ImageId) -> Option<PixelFormat> {
        self.borrow().pixel_format(id)
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
        self.borrow_mut().gen_draw(dst, r, src, sp, mask, mp)
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
        self.borrow_mut()
            .draw_string_n(dst, pt, src, sp, font, text, nrunes, bg, bgp)
    }
}
