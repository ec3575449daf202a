//! Colors, pixel formats and the five-slot frame palette.

use std::ops::Index;

use crate::{Display, DrawError, ImageId, Rect};

/// RGBA color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0x0000_00FF);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const PALE_YELLOW: Color = Color(0xFFFF_EAFF);
    pub const DARK_YELLOW: Color = Color(0xEEEE_9EFF);
    pub const YELLOW_GREEN: Color = Color(0x9999_4CFF);

    /// Opaque color from `0xRRGGBB`.
    pub const fn rgb(rgb: u32) -> Color {
        Color((rgb << 8) | 0xFF)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }
    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

/// Pixel format descriptor carried by every image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Grey8,
    #[default]
    Rgb24,
    Rgba32,
}

impl PixelFormat {
    pub const fn depth(&self) -> u32 {
        match self {
            PixelFormat::Grey8 => 8,
            PixelFormat::Rgb24 => 24,
            PixelFormat::Rgba32 => 32,
        }
    }

    /// Reduce `c` to what an image of this format can hold.
    pub fn quantize(&self, c: Color) -> Color {
        match self {
            PixelFormat::Grey8 => {
                let l = (c.r() as u32 * 299 + c.g() as u32 * 587 + c.b() as u32 * 114) / 1000;
                Color((l << 24) | (l << 16) | (l << 8) | 0xFF)
            }
            PixelFormat::Rgb24 => Color(c.0 | 0xFF),
            PixelFormat::Rgba32 => c,
        }
    }
}

/// Palette slots a frame paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Back,
    High,
    Border,
    Text,
    HText,
}

pub const NCOL: usize = 5;

impl ColorSlot {
    pub const ALL: [ColorSlot; NCOL] = [
        ColorSlot::Back,
        ColorSlot::High,
        ColorSlot::Border,
        ColorSlot::Text,
        ColorSlot::HText,
    ];

    const fn index(self) -> usize {
        match self {
            ColorSlot::Back => 0,
            ColorSlot::High => 1,
            ColorSlot::Border => 2,
            ColorSlot::Text => 3,
            ColorSlot::HText => 4,
        }
    }
}

/// Five caller-owned images, usually 1×1 replicated solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette([ImageId; NCOL]);

impl Palette {
    pub const fn new(images: [ImageId; NCOL]) -> Self {
        Self(images)
    }

    /// Allocate one replicated solid per slot, in `ColorSlot::ALL` order.
    pub fn alloc_solid<D: Display + ?Sized>(
        display: &mut D,
        format: PixelFormat,
        colors: [Color; NCOL],
    ) -> Result<Self, DrawError> {
        let mut ids = [ImageId::default(); NCOL];
        for (slot, color) in ids.iter_mut().zip(colors) {
            *slot = display.alloc_image(Rect::new(0, 0, 1, 1), format, true, color)?;
        }
        Ok(Self(ids))
    }

    /// Release images allocated by `alloc_solid`.
    pub fn free<D: Display + ?Sized>(self, display: &mut D) {
        for id in self.0 {
            display.free_image(id);
        }
    }

    pub fn images(&self) -> &[ImageId; NCOL] {
        &self.0
    }
}

impl Index<ColorSlot> for Palette {
    type Output = ImageId;
    fn index(&self, slot: ColorSlot) -> &ImageId {
        &self.0[slot.index()]
    }
}
