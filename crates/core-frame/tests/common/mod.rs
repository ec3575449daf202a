#![allow(dead_code)] // Shared across the integration test binaries; each uses a subset.

use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};

use core_draw::{CellFont, Color, Display, MemDisplay, Palette, PixelFormat, Point, Rect};
use core_frame::Frame;
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Pixel width of one character cell.
pub const CELL: i32 = 10;
/// Pixel height of one line.
pub const LINE: i32 = 12;

pub const BACK: Color = Color::PALE_YELLOW;
pub const HIGH: Color = Color::DARK_YELLOW;
pub const BORDER: Color = Color::YELLOW_GREEN;
pub const TEXT: Color = Color::BLACK;
pub const HTEXT: Color = Color::rgb(0x20_20_20);

/// A frame `cols` cells wide and `lines` lines high on a fresh in-memory
/// display, tab stops every four cells.
pub fn frame(cols: i32, lines: i32) -> Frame<MemDisplay> {
    let mut d = MemDisplay::new();
    let pal = Palette::alloc_solid(&mut d, PixelFormat::Rgb24, [BACK, HIGH, BORDER, TEXT, HTEXT])
        .expect("palette");
    let r = Rect::new(0, 0, cols * CELL, lines * LINE);
    let img = d
        .alloc_image(r, PixelFormat::Rgb24, false, BACK)
        .expect("backing image");
    let mut f = Frame::init(d, r, Rc::new(CellFont::new(CELL, LINE)), Some(img), Some(pal));
    f.set_maxtab(4 * CELL);
    f
}

/// A frame of the same shape holding `text`, inserted in one call.
pub fn fresh(cols: i32, lines: i32, text: &str) -> Frame<MemDisplay> {
    let mut f = frame(cols, lines);
    f.insert_str(text, 0);
    f
}

pub fn pixels(f: &Frame<MemDisplay>) -> Vec<u32> {
    let img = f.image().expect("bound image");
    f.display().snapshot(img).expect("snapshot")
}

pub fn pixel(f: &Frame<MemDisplay>, x: i32, y: i32) -> Option<Color> {
    let img = f.image().expect("bound image");
    f.display().pixel(img, Point::new(x, y))
}

pub fn solid(f: &Frame<MemDisplay>, r: Rect, color: Color) -> bool {
    let img = f.image().expect("bound image");
    f.display().is_solid(img, r, color)
}

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a subscriber that records everything at `level` and above,
/// returning the formatted log lines.
pub fn capture<F: FnOnce()>(level: Level, f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter {
        inner: buffer.clone(),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    with_default(subscriber, f);
    let bytes = buffer.lock().expect("log buffer poisoned").clone();
    String::from_utf8(bytes).expect("utf8 log")
}
