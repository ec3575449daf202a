use std::hint::black_box;
use std::rc::Rc;

use core_draw::{CellFont, Color, Display, MemDisplay, Palette, PixelFormat, Rect};
use core_frame::Frame;
use criterion::{Criterion, criterion_group, criterion_main};

const SAMPLE: &str = "fn main() {\n\tlet words = [\"alpha\", \"beta\", \"gamma\"];\n\tfor w in words {\n\t\tprintln!(\"{w}\");\n\t}\n}\n";

fn frame() -> Frame<MemDisplay> {
    let mut d = MemDisplay::new();
    let pal = Palette::alloc_solid(
        &mut d,
        PixelFormat::Rgb24,
        [Color::PALE_YELLOW, Color::DARK_YELLOW, Color::YELLOW_GREEN, Color::BLACK, Color::BLACK],
    )
    .unwrap();
    let r = Rect::new(0, 0, 640, 480);
    let img = d.alloc_image(r, PixelFormat::Rgb24, false, Color::PALE_YELLOW).unwrap();
    Frame::init(d, r, Rc::new(CellFont::default()), Some(img), Some(pal))
}

fn bench_fill(c: &mut Criterion) {
    c.bench_function("fill_frame", |b| {
        b.iter(|| {
            let mut f = frame();
            f.insert_str(black_box(&SAMPLE.repeat(4)), 0);
            black_box(f.nchars())
        })
    });
}

fn bench_typing(c: &mut Criterion) {
    c.bench_function("type_then_backspace_mid_frame", |b| {
        let mut f = frame();
        f.insert_str(&SAMPLE.repeat(4), 0);
        let at = f.nchars() / 3;
        b.iter(|| {
            f.insert_str(black_box("x"), at);
            f.delete(at, at + 1);
        })
    });
}

criterion_group!(benches, bench_fill, bench_typing);
criterion_main!(benches);
