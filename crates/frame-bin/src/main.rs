//! framedemo: lay a text file out in a frame on an in-memory display,
//! optionally sweep a selection with a scripted mouse drag, and write the
//! backing image as a PPM.

mod document;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use core_draw::{CellFont, Color, ColorSlot, Display, MemDisplay, NCOL, Palette, PixelFormat, Point, Rect};
use core_events::{Buttons, Mouse, MouseChannel, drag_script};
use core_frame::Frame;
use document::Document;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "framedemo.log";
/// Border drawn around the frame rectangle, in pixels.
const MARGIN: i32 = 4;
/// Intermediate mouse samples in a scripted drag.
const DRAG_STEPS: u32 = 8;

const WELCOME: &str = "framedemo\n\
\n\
Pass a UTF-8 text file to lay it out here.\n\
\tTabs stop every eight cells; long lines wrap at the right edge.\n\
Use --drag x0,y0:x1,y1 to sweep a selection.\n";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "framedemo", version, about = "Render text through a frame")]
struct Args {
    /// Text file to show. If omitted a welcome text is used.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `frame.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Frame width in cells.
    #[arg(long, default_value_t = 80)]
    pub cols: i32,
    /// Frame height in lines.
    #[arg(long, default_value_t = 24)]
    pub lines: i32,
    /// Cell width of the font in pixels.
    #[arg(long, default_value_t = 7)]
    pub cell: i32,
    /// Line height of the font in pixels.
    #[arg(long, default_value_t = 13)]
    pub height: i32,
    /// First document line shown.
    #[arg(long, default_value_t = 0)]
    pub origin: usize,
    /// Mouse drag "x0,y0:x1,y1" in image coordinates.
    #[arg(long)]
    pub drag: Option<String>,
    /// Output image.
    #[arg(long, default_value = "frame.ppm")]
    pub out: PathBuf,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Drag {
    from: Point,
    to: Point,
}

fn parse_point(s: &str) -> Result<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected x,y, got {s:?}"))?;
    Ok(Point::new(
        x.trim().parse().with_context(|| format!("bad x in {s:?}"))?,
        y.trim().parse().with_context(|| format!("bad y in {s:?}"))?,
    ))
}

fn parse_drag(s: &str) -> Result<Drag> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected x0,y0:x1,y1, got {s:?}"))?;
    Ok(Drag {
        from: parse_point(from)?,
        to: parse_point(to)?,
    })
}

fn load_document(path: Option<&Path>) -> Result<Document> {
    let Some(path) = path else {
        return Ok(Document::from_text(WELCOME));
    };
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let doc = Document::from_reader(file).with_context(|| format!("read {}", path.display()))?;
    tracing::debug!(
        target: "runtime",
        file = %path.display(),
        chars = doc.len_chars(),
        lines = doc.len_lines(),
        "document_loaded"
    );
    Ok(doc)
}

/// Frame on a fresh display: the frame rectangle sits `MARGIN` pixels inside
/// a border-colored backing image.
fn build_frame(args: &Args, colors: [Color; NCOL]) -> Result<Frame<MemDisplay>> {
    if args.cols <= 0 || args.lines <= 0 || args.cell <= 0 || args.height <= 0 {
        bail!("frame and font dimensions must be positive");
    }
    let mut display = MemDisplay::new();
    let palette = Palette::alloc_solid(&mut display, PixelFormat::Rgb24, colors)?;
    let r = Rect::new(
        MARGIN,
        MARGIN,
        MARGIN + args.cols * args.cell,
        MARGIN + args.lines * args.height,
    );
    let entire = Rect::new(0, 0, r.max.x + MARGIN, r.max.y + MARGIN);
    let image = display.alloc_image(entire, PixelFormat::Rgb24, false, Color::TRANSPARENT)?;
    display.draw(image, entire, palette[ColorSlot::Border], Point::ZERO);
    display.draw(image, r, palette[ColorSlot::Back], Point::ZERO);
    let font = Rc::new(CellFont::new(args.cell, args.height));
    Ok(Frame::init(display, r, font, Some(image), Some(palette)))
}

/// Sweep a selection. Events come from a feeder thread over a mouse channel,
/// the way a window system would deliver them.
fn run_drag(frame: &mut Frame<MemDisplay>, doc: &mut Document, drag: &Drag, auto_scroll: bool) -> Result<()> {
    let (tx, mut rx) = MouseChannel::pair();
    let script = drag_script(drag.from, drag.to, DRAG_STEPS);
    let feeder = thread::spawn(move || {
        for m in script {
            if !tx.send(m) {
                break;
            }
        }
    });
    let press = Mouse::at(drag.from.x, drag.from.y, Buttons::LEFT);
    if auto_scroll {
        let mut scroll = |f: &mut Frame<MemDisplay>, delta: i32| doc.scroll(f, delta);
        frame.select(&mut rx, press, Some(&mut scroll));
    } else {
        frame.select(&mut rx, press, None);
    }
    feeder
        .join()
        .map_err(|_| anyhow!("mouse feeder thread panicked"))?;
    Ok(())
}

fn write_image(frame: &Frame<MemDisplay>, out: &Path) -> Result<()> {
    let image = frame.image().ok_or_else(|| anyhow!("frame has no image"))?;
    let file = File::create(out).with_context(|| format!("create {}", out.display()))?;
    let mut w = BufWriter::new(file);
    frame.display().write_ppm(image, &mut w)?;
    w.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut config = core_config::load_from(args.config.clone())?;
    let mut doc = load_document(args.path.as_deref())?;
    doc.set_origin_line(args.origin);

    let colors = config.file.palette.slots().map(Color::rgb);
    let mut frame = build_frame(args, colors)?;
    frame.apply_config(&mut config);
    doc.fill(&mut frame);
    info!(
        target: "runtime",
        origin = doc.origin(),
        nchars = frame.nchars(),
        nlines = frame.nlines(),
        full = frame.last_line_full(),
        "document_shown"
    );

    if let Some(arg) = args.drag.as_deref() {
        let drag = parse_drag(arg)?;
        run_drag(&mut frame, &mut doc, &drag, config.file.select.auto_scroll)?;
        let (q0, q1) = doc.selection(&frame);
        info!(target: "runtime", q0, q1, origin = doc.origin(), "selection_done");
    }

    write_image(&frame, &args.out)?;
    info!(target: "runtime", out = %args.out.display(), "image_written");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = AppStartup::new();
    app.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");
    let result = run(&args);
    if let Err(e) = &result {
        tracing::error!(target: "runtime", error = %e, "run_failed");
    }
    info!(target: "runtime", "shutdown");
    result
}
