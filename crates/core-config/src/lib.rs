//! Configuration loading for text frames.
//!
//! Parses `frame.toml` (or an override path supplied by the binary). Every
//! section and key is optional; unknown keys are ignored so the file can grow
//! without breaking older builds. Values that depend on the frame geometry
//! (tab stop width, caret width) are clamped later by `Config::apply_context`,
//! once the caller knows the rectangle and font. The raw parsed values are
//! retained so a resize can re-clamp from the original numbers.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "frame.toml";
pub const CONFIG_DIR_NAME: &str = "framedemo";

/// Geometry the clamps depend on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub rect_width: i32,
    pub font_height: i32,
    /// Width of the digit "0"; tab stops are measured in these.
    pub digit_width: i32,
}

impl ConfigContext {
    pub fn new(rect_width: i32, font_height: i32, digit_width: i32) -> Self {
        Self {
            rect_width,
            font_height,
            digit_width,
        }
    }

    /// Largest tab width (in digits) whose stop still fits in the rectangle.
    pub fn max_tab_width(&self) -> u16 {
        let digit = self.digit_width.max(1);
        (self.rect_width / digit).clamp(1, u16::MAX as i32) as u16
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FrameSection {
    #[serde(default = "FrameSection::default_tab_width")]
    pub tab_width: u16,
    #[serde(default = "FrameSection::default_tick_width")]
    pub tick_width: u16,
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            tick_width: Self::default_tick_width(),
        }
    }
}

impl FrameSection {
    const fn default_tab_width() -> u16 {
        8
    }
    const fn default_tick_width() -> u16 {
        3
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SelectSection {
    #[serde(default = "SelectSection::default_auto_scroll")]
    pub auto_scroll: bool,
}

impl Default for SelectSection {
    fn default() -> Self {
        Self {
            auto_scroll: Self::default_auto_scroll(),
        }
    }
}

impl SelectSection {
    const fn default_auto_scroll() -> bool {
        true
    }
}

/// Colors as `0xRRGGBB`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PaletteSection {
    #[serde(default = "PaletteSection::default_background")]
    pub background: u32,
    #[serde(default = "PaletteSection::default_highlight")]
    pub highlight: u32,
    #[serde(default = "PaletteSection::default_border")]
    pub border: u32,
    #[serde(default = "PaletteSection::default_text")]
    pub text: u32,
    #[serde(default = "PaletteSection::default_text")]
    pub highlighted_text: u32,
}

impl Default for PaletteSection {
    fn default() -> Self {
        Self {
            background: Self::default_background(),
            highlight: Self::default_highlight(),
            border: Self::default_border(),
            text: Self::default_text(),
            highlighted_text: Self::default_text(),
        }
    }
}

impl PaletteSection {
    const fn default_background() -> u32 {
        0xFF_FF_EA
    }
    const fn default_highlight() -> u32 {
        0xEE_EE_9E
    }
    const fn default_border() -> u32 {
        0x99_99_4C
    }
    const fn default_text() -> u32 {
        0x00_00_00
    }

    /// Colors in palette slot order: back, high, border, text, highlighted text.
    pub fn slots(&self) -> [u32; 5] {
        [
            self.background,
            self.highlight,
            self.border,
            self.text,
            self.highlighted_text,
        ]
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub frame: FrameSection,
    #[serde(default)]
    pub select: SelectSection,
    #[serde(default)]
    pub palette: PaletteSection,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub effective_tab_width: u16,
    pub effective_tick_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(None, ConfigFile::default())
    }
}

/// `./frame.toml` when present, else the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    }
    local
}

/// Load configuration. A missing file yields defaults; so does a malformed
/// one, with a warning.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config::from_file(Some(content), file))
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(raw: Option<String>, file: ConfigFile) -> Self {
        let (tab, tick) = (file.frame.tab_width, file.frame.tick_width);
        Self {
            raw,
            file,
            effective_tab_width: tab.max(1),
            effective_tick_width: tick.max(1),
        }
    }

    /// Clamp geometry-dependent values for `ctx`. Returns the effective
    /// `(tab_width, tick_width)`.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> (u16, u16) {
        let raw_tab = self.file.frame.tab_width;
        let max_tab = ctx.max_tab_width();
        let tab = raw_tab.clamp(1, max_tab);
        if tab != raw_tab {
            info!(
                target: "config",
                raw = raw_tab,
                clamped = tab,
                max = max_tab,
                rect_width = ctx.rect_width,
                digit_width = ctx.digit_width,
                "tab_width_clamped"
            );
        }

        let raw_tick = self.file.frame.tick_width;
        let max_tick = ctx.font_height.clamp(1, u16::MAX as i32) as u16;
        let tick = raw_tick.clamp(1, max_tick);
        if tick != raw_tick {
            info!(
                target: "config",
                raw = raw_tick,
                clamped = tick,
                max = max_tick,
                font_height = ctx.font_height,
                "tick_width_clamped"
            );
        }

        self.effective_tab_width = tab;
        self.effective_tick_width = tick;
        (tab, tick)
    }

    /// Re-clamp after a geometry change. `Some` when either value changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<(u16, u16)> {
        let prev = (self.effective_tab_width, self.effective_tick_width);
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}
