//! Font discovery for plot labels
//!
//! Plotters is built with the `ab_glyph` text backend, which only draws fonts that
//! were registered by name. We register the first readable TrueType file out of:
//! 1. An explicit path from the plot options
//! 2. The `LINVIZ_FONT` environment variable
//! 3. A list of common system locations
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use plotters::style::FontStyle;

use crate::error::{Error, Result};

/// Environment variable naming a `.ttf` file to use for labels
pub const FONT_ENV: &str = "LINVIZ_FONT";

/// Family name the font is registered under
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

/// Paths searched for a font, in priority order
pub fn font_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(FONT_ENV) {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    candidates
}

/// True if `bytes` start with a TrueType, OpenType or font collection signature
fn is_font_file(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some(&[0x00, 0x01, 0x00, 0x00] | b"true" | b"OTTO" | b"ttcf")
    )
}

/// Register a font for plot labels, returning the file it was loaded from.
///
/// The font is registered once per process. After that, every call returns the
/// path of the registered font, even if `explicit` names a different file.
///
/// # Errors
/// Returns [`Error::FontUnavailable`] if none of the candidates is a readable font.
pub fn register_font(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = REGISTERED.get() {
        if explicit.is_some_and(|e| e != path.as_path()) {
            tracing::debug!(
                registered = %path.display(),
                "Font already registered; ignoring requested font"
            );
        }
        return Ok(path.clone());
    }

    let candidates = font_candidates(explicit);
    for path in &candidates {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        if !is_font_file(&bytes) {
            tracing::warn!(path = %path.display(), "Skipping file that is not a font");
            continue;
        }

        // Plotters keeps a reference to the font data for the life of the process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_err() {
            tracing::warn!(path = %path.display(), "Skipping unreadable font");
            continue;
        }

        tracing::debug!(path = %path.display(), "Registered plot font");
        return Ok(REGISTERED.get_or_init(|| path.clone()).clone());
    }

    Err(Error::FontUnavailable(candidates))
}
