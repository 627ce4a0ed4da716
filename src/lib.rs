//! snlayout — staff-less notation layout for MusicXML scores.
//!
//! Notes are drawn as shaped heads on a grid of lines (seven per octave,
//! C and F lines coloured) with translucent bars spanning their duration.
//! Supports both uncompressed MusicXML (.musicxml) and compressed MXL
//! (.mxl) files.
//!
//! # Example
//! ```no_run
//! use snlayout::{layout_score, parse_file, LayoutPreferences};
//!
//! let (score, info) = parse_file("path/to/score.musicxml").unwrap();
//! let layout = layout_score(&score, &info, &LayoutPreferences::default(), 1000.0).unwrap();
//! println!("Title: {}", info.title);
//! println!("Rows: {}", layout.rows.len());
//! ```

pub mod error;
pub mod model;
pub mod mxl;
pub mod parser;
pub mod preferences;
pub mod renderer;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use error::{Error, LayoutError, ScoreError};
pub use model::*;
pub use mxl::parse_mxl;
pub use parser::parse_musicxml;
pub use preferences::{AccidentalDisplay, LayoutPreferences, PaletteColor, Scale, ShapeKind, Spacing};
pub use renderer::{
    error_notice_svg, layout_score, layout_to_json, layout_to_svg, render_rows_to_svg,
    render_score_to_svg, ScoreLayout,
};

/// Parse a MusicXML file from a file path.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<(Score, ScoreInfo), ScoreError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ScoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()))
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> Result<(Score, ScoreInfo), ScoreError> {
    match extension {
        Some("mxl") => parse_mxl(data),
        Some("musicxml") | Some("xml") => parse_musicxml(std::str::from_utf8(data)?),
        _ => {
            // ZIP archives start with "PK"; anything else is treated as XML.
            if data.starts_with(b"PK") {
                parse_mxl(data)
            } else {
                parse_musicxml(std::str::from_utf8(data)?)
            }
        }
    }
}

/// Convert a parsed score to a JSON string.
pub fn score_to_json(score: &Score) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(score)
}

/// Parse a score file and render it directly to one stacked SVG document.
pub fn render_file_to_svg<P: AsRef<Path>>(
    path: P,
    prefs: &LayoutPreferences,
    width: f64,
) -> Result<String, Error> {
    let (score, info) = parse_file(path)?;
    Ok(render_score_to_svg(&score, &info, prefs, width)?)
}

/// Parse score bytes and render them to one stacked SVG document.
pub fn render_bytes_to_svg(
    data: &[u8],
    extension: Option<&str>,
    prefs: &LayoutPreferences,
    width: f64,
) -> Result<String, Error> {
    let (score, info) = parse_bytes(data, extension)?;
    Ok(render_score_to_svg(&score, &info, prefs, width)?)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Preferences from an optional JSON C string; null means defaults.
///
/// # Safety
/// `prefs_json` must be null or a valid null-terminated C string.
unsafe fn prefs_from_c(prefs_json: *const c_char) -> Result<LayoutPreferences, Error> {
    if prefs_json.is_null() {
        return Ok(LayoutPreferences::default());
    }
    let json = unsafe { CStr::from_ptr(prefs_json) }
        .to_str()
        .map_err(|e| LayoutError::Config(format!("preferences are not UTF-8: {e}")))?;
    Ok(LayoutPreferences::from_json(json)?)
}

fn into_c_string(result: Result<String, Error>) -> *mut c_char {
    match result {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(e) => {
            log::error!("render failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Parse a score file and return SVG as a C string.
/// The caller must free the returned string with `snlayout_free_string`.
///
/// # Safety
/// `path` must be a valid null-terminated UTF-8 C string. `prefs_json` may
/// be null.
#[no_mangle]
pub unsafe extern "C" fn snlayout_render_file(
    path: *const c_char,
    prefs_json: *const c_char,
    width: f64,
) -> *mut c_char {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let result = unsafe { prefs_from_c(prefs_json) }
        .and_then(|prefs| render_file_to_svg(path_str, &prefs, width));
    into_c_string(result)
}

/// Parse score bytes and return SVG as a C string.
/// The caller must free the returned string with `snlayout_free_string`.
///
/// # Safety
/// `data` must point to `len` valid bytes. `extension` and `prefs_json`
/// may be null.
#[no_mangle]
pub unsafe extern "C" fn snlayout_render_bytes(
    data: *const u8,
    len: usize,
    extension: *const c_char,
    prefs_json: *const c_char,
    width: f64,
) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let ext = if extension.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(extension) }.to_str().ok()
    };

    let result = unsafe { prefs_from_c(prefs_json) }
        .and_then(|prefs| render_bytes_to_svg(bytes, ext, &prefs, width));
    into_c_string(result)
}

/// Free a string previously returned by snlayout functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a snlayout function, or null.
#[no_mangle]
pub unsafe extern "C" fn snlayout_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
