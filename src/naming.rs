//! Filename conventions shared by every [`ImageFormat`](crate::format::ImageFormat)
//! this crate ships.
//!
//! A filename is a stem plus an optional extension. Versioned filenames add
//! a `-v{N}` suffix to the stem so a new version never collides with a copy
//! cached under the old name:
//!
//! - `avatar.jpg` → stem `avatar`, extension `jpg`
//! - `avatar` + version 3 + `jpg` → `avatar-v3.jpg`
//! - `archive.tar.gz` → stem `archive.tar`, extension `gz`
//! - `.hidden` → stem `.hidden`, no extension
//! - `my.photos/upload` → stem `my.photos/upload`, no extension
//!
//! Variants of a bundle are keyed `{bundle}-{variant}` (see
//! [`qualified_name`]) so several bundles can share one namespace.

/// A filename split into stem and extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFilename {
    pub stem: String,
    /// Extension without the dot. `None` when the name has no dot, or only a
    /// leading one.
    pub extension: Option<String>,
}

/// Split a filename at the last dot of its final path component.
///
/// Dots in directory names are never an extension. A leading dot does not
/// start an extension, and neither does a trailing one (`"photo."` keeps the
/// dot in the stem). Any directory prefix stays on the stem.
pub fn split_filename(filename: &str) -> ParsedFilename {
    let name_start = filename.rfind(['/', '\\']).map_or(0, |pos| pos + 1);
    let name = &filename[name_start..];
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => ParsedFilename {
            stem: filename[..name_start + pos].to_string(),
            extension: Some(name[pos + 1..].to_string()),
        },
        _ => ParsedFilename {
            stem: filename.to_string(),
            extension: None,
        },
    }
}

/// Join a stem and optional extension.
pub fn compose(stem: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

/// Join a stem, version suffix, and optional extension: `stem-v3.ext`.
pub fn compose_versioned(stem: &str, version: u64, extension: Option<&str>) -> String {
    compose(&format!("{stem}-v{version}"), extension)
}

/// Namespace key for a bundle's variant: `avatar` + `thumb` → `avatar-thumb`.
pub fn qualified_name(bundle: &str, variant: &str) -> String {
    format!("{bundle}-{variant}")
}
