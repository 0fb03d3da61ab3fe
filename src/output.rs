//! CLI output formatting.
//!
//! Output leads with each bundle's identity (positional index and name), with
//! the source file and the resolved filename of every format shown as
//! indented context lines:
//!
//! ```text
//! 001 avatar (2 formats, version 3)
//!     Source: upload.jpg
//!     original → avatar-v3.jpg
//!     001 thumb → avatar-thumb-v3.webp
//!         100x100, crop TOP_CENTER, type webp
//!     002 large → avatar-large-v3.jpg
//!         800x800, crop DEFAULT
//! ```
//!
//! Each `format_*` function is pure and returns `Vec<String>`; the `print_*`
//! wrappers write to stdout.

use crate::types::{ResolvedBundle, ResolvedVariant};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Bundle header: index, name, format count, and version when versioned.
fn bundle_header(index: usize, bundle: &ResolvedBundle) -> String {
    let count = plural(bundle.variants.len(), "format");
    match bundle.version {
        Some(v) if v > 0 => format!(
            "{} {} ({}, version {})",
            format_index(index),
            bundle.name,
            count,
            v
        ),
        _ => format!("{} {} ({})", format_index(index), bundle.name, count),
    }
}

/// Descriptor summary: dimensions, crop, and any non-default hints.
///
/// ```text
/// 100x100, crop TOP_CENTER, type webp, quality 0.85
/// ```
fn variant_details(variant: &ResolvedVariant) -> String {
    let mut parts = vec![
        format!("{}x{}", variant.width, variant.height),
        format!("crop {}", variant.crop),
    ];
    if variant.image_type.extension().is_some() {
        parts.push(format!("type {}", variant.image_type));
    }
    if let Some(q) = variant.quality {
        parts.push(format!("quality {q}"));
    }
    if let Some(d) = variant.density {
        parts.push(format!("density {d}"));
    }
    parts.join(", ")
}

/// Format every bundle with its resolved filenames.
pub fn format_list_output(bundles: &[ResolvedBundle]) -> Vec<String> {
    if bundles.is_empty() {
        return vec!["No bundles declared".to_string()];
    }

    let mut lines = Vec::new();
    for (i, bundle) in bundles.iter().enumerate() {
        lines.push(bundle_header(i + 1, bundle));
        lines.push(format!("{}Source: {}", indent(1), bundle.source));
        lines.push(format!("{}original → {}", indent(1), bundle.original));
        for (j, variant) in bundle.variants.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(j + 1),
                variant.name,
                variant.filename
            ));
            lines.push(format!("{}{}", indent(2), variant_details(variant)));
        }
    }
    lines
}

pub fn print_list_output(bundles: &[ResolvedBundle]) {
    for line in format_list_output(bundles) {
        println!("{}", line);
    }
}

/// Summary line for `check`.
pub fn format_check_output(bundles: &[ResolvedBundle]) -> Vec<String> {
    let variants: usize = bundles.iter().map(|b| b.variants.len()).sum();
    vec![format!(
        "{}, {}",
        plural(bundles.len(), "bundle"),
        plural(variants, "format")
    )]
}

pub fn print_check_output(bundles: &[ResolvedBundle]) {
    for line in format_check_output(bundles) {
        println!("{}", line);
    }
}
