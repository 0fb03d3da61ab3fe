//! Serializable view of resolved bundles.
//!
//! This is what `list --json` emits: every bundle with the filenames its
//! formats resolve to under the bundle's current version.

use crate::config::{Bundle, Bundles};
use crate::crop::CropAnchor;
use crate::image_type::ImageType;
use serde::{Deserialize, Serialize};

/// A bundle with its resolved filenames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBundle {
    pub name: String,
    /// Filename of the base (source) format.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Resolved filename of the original.
    pub original: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ResolvedVariant>,
}

/// A derived variant with its resolved filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    /// Namespace key (`{bundle}-{variant}`).
    pub key: String,
    /// Declared variant name.
    pub name: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub crop: CropAnchor,
    #[serde(rename = "type")]
    pub image_type: ImageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f32>,
}

impl ResolvedBundle {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let registry = &bundle.registry;
        let variants = bundle
            .variants
            .iter()
            .zip(bundle.variant_keys())
            .map(|(descriptor, key)| ResolvedVariant {
                filename: registry.filename_of(&key).unwrap_or_default(),
                key,
                name: descriptor.name().to_string(),
                width: descriptor.width(),
                height: descriptor.height(),
                crop: descriptor.crop(),
                image_type: descriptor.image_type(),
                quality: descriptor.quality(),
                density: descriptor.density(),
            })
            .collect();
        Self {
            name: registry.name().to_string(),
            source: registry.base_format().filename(),
            version: registry.version(),
            original: registry.original_filename(),
            variants,
        }
    }
}

/// Resolve every bundle, in declaration order.
pub fn resolve_all(bundles: &Bundles) -> Vec<ResolvedBundle> {
    bundles
        .bundles
        .iter()
        .map(ResolvedBundle::from_bundle)
        .collect()
}
