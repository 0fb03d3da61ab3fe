//! The [`ImageFormat`] capability and the implementations this crate ships.
//!
//! Anything that can name a rendition of an image implements [`ImageFormat`]:
//! it answers with a bare filename, and with a filename for a given version.
//! How the version is encoded is up to the implementation; the
//! [`FormatRegistry`](crate::registry::FormatRegistry) only decides *which*
//! of the two to ask for.
//!
//! | Type | Role | Filename |
//! |---|---|---|
//! | [`SourceFormat`] | the uploaded source file (a bundle's base format) | as given, e.g. `upload.jpg` |
//! | [`OriginalFormat`] | the unmodified original, named after its bundle | `avatar.jpg` |
//! | [`VariantFormat`] | a resized/cropped rendition from a descriptor | `avatar-thumb.webp` |
//!
//! All three use the [`naming`](crate::naming) conventions, so version 3 of
//! `avatar.jpg` is `avatar-v3.jpg`.

use crate::descriptor::FormatDescriptor;
use crate::naming::{self, ParsedFilename, compose, compose_versioned, split_filename};
use std::fmt;
use std::sync::Arc;

/// Something that can be written to disk under a (possibly versioned) name.
pub trait ImageFormat: fmt::Debug + Send + Sync {
    /// Filename without any version suffix.
    fn filename(&self) -> String;

    /// Filename for a specific version.
    fn versioned_filename(&self, version: u64) -> String;
}

/// Extension of a format's bare filename, if it has one.
fn extension_of(format: &dyn ImageFormat) -> Option<String> {
    split_filename(&format.filename()).extension
}

/// The source image as uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFormat {
    parsed: ParsedFilename,
}

impl SourceFormat {
    pub fn from_filename(filename: &str) -> Self {
        Self {
            parsed: split_filename(filename),
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.parsed.extension.as_deref()
    }
}

impl ImageFormat for SourceFormat {
    fn filename(&self) -> String {
        compose(&self.parsed.stem, self.extension())
    }

    fn versioned_filename(&self, version: u64) -> String {
        compose_versioned(&self.parsed.stem, version, self.extension())
    }
}

/// The unmodified source image, renamed after its bundle.
///
/// Keeps the base format's extension, so a bundle `avatar` over `upload.png`
/// resolves to `avatar.png`.
#[derive(Debug, Clone)]
pub struct OriginalFormat {
    name: String,
    base: Arc<dyn ImageFormat>,
}

impl OriginalFormat {
    pub fn new(name: impl Into<String>, base: Arc<dyn ImageFormat>) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &Arc<dyn ImageFormat> {
        &self.base
    }
}

impl ImageFormat for OriginalFormat {
    fn filename(&self) -> String {
        compose(&self.name, extension_of(self.base.as_ref()).as_deref())
    }

    fn versioned_filename(&self, version: u64) -> String {
        compose_versioned(
            &self.name,
            version,
            extension_of(self.base.as_ref()).as_deref(),
        )
    }
}

/// A derived rendition: a descriptor applied to a bundle's base format.
///
/// The stem is `{bundle}-{variant}`. The extension follows the descriptor's
/// image type, or the base format's when the type is `Default`.
#[derive(Debug, Clone)]
pub struct VariantFormat {
    bundle: String,
    descriptor: FormatDescriptor,
    base: Arc<dyn ImageFormat>,
}

impl VariantFormat {
    pub fn new(
        bundle: impl Into<String>,
        descriptor: FormatDescriptor,
        base: Arc<dyn ImageFormat>,
    ) -> Self {
        Self {
            bundle: bundle.into(),
            descriptor,
            base,
        }
    }

    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    /// Namespace key and filename stem.
    pub fn key(&self) -> String {
        naming::qualified_name(&self.bundle, self.descriptor.name())
    }

    fn extension(&self) -> Option<String> {
        match self.descriptor.image_type().extension() {
            Some(ext) => Some(ext.to_string()),
            None => extension_of(self.base.as_ref()),
        }
    }
}

impl ImageFormat for VariantFormat {
    fn filename(&self) -> String {
        compose(&self.key(), self.extension().as_deref())
    }

    fn versioned_filename(&self, version: u64) -> String {
        compose_versioned(&self.key(), version, self.extension().as_deref())
    }
}
