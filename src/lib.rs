//! # Image Variants
//!
//! Declares, names, and resolves the format variants of a source image: the
//! unmodified original plus derived renditions with target dimensions, a
//! crop anchor, an output type, and optional encoder hints. A per-bundle
//! version counter turns filenames into cache-busting ones.
//!
//! Pixels are someone else's job. This crate decides *what* each rendition
//! is and *what it is called*; an image engine reads the descriptors and
//! writes the files.
//!
//! ```text
//! formats.toml ─→ FormatDescriptor ─┐
//!                                    ├─→ FormatRegistry ─→ filename_for(format)
//! source file  ─→ SourceFormat  ────┘        │
//!                                            └─→ SharedFormats (name → ImageFormat)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`crop`] | [`CropAnchor`](crop::CropAnchor): the 11 named crop policies and their edge predicates |
//! | [`image_type`] | Opaque output type tag, with file extensions |
//! | [`descriptor`] | Validated [`FormatDescriptor`](descriptor::FormatDescriptor) and its declarative schema |
//! | [`format`] | The [`ImageFormat`](format::ImageFormat) capability and the source/original/variant implementations |
//! | [`naming`] | Filename split/compose and version-suffix convention |
//! | [`registry`] | [`FormatRegistry`](registry::FormatRegistry) bundles over a shared namespace |
//! | [`config`] | `formats.toml` loading, validation, and registry construction |
//! | [`types`] | Serializable resolved-bundle view (`list --json`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Shared Namespaces Are Explicit
//!
//! A registry registers its original into a namespace it does not own, so
//! several bundles can publish into one lookup. That namespace is a
//! cloneable [`SharedFormats`](registry::SharedFormats) handle passed in at
//! construction, which keeps the aliasing visible at every call site.
//!
//! ## Registries Are Thread-Safe
//!
//! The namespace and the version counter are each guarded by a lock inside
//! the registry. Callers share a registry across threads without wrapping it.
//!
//! ## Absent Hints Are `None`
//!
//! Quality and density are `Option<f32>`. Declarations that still spell
//! "unspecified" as `-1` are read as `None`.

pub mod config;
pub mod crop;
pub mod descriptor;
pub mod format;
pub mod image_type;
pub mod naming;
pub mod output;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
