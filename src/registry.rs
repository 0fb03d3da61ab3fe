//! Format registries ("bundles") and the namespace they register into.
//!
//! A [`FormatRegistry`] groups every rendition of one source image: the
//! unmodified original plus any number of derived variants. It owns the
//! bundle name, the base format, and an optional version counter used to
//! produce cache-busting filenames.
//!
//! ## Shared namespaces
//!
//! Registries do not own their keyspace. They register into a
//! [`SharedFormats`] handle supplied at construction, and cloning that handle
//! aliases the same map. This is how several bundles end up in one global
//! lookup (see [`config::build_registries`](crate::config::build_registries)).
//! Use [`FormatRegistry::standalone`] when no sharing is wanted.
//!
//! Registering a key that already exists replaces the previous entry. This
//! is not an error; it is logged at `warn` level.
//!
//! ## Versioning
//!
//! | Version | State | [`filename_for`](FormatRegistry::filename_for) returns |
//! |---|---|---|
//! | unset, or `<= 0` | unversioned | `format.filename()` |
//! | `> 0` | versioned | `format.versioned_filename(v)` |
//!
//! Only [`set_version`](FormatRegistry::set_version) moves between states.
//! The version is read fresh on every call; nothing is cached.
//!
//! ## Synchronization
//!
//! Both types are `Send + Sync` and need no external locking. The namespace
//! sits behind an `RwLock`, the version behind a `Mutex`; every operation
//! takes the lock once, so `filename_for` sees either the old or the new
//! version, never a mix. A poisoned lock is recovered, since no operation
//! can leave the guarded data half-written.

use crate::descriptor::FormatDescriptor;
use crate::format::{ImageFormat, OriginalFormat, VariantFormat};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type FormatMap = HashMap<String, Arc<dyn ImageFormat>>;

/// Handle to a namespace of formats keyed by name. Clones share the map.
#[derive(Debug, Clone, Default)]
pub struct SharedFormats {
    inner: Arc<RwLock<FormatMap>>,
}

impl SharedFormats {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, FormatMap> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormatMap> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a format, returning the previous entry.
    pub fn insert(
        &self,
        name: impl Into<String>,
        format: Arc<dyn ImageFormat>,
    ) -> Option<Arc<dyn ImageFormat>> {
        let name = name.into();
        let previous = self.write().insert(name.clone(), Arc::clone(&format));
        match &previous {
            Some(prev) if !Arc::ptr_eq(prev, &format) => {
                tracing::warn!(
                    key = %name,
                    previous = %prev.filename(),
                    replacement = %format.filename(),
                    "format name already registered, replacing"
                );
            }
            _ => tracing::debug!(key = %name, "registered format"),
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ImageFormat>> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of all entries, sorted by name.
    pub fn entries(&self) -> Vec<(String, Arc<dyn ImageFormat>)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(name, format)| (name.clone(), Arc::clone(format)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether two handles alias the same namespace.
    pub fn ptr_eq(&self, other: &SharedFormats) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A bundle of renditions of one source image.
///
/// See the [module docs](self) for namespace sharing, versioning, and the
/// synchronization contract.
#[derive(Debug)]
pub struct FormatRegistry {
    name: String,
    base_format: Arc<dyn ImageFormat>,
    original: Arc<dyn ImageFormat>,
    formats: SharedFormats,
    version: Mutex<Option<i64>>,
}

impl FormatRegistry {
    /// Create a registry and register its original as `name → original`
    /// in `formats`, replacing any entry already under `name`.
    pub fn new(
        name: impl Into<String>,
        formats: SharedFormats,
        base_format: Arc<dyn ImageFormat>,
    ) -> Self {
        let name = name.into();
        let original: Arc<dyn ImageFormat> =
            Arc::new(OriginalFormat::new(name.clone(), Arc::clone(&base_format)));
        formats.insert(name.clone(), Arc::clone(&original));
        Self {
            name,
            base_format,
            original,
            formats,
            version: Mutex::new(None),
        }
    }

    /// Create a registry over a fresh namespace of its own.
    pub fn standalone(name: impl Into<String>, base_format: Arc<dyn ImageFormat>) -> Self {
        Self::new(name, SharedFormats::new(), base_format)
    }

    /// The live namespace this registry registers into.
    pub fn formats(&self) -> &SharedFormats {
        &self.formats
    }

    pub fn base_format(&self) -> &Arc<dyn ImageFormat> {
        &self.base_format
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original(&self) -> &Arc<dyn ImageFormat> {
        &self.original
    }

    pub fn version(&self) -> Option<i64> {
        *self.version.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the version. `None` clears it; values `<= 0` are stored but
    /// resolve as unversioned.
    pub fn set_version(&self, version: Option<i64>) {
        *self.version.lock().unwrap_or_else(PoisonError::into_inner) = version;
        tracing::debug!(bundle = %self.name, ?version, "version set");
    }

    /// Filename for `format` under the current version.
    pub fn filename_for(&self, format: &dyn ImageFormat) -> String {
        match self.version() {
            Some(v) if v > 0 => format.versioned_filename(v as u64),
            _ => format.filename(),
        }
    }

    /// Current filename of the original.
    pub fn original_filename(&self) -> String {
        self.filename_for(self.original.as_ref())
    }

    /// Register an externally built format under `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        format: Arc<dyn ImageFormat>,
    ) -> Option<Arc<dyn ImageFormat>> {
        self.formats.insert(name, format)
    }

    /// Build a [`VariantFormat`] over this bundle's base format and register
    /// it under `{bundle}-{variant}`.
    pub fn register_variant(&self, descriptor: FormatDescriptor) -> Arc<dyn ImageFormat> {
        let variant = VariantFormat::new(
            self.name.clone(),
            descriptor,
            Arc::clone(&self.base_format),
        );
        let key = variant.key();
        let format: Arc<dyn ImageFormat> = Arc::new(variant);
        self.formats.insert(key, Arc::clone(&format));
        format
    }

    /// Look up `name` in the namespace and resolve its current filename.
    pub fn filename_of(&self, name: &str) -> Option<String> {
        self.formats
            .get(name)
            .map(|format| self.filename_for(format.as_ref()))
    }
}
