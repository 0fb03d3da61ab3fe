//! Bundle configuration.
//!
//! Bundles and their variants are declared in `formats.toml`:
//!
//! ```toml
//! [[bundles]]
//! name = "avatar"           # Bundle name; the original is registered under it
//! source = "upload.jpg"     # Source filename; its extension carries over
//! version = 3               # Optional cache-busting version (> 0 to apply)
//!
//! [[bundles.formats]]
//! name = "thumb"            # Registered as "avatar-thumb"
//! width = 100
//! height = 100
//! crop = "TOP_CENTER"       # DEFAULT, NONE, TOP_LEFT, ..., BOTTOM_CENTER
//! type = "webp"             # default, jpeg, png, gif, webp, avif
//! quality = 0.85            # Optional, passed through to the encoder
//! density = 2.0             # Optional, passed through to the encoder
//! ```
//!
//! All bundles of one file register into a single shared namespace, so every
//! key (bundle names and `{bundle}-{variant}` keys) must be unique across the
//! file. Unknown keys are rejected to catch typos early.

use crate::descriptor::{DescriptorError, FormatDecl, FormatDescriptor};
use crate::format::{ImageFormat, SourceFormat};
use crate::naming::qualified_name;
use crate::registry::{FormatRegistry, SharedFormats};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Name of the config file within the config directory.
pub const CONFIG_FILENAME: &str = "formats.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("bundle '{bundle}': {source}")]
    Descriptor {
        bundle: String,
        #[source]
        source: DescriptorError,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `formats.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatsConfig {
    pub bundles: Vec<BundleConfig>,
}

/// One `[[bundles]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    pub name: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<FormatDecl>,
}

impl BundleConfig {
    /// Validated descriptors for this bundle's variants.
    pub fn descriptors(&self) -> Result<Vec<FormatDescriptor>, ConfigError> {
        self.formats
            .iter()
            .cloned()
            .map(|decl| {
                decl.into_descriptor()
                    .map_err(|source| ConfigError::Descriptor {
                        bundle: self.name.clone(),
                        source,
                    })
            })
            .collect()
    }
}

impl FormatsConfig {
    /// Check names, sources, descriptors, and key uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut keys = HashSet::new();
        for bundle in &self.bundles {
            if bundle.name.is_empty() {
                return Err(ConfigError::Validation(
                    "bundles.name must not be empty".into(),
                ));
            }
            if bundle.source.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "bundle '{}': source must not be empty",
                    bundle.name
                )));
            }
            let variant_keys = bundle
                .descriptors()?
                .iter()
                .map(|d| qualified_name(&bundle.name, d.name()))
                .collect::<Vec<_>>();
            for key in std::iter::once(bundle.name.clone()).chain(variant_keys) {
                if !keys.insert(key.clone()) {
                    return Err(ConfigError::Validation(format!(
                        "format key '{key}' is declared more than once"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load `formats.toml` from a directory.
///
/// Returns an empty config if the file does not exist. Returns `Err` if the
/// file is not valid TOML, has unknown keys, or fails validation.
pub fn load_config(dir: &Path) -> Result<FormatsConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(FormatsConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<FormatsConfig, ConfigError> {
    let config: FormatsConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// A registry built from config, with the descriptors of its variants.
#[derive(Debug)]
pub struct Bundle {
    pub registry: FormatRegistry,
    pub variants: Vec<FormatDescriptor>,
}

impl Bundle {
    /// Namespace keys of the variants, in declaration order.
    pub fn variant_keys(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|d| qualified_name(self.registry.name(), d.name()))
            .collect()
    }
}

/// Every bundle of a config file, sharing one namespace.
#[derive(Debug)]
pub struct Bundles {
    pub formats: SharedFormats,
    pub bundles: Vec<Bundle>,
    /// Namespace key → name of the bundle that registered it.
    owners: HashMap<String, String>,
}

impl Bundles {
    /// Resolve a namespace key with its owning bundle's current version.
    ///
    /// Returns `None` for unknown keys, and for keys whose bundle is no
    /// longer in `bundles`.
    pub fn resolve(&self, key: &str) -> Option<String> {
        let owner = self.find(self.owners.get(key)?)?;
        owner.registry.filename_of(key)
    }

    pub fn find(&self, name: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.registry.name() == name)
    }

    /// Apply one version to every bundle.
    pub fn set_version(&self, version: Option<i64>) {
        for bundle in &self.bundles {
            bundle.registry.set_version(version);
        }
    }
}

/// Build one registry per bundle, all over a single shared namespace.
pub fn build_registries(config: &FormatsConfig) -> Result<Bundles, ConfigError> {
    let formats = SharedFormats::new();
    let mut bundles = Vec::with_capacity(config.bundles.len());
    let mut owners = HashMap::new();

    for bundle in &config.bundles {
        let base: Arc<dyn ImageFormat> = Arc::new(SourceFormat::from_filename(&bundle.source));
        let registry = FormatRegistry::new(bundle.name.clone(), formats.clone(), base);
        registry.set_version(bundle.version);
        owners.insert(bundle.name.clone(), bundle.name.clone());

        let variants = bundle.descriptors()?;
        for descriptor in &variants {
            registry.register_variant(descriptor.clone());
            owners.insert(
                qualified_name(&bundle.name, descriptor.name()),
                bundle.name.clone(),
            );
        }
        bundles.push(Bundle { registry, variants });
    }

    Ok(Bundles {
        formats,
        bundles,
        owners,
    })
}

/// Returns a fully-commented example `formats.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Variants Configuration
# ============================
# Each [[bundles]] table groups the renditions of one source image. The
# original is registered under the bundle name; each [[bundles.formats]]
# entry is registered as "<bundle>-<format>". All bundles in this file share
# one namespace, so keys must be unique. Unknown keys will cause an error.

[[bundles]]
# Bundle name. The unmodified original resolves to "<name>.<source ext>".
name = "avatar"

# Source image filename. Its extension is reused by the original and by
# formats whose type is "default".
source = "upload.jpg"

# Cache-busting version. When > 0, filenames gain a "-v<version>" suffix
# (avatar-v3.jpg). Omit, or set to 0, for bare filenames.
# version = 3

[[bundles.formats]]
# Format name, unique within the bundle. Required.
name = "thumb"

# Target dimensions in pixels. Required, must be > 0.
width = 100
height = 100

# Crop anchor when the aspect ratio differs from the source:
#   DEFAULT / CENTER   crop centered on both axes
#   NONE               never crop, scale/pad to fit
#   TOP_LEFT, TOP_CENTER, TOP_RIGHT, CENTER_LEFT, CENTER_RIGHT,
#   BOTTOM_LEFT, BOTTOM_CENTER, BOTTOM_RIGHT
#                      keep content nearest the named edge(s)
crop = "DEFAULT"

# Output type: default (same as source), jpeg, png, gif, webp, avif.
type = "default"

# Encoder hints, passed through as-is. Omit to leave unspecified.
# quality = 0.85
# density = 2.0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropAnchor;
    use crate::image_type::ImageType;
    use crate::test_helpers::config_dir;
    use tempfile::TempDir;

    const TWO_BUNDLES: &str = r#"
[[bundles]]
name = "avatar"
source = "upload.jpg"
version = 3

[[bundles.formats]]
name = "thumb"
width = 100
height = 100
crop = "TOP_CENTER"
type = "webp"

[[bundles.formats]]
name = "large"
width = 800
height = 800

[[bundles]]
name = "cover"
source = "cover.png"
"#;

    #[test]
    fn load_config_returns_empty_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(config.bundles.is_empty());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = config_dir(TWO_BUNDLES);
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.bundles.len(), 2);

        let avatar = &config.bundles[0];
        assert_eq!(avatar.name, "avatar");
        assert_eq!(avatar.version, Some(3));
        let descriptors = avatar.descriptors().unwrap();
        assert_eq!(descriptors[0].crop(), CropAnchor::TopCenter);
        assert_eq!(descriptors[0].image_type(), ImageType::WebP);
        assert_eq!(descriptors[1].crop(), CropAnchor::Default);

        assert_eq!(config.bundles[1].version, None);
        assert!(config.bundles[1].formats.is_empty());
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let tmp = config_dir("[[bundles]\nname = ");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config(
            r#"
[[bundles]]
name = "avatar"
source = "a.jpg"
colour = "red"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_descriptor_names_its_bundle() {
        let err = parse_config(
            r#"
[[bundles]]
name = "avatar"
source = "a.jpg"

[[bundles.formats]]
name = "thumb"
width = 0
height = 100
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Descriptor { bundle, source } => {
                assert_eq!(bundle, "avatar");
                assert!(matches!(
                    source,
                    DescriptorError::InvalidDimension {
                        dimension: "width",
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_dimension_is_rejected() {
        let err = parse_config(
            r#"
[[bundles]]
name = "avatar"
source = "a.jpg"

[[bundles.formats]]
name = "thumb"
width = 100
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Descriptor {
                source: DescriptorError::MissingDimension { .. },
                ..
            }
        ));
    }

    #[test]
    fn empty_bundle_name_is_rejected() {
        let err = parse_config(
            r#"
[[bundles]]
name = ""
source = "a.jpg"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = parse_config(
            r#"
[[bundles]]
name = "avatar"
source = "a.jpg"

[[bundles]]
name = "avatar"
source = "b.jpg"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'avatar'"));
    }

    #[test]
    fn variant_key_colliding_with_bundle_is_rejected() {
        let err = parse_config(
            r#"
[[bundles]]
name = "avatar"
source = "a.jpg"

[[bundles.formats]]
name = "thumb"
width = 10
height = 10

[[bundles]]
name = "avatar-thumb"
source = "b.jpg"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("avatar-thumb"));
    }

    #[test]
    fn build_registries_shares_one_namespace() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let bundles = build_registries(&config).unwrap();

        assert_eq!(
            bundles.formats.names(),
            vec!["avatar", "avatar-large", "avatar-thumb", "cover"]
        );
        for bundle in &bundles.bundles {
            assert!(bundle.registry.formats().ptr_eq(&bundles.formats));
        }
    }

    #[test]
    fn resolve_uses_owning_bundle_version() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let bundles = build_registries(&config).unwrap();

        assert_eq!(bundles.resolve("avatar").as_deref(), Some("avatar-v3.jpg"));
        assert_eq!(
            bundles.resolve("avatar-thumb").as_deref(),
            Some("avatar-thumb-v3.webp")
        );
        assert_eq!(
            bundles.resolve("avatar-large").as_deref(),
            Some("avatar-large-v3.jpg")
        );
        assert_eq!(bundles.resolve("cover").as_deref(), Some("cover.png"));
        assert_eq!(bundles.resolve("missing"), None);
    }

    #[test]
    fn resolve_survives_removed_bundles() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let mut bundles = build_registries(&config).unwrap();
        bundles.bundles.remove(0);

        assert_eq!(bundles.resolve("cover").as_deref(), Some("cover.png"));
        assert_eq!(bundles.resolve("avatar"), None);
        assert_eq!(bundles.resolve("avatar-thumb"), None);
    }

    #[test]
    fn resolve_follows_reordered_bundles() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let mut bundles = build_registries(&config).unwrap();
        bundles.bundles.reverse();
        bundles.find("cover").unwrap().registry.set_version(Some(5));

        assert_eq!(bundles.resolve("cover").as_deref(), Some("cover-v5.png"));
        assert_eq!(
            bundles.resolve("avatar-thumb").as_deref(),
            Some("avatar-thumb-v3.webp")
        );
    }

    #[test]
    fn set_version_applies_to_every_bundle() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let bundles = build_registries(&config).unwrap();

        bundles.set_version(Some(7));
        assert_eq!(bundles.resolve("cover").as_deref(), Some("cover-v7.png"));
        bundles.set_version(None);
        assert_eq!(bundles.resolve("avatar").as_deref(), Some("avatar.jpg"));
    }

    #[test]
    fn bundle_lists_variant_keys_in_order() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let bundles = build_registries(&config).unwrap();
        let avatar = bundles.find("avatar").unwrap();
        assert_eq!(avatar.variant_keys(), vec!["avatar-thumb", "avatar-large"]);
        assert!(bundles.find("nope").is_none());
    }

    #[test]
    fn stock_config_is_valid() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config.bundles.len(), 1);
        assert_eq!(config.bundles[0].formats.len(), 1);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = parse_config(TWO_BUNDLES).unwrap();
        let text = toml::to_string(&config).unwrap();
        let back = parse_config(&text).unwrap();
        assert_eq!(back.bundles.len(), 2);
        assert_eq!(back.bundles[0].formats, config.bundles[0].formats);
        assert_eq!(back.bundles[0].version, Some(3));
    }
}
