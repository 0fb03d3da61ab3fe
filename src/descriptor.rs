//! Format descriptors: the declared shape of one named variant.
//!
//! A [`FormatDescriptor`] is built once at configuration time and never
//! changes. Construction validates it, so every descriptor in circulation has
//! a non-empty name and positive dimensions.
//!
//! ## Declarative schema
//!
//! [`FormatDecl`] is the authored form (TOML, JSON) of a descriptor:
//!
//! | Field | Required | Default |
//! |---|---|---|
//! | `name` | yes | |
//! | `width` | yes, > 0 | |
//! | `height` | yes, > 0 | |
//! | `crop` | no | `DEFAULT` |
//! | `type` | no | `default` |
//! | `quality` | no | unspecified |
//! | `density` | no | unspecified |
//!
//! Older declarations spell "unspecified" as `-1`; that value is read as
//! absent. Quality and density are otherwise passed through to the image
//! engine uninterpreted.

use crate::crop::CropAnchor;
use crate::image_type::ImageType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Legacy spelling of "not specified" for quality and density.
const UNSPECIFIED: f32 = -1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("format name must not be empty")]
    EmptyName,
    #[error("format '{name}': {dimension} is required")]
    MissingDimension {
        name: String,
        dimension: &'static str,
    },
    #[error("format '{name}': {dimension} must be positive, got {value}")]
    InvalidDimension {
        name: String,
        dimension: &'static str,
        value: i64,
    },
}

/// A validated, immutable variant description.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    name: String,
    crop: CropAnchor,
    image_type: ImageType,
    quality: Option<f32>,
    density: Option<f32>,
    width: u32,
    height: u32,
}

impl FormatDescriptor {
    /// Start a descriptor. Dimensions are checked by [`FormatDescriptorBuilder::build`].
    pub fn builder(name: impl Into<String>, width: i64, height: i64) -> FormatDescriptorBuilder {
        FormatDescriptorBuilder {
            name: name.into(),
            width: Some(width),
            height: Some(height),
            crop: CropAnchor::default(),
            image_type: ImageType::default(),
            quality: None,
            density: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crop(&self) -> CropAnchor {
        self.crop
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    pub fn density(&self) -> Option<f32> {
        self.density
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The declarative form of this descriptor.
    pub fn to_decl(&self) -> FormatDecl {
        FormatDecl {
            name: self.name.clone(),
            width: Some(i64::from(self.width)),
            height: Some(i64::from(self.height)),
            crop: self.crop,
            image_type: self.image_type,
            quality: self.quality,
            density: self.density,
        }
    }
}

/// Builder for [`FormatDescriptor`]; only [`build`](Self::build) validates.
#[derive(Debug, Clone)]
pub struct FormatDescriptorBuilder {
    name: String,
    width: Option<i64>,
    height: Option<i64>,
    crop: CropAnchor,
    image_type: ImageType,
    quality: Option<f32>,
    density: Option<f32>,
}

impl FormatDescriptorBuilder {
    pub fn crop(mut self, crop: CropAnchor) -> Self {
        self.crop = crop;
        self
    }

    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    pub fn build(self) -> Result<FormatDescriptor, DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        let width = check_dimension(&self.name, "width", self.width)?;
        let height = check_dimension(&self.name, "height", self.height)?;
        Ok(FormatDescriptor {
            name: self.name,
            crop: self.crop,
            image_type: self.image_type,
            quality: specified(self.quality),
            density: specified(self.density),
            width,
            height,
        })
    }
}

fn check_dimension(
    name: &str,
    dimension: &'static str,
    value: Option<i64>,
) -> Result<u32, DescriptorError> {
    let value = value.ok_or_else(|| DescriptorError::MissingDimension {
        name: name.to_string(),
        dimension,
    })?;
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DescriptorError::InvalidDimension {
            name: name.to_string(),
            dimension,
            value,
        }),
    }
}

/// Map the legacy `-1` sentinel to "unspecified".
fn specified(hint: Option<f32>) -> Option<f32> {
    hint.filter(|&v| v != UNSPECIFIED)
}

/// Authored form of a [`FormatDescriptor`].
///
/// Every field deserializes leniently; [`FormatDecl::into_descriptor`] does
/// the validation so errors name the offending format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatDecl {
    pub name: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub crop: CropAnchor,
    #[serde(default, rename = "type")]
    pub image_type: ImageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f32>,
}

impl FormatDecl {
    pub fn into_descriptor(self) -> Result<FormatDescriptor, DescriptorError> {
        FormatDescriptorBuilder {
            name: self.name,
            width: self.width,
            height: self.height,
            crop: self.crop,
            image_type: self.image_type,
            quality: self.quality,
            density: self.density,
        }
        .build()
    }
}

impl TryFrom<FormatDecl> for FormatDescriptor {
    type Error = DescriptorError;

    fn try_from(decl: FormatDecl) -> Result<Self, Self::Error> {
        decl.into_descriptor()
    }
}
