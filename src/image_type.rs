//! Output image type for a variant.
//!
//! The core treats this as an opaque tag: it only travels on
//! [`FormatDescriptor`](crate::descriptor::FormatDescriptor) and picks the
//! file extension of derived filenames. `Default` means "same type as the
//! source image".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Default,
    Jpeg,
    Png,
    Gif,
    WebP,
    Avif,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown image type '{0}'")]
pub struct UnknownImageType(pub String);

impl ImageType {
    pub const ALL: [ImageType; 6] = [
        ImageType::Default,
        ImageType::Jpeg,
        ImageType::Png,
        ImageType::Gif,
        ImageType::WebP,
        ImageType::Avif,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ImageType::Default => "default",
            ImageType::Jpeg => "jpeg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
            ImageType::WebP => "webp",
            ImageType::Avif => "avif",
        }
    }

    /// File extension for encoded output. `None` for `Default`, which keeps
    /// whatever extension the source has.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageType::Default => None,
            ImageType::Jpeg => Some("jpg"),
            ImageType::Png => Some("png"),
            ImageType::Gif => Some("gif"),
            ImageType::WebP => Some("webp"),
            ImageType::Avif => Some("avif"),
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the same lowercase names serde accepts.
impl FromStr for ImageType {
    type Err = UnknownImageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownImageType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_extension() {
        assert_eq!(ImageType::default(), ImageType::Default);
        assert_eq!(ImageType::Default.extension(), None);
    }

    #[test]
    fn jpeg_uses_short_extension() {
        assert_eq!(ImageType::Jpeg.extension(), Some("jpg"));
    }

    #[test]
    fn parse_accepts_lowercase_names_only() {
        assert_eq!("webp".parse::<ImageType>(), Ok(ImageType::WebP));
        assert_eq!("avif".parse::<ImageType>(), Ok(ImageType::Avif));
        assert_eq!(
            "WebP".parse::<ImageType>(),
            Err(UnknownImageType("WebP".to_string()))
        );
        assert!("tiff".parse::<ImageType>().is_err());
    }

    #[test]
    fn parse_and_serde_agree() {
        for image_type in ImageType::ALL {
            let json = serde_json::to_string(&image_type).unwrap();
            assert_eq!(json, format!("\"{}\"", image_type.name()));
            assert_eq!(image_type.name().parse::<ImageType>(), Ok(image_type));
        }
        assert!(serde_json::from_str::<ImageType>("\"WebP\"").is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ImageType::WebP).unwrap();
        assert_eq!(json, "\"webp\"");
    }
}
