//! Crop anchors: which edges of an image a crop keeps.
//!
//! When a variant's target aspect ratio differs from the source, the image
//! engine has to throw pixels away. A [`CropAnchor`] tells it which side to
//! keep:
//!
//! | Anchor | Engine behaviour |
//! |---|---|
//! | `NONE` | never crop, only scale/pad to fit |
//! | `DEFAULT`, `CENTER` | crop to the target aspect, centered on both axes |
//! | directional (`TOP_LEFT`, `BOTTOM_CENTER`, ...) | keep content nearest the named edge(s), discard from the opposite edge(s) |
//!
//! Every anchor maps to a fixed set of sides through a static table. Corner
//! anchors set one side per axis; edge-center anchors set a single side. No
//! anchor ever sets both sides of one axis.
//!
//! `DEFAULT` and `CENTER` share the same side set and are indistinguishable
//! through every predicate. They only differ by name, which is preserved so
//! declarations round-trip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One edge of the image, or the "centered" marker.
///
/// Declared in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

const fn bit(side: Side) -> u8 {
    1 << side as u8
}

const TOP: u8 = bit(Side::Top);
const RIGHT: u8 = bit(Side::Right);
const BOTTOM: u8 = bit(Side::Bottom);
const LEFT: u8 = bit(Side::Left);
const CENTER: u8 = bit(Side::Center);

/// Named crop policy for a format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CropAnchor {
    #[default]
    Default,
    None,
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterRight,
    Center,
    BottomLeft,
    BottomRight,
    BottomCenter,
}

/// Side sets, indexed by the anchor's declaration order.
const SIDES: [u8; 11] = [
    CENTER,         // DEFAULT
    0,              // NONE
    TOP | LEFT,     // TOP_LEFT
    TOP,            // TOP_CENTER
    TOP | RIGHT,    // TOP_RIGHT
    LEFT,           // CENTER_LEFT
    RIGHT,          // CENTER_RIGHT
    CENTER,         // CENTER
    BOTTOM | LEFT,  // BOTTOM_LEFT
    BOTTOM | RIGHT, // BOTTOM_RIGHT
    BOTTOM,         // BOTTOM_CENTER
];

const NAMES: [&str; 11] = [
    "DEFAULT",
    "NONE",
    "TOP_LEFT",
    "TOP_CENTER",
    "TOP_RIGHT",
    "CENTER_LEFT",
    "CENTER_RIGHT",
    "CENTER",
    "BOTTOM_LEFT",
    "BOTTOM_RIGHT",
    "BOTTOM_CENTER",
];

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown crop anchor '{0}'")]
pub struct UnknownAnchor(pub String);

impl CropAnchor {
    /// All anchors, in declaration order.
    pub const ALL: [CropAnchor; 11] = [
        CropAnchor::Default,
        CropAnchor::None,
        CropAnchor::TopLeft,
        CropAnchor::TopCenter,
        CropAnchor::TopRight,
        CropAnchor::CenterLeft,
        CropAnchor::CenterRight,
        CropAnchor::Center,
        CropAnchor::BottomLeft,
        CropAnchor::BottomRight,
        CropAnchor::BottomCenter,
    ];

    fn sides(self) -> u8 {
        SIDES[self as usize]
    }

    fn has(self, side: Side) -> bool {
        self.sides() & bit(side) != 0
    }

    /// Declared name, e.g. `"TOP_LEFT"`.
    pub fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Centered crop with no directional bias (`DEFAULT` or `CENTER`).
    pub fn is_default(self) -> bool {
        self.has(Side::Center)
    }

    /// Never crop (`NONE`).
    pub fn is_no_crop(self) -> bool {
        self.sides() == 0
    }

    pub fn is_any(self) -> bool {
        !self.is_no_crop()
    }

    pub fn is_top(self) -> bool {
        self.has(Side::Top)
    }

    pub fn is_bottom(self) -> bool {
        self.has(Side::Bottom)
    }

    pub fn is_left(self) -> bool {
        self.has(Side::Left)
    }

    pub fn is_right(self) -> bool {
        self.has(Side::Right)
    }
}

impl fmt::Display for CropAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CropAnchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropAnchor::ALL
            .into_iter()
            .find(|anchor| anchor.name() == s)
            .ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}
