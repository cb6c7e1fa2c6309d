//! Avatar outfit mapping
//!
//! Reduces a recommendation set to the handful of options an avatar renderer
//! understands, falling back to temperature rules when nothing maps.

mod mapper;

use serde::{Deserialize, Serialize};

pub use mapper::{fallback_outfit, map_to_outfit};

/// Head recommendations must score above this to replace the avatar's hair
pub const HAT_PRIORITY_THRESHOLD: f64 = 0.8;

/// Hats are only drawn below this temperature (°C)
pub const HAT_TEMPERATURE_CEILING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClothingStyle {
    Hoodie,
    BlazerAndSweater,
    ShirtCrewNeck,
    ShirtVNeck,
    Shorts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClothingColor {
    Gray01,
    Gray02,
    Blue01,
    Blue02,
    Blue03,
    PastelBlue,
    PastelOrange,
    PastelYellow,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Headwear {
    WinterHat01,
    Hat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessory {
    #[default]
    None,
    Sunglasses,
}

/// Garment style and colour pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Garment {
    pub style: ClothingStyle,
    pub color: ClothingColor,
}

impl Garment {
    pub const fn new(style: ClothingStyle, color: ClothingColor) -> Self {
        Self { style, color }
    }
}

/// Minimal avatar configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitDescriptor {
    pub clothing: ClothingStyle,
    pub clothing_color: ClothingColor,
    pub accessories: Accessory,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top: Option<Headwear>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hat_color: Option<ClothingColor>,
}
