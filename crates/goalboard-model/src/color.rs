//! Color derivation primitives
//!
//! Provides [`HexColor`], a parsed `#rrggbb` color, and the derivations the
//! dashboard needs to draw a goal bar over an arbitrary background:
//! - contrast text color (black or white)
//! - lighter track color
//! - darker accent color

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ColorError;

/// Default step used by [`lighten`]
pub const DEFAULT_LIGHTEN: u8 = 30;

/// Default step used by [`darken`]
pub const DEFAULT_DARKEN: u8 = 40;

/// Luminance above which text is drawn black
const CONTRAST_THRESHOLD: f64 = 0.6;

/// A 24-bit RGB color
///
/// Only constructed from a well-formed `#rrggbb` string, so every derivation
/// on it is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl HexColor {
    /// Pure black
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white, also the default add-form color
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    /// Create a color from its channels
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance in `[0, 1]` using the Rec. 601 weights
    #[inline]
    #[must_use]
    pub fn luminance(&self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Text color that stays legible on top of this color
    #[inline]
    #[must_use]
    pub fn contrast(&self) -> Self {
        if self.luminance() > CONTRAST_THRESHOLD {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    /// Add `amount` to each channel, saturating at 255
    #[inline]
    #[must_use]
    pub fn lighten(&self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_add(amount),
            self.g.saturating_add(amount),
            self.b.saturating_add(amount),
        )
    }

    /// Subtract `amount` from each channel, saturating at 0
    #[inline]
    #[must_use]
    pub fn darken(&self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Display for HexColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidColorFormat(s.to_string());

        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 {
            return Err(invalid());
        }
        let bytes = hex::decode(digits).map_err(|_| invalid())?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2]))
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Contrast text color for a `#rrggbb` background
///
/// Returns `#000000` on light backgrounds and `#ffffff` otherwise.
///
/// # Errors
/// Returns [`ColorError::InvalidColorFormat`] if `hex` is not `#rrggbb`
pub fn contrast_color(hex: &str) -> Result<String, ColorError> {
    Ok(hex.parse::<HexColor>()?.contrast().to_string())
}

/// Lighten a `#rrggbb` color by `amount` per channel
///
/// # Errors
/// Returns [`ColorError::InvalidColorFormat`] if `hex` is not `#rrggbb`
pub fn lighten(hex: &str, amount: u8) -> Result<String, ColorError> {
    Ok(hex.parse::<HexColor>()?.lighten(amount).to_string())
}

/// Darken a `#rrggbb` color by `amount` per channel
///
/// # Errors
/// Returns [`ColorError::InvalidColorFormat`] if `hex` is not `#rrggbb`
pub fn darken(hex: &str, amount: u8) -> Result<String, ColorError> {
    Ok(hex.parse::<HexColor>()?.darken(amount).to_string())
}
