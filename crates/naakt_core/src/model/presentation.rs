//! Material presentation settings (fill patterns and colors).
//!
//! # Responsibility
//! - Model the four pattern color slots as a closed enum.
//! - Parse and print `#RRGGBB` colors.
//!
//! # Invariants
//! - Background slots always render with the host's solid fill pattern; only
//!   foreground patterns are configurable.

use crate::host::ElementId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl HexColor {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const DARK_GREY: Self = Self::rgb(0x32, 0x32, 0x32);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB` or `RRGGBB` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(value.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(value.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Relative luminance in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.red) + 0.587 * f64::from(self.green) + 0.114 * f64::from(self.blue))
            / 255.0
    }
}

impl Display for HexColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Invalid color literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl Display for ColorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid color `{}` (expected #RRGGBB)", self.0)
    }
}

impl Error for ColorParseError {}

/// Text color that stays readable on top of `background`.
pub fn contrast_text_color(background: HexColor) -> HexColor {
    if background.luminance() < 0.5 {
        HexColor::WHITE
    } else {
        HexColor::DARK_GREY
    }
}

/// One of the four pattern color slots on a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    SurfaceForeground,
    SurfaceBackground,
    CutForeground,
    CutBackground,
}

impl ColorSlot {
    pub const ALL: [Self; 4] = [
        Self::SurfaceForeground,
        Self::SurfaceBackground,
        Self::CutForeground,
        Self::CutBackground,
    ];

    /// Position of the slot in [`Self::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Self::SurfaceForeground => 0,
            Self::SurfaceBackground => 1,
            Self::CutForeground => 2,
            Self::CutBackground => 3,
        }
    }

    /// Whether the slot's pattern is forced to solid fill.
    pub fn is_background(self) -> bool {
        matches!(self, Self::SurfaceBackground | Self::CutBackground)
    }

    pub fn default_color(self) -> HexColor {
        match self {
            Self::SurfaceForeground | Self::CutForeground => HexColor::rgb(0x32, 0x32, 0x32),
            Self::SurfaceBackground => HexColor::rgb(0xC8, 0xC8, 0xC8),
            Self::CutBackground => HexColor::rgb(0xB4, 0xB4, 0xB4),
        }
    }
}

impl Display for ColorSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SurfaceForeground => "surface_fg",
            Self::SurfaceBackground => "surface_bg",
            Self::CutForeground => "cut_fg",
            Self::CutBackground => "cut_bg",
        };
        f.write_str(label)
    }
}

/// Pattern and color settings applied to a newly created material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    /// Surface foreground pattern; `None` keeps the source material's pattern.
    pub surface_pattern: Option<ElementId>,
    /// Cut foreground pattern; `None` keeps the source material's pattern.
    pub cut_pattern: Option<ElementId>,
    colors: [HexColor; 4],
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            surface_pattern: None,
            cut_pattern: None,
            colors: ColorSlot::ALL.map(ColorSlot::default_color),
        }
    }
}

impl PresentationConfig {
    pub fn color(&self, slot: ColorSlot) -> HexColor {
        self.colors[slot.index()]
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: HexColor) {
        self.colors[slot.index()] = color;
    }

    /// Foreground pattern configured for the slot's render mode.
    ///
    /// Always `None` for background slots.
    pub fn foreground_pattern(&self, slot: ColorSlot) -> Option<ElementId> {
        match slot {
            ColorSlot::SurfaceForeground => self.surface_pattern,
            ColorSlot::CutForeground => self.cut_pattern,
            ColorSlot::SurfaceBackground | ColorSlot::CutBackground => None,
        }
    }
}
