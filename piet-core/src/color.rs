//! # Color — The Piet Palette
//!
//! Twenty named colors: eighteen chromatic ones laid out on a
//! lightness × hue lattice plus the two achromatic colors.
//!
//! ```text
//!            Red      Yellow   Green    Cyan     Blue     Magenta
//! Light    #FFC0C0  #FFFFC0  #C0FFC0  #C0FFFF  #C0C0FF  #FFC0FF
//! Normal   #FF0000  #FFFF00  #00FF00  #00FFFF  #0000FF  #FF00FF
//! Dark     #C00000  #C0C000  #00C000  #00C0C0  #0000C0  #C000C0
//!
//! White    #FFFFFF                       Black    #000000
//! ```
//!
//! Only the (lightness, hue) coordinate of a chromatic color matters to the
//! interpreter; RGB values exist for loaders and editors.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while mapping external color codes onto the palette
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// RGB triple outside the palette
    #[error("color code R:{r} G:{g} B:{b} is not a Piet color")]
    UnknownRgb { r: u8, g: u8, b: u8 },

    /// Name or hex literal that could not be parsed
    #[error("unknown color: {0:?}")]
    UnknownName(String),
}

/// Result type for palette lookups
pub type ColorResult<T> = Result<T, ColorError>;

/// Hue cycle: Red → Yellow → Green → Cyan → Blue → Magenta → Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hue {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Cyan = 3,
    Blue = 4,
    Magenta = 5,
}

impl Hue {
    /// Number of hues in the cycle
    pub const COUNT: usize = 6;

    /// All hues in cycle order
    pub const ALL: [Hue; Self::COUNT] = [
        Hue::Red,
        Hue::Yellow,
        Hue::Green,
        Hue::Cyan,
        Hue::Blue,
        Hue::Magenta,
    ];

    /// Position in the hue cycle (0..=5)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Hue at `index`, wrapping around the cycle
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }
}

/// Lightness cycle: Light → Normal → Dark → Light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lightness {
    Light = 0,
    Normal = 1,
    Dark = 2,
}

impl Lightness {
    /// Number of lightness levels
    pub const COUNT: usize = 3;

    /// All levels in cycle order
    pub const ALL: [Lightness; Self::COUNT] = [Lightness::Light, Lightness::Normal, Lightness::Dark];

    /// Position in the lightness cycle (0..=2)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lightness at `index`, wrapping around the cycle
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }
}

/// A codel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    LightRed,
    Red,
    DarkRed,
    LightYellow,
    Yellow,
    DarkYellow,
    LightGreen,
    Green,
    DarkGreen,
    LightCyan,
    Cyan,
    DarkCyan,
    LightBlue,
    Blue,
    DarkBlue,
    LightMagenta,
    Magenta,
    DarkMagenta,
    White,
    Black,
}

impl Color {
    /// Every palette color, chromatic ones first in (hue, lightness) order
    pub const ALL: [Color; 20] = [
        Color::LightRed,
        Color::Red,
        Color::DarkRed,
        Color::LightYellow,
        Color::Yellow,
        Color::DarkYellow,
        Color::LightGreen,
        Color::Green,
        Color::DarkGreen,
        Color::LightCyan,
        Color::Cyan,
        Color::DarkCyan,
        Color::LightBlue,
        Color::Blue,
        Color::DarkBlue,
        Color::LightMagenta,
        Color::Magenta,
        Color::DarkMagenta,
        Color::White,
        Color::Black,
    ];

    /// Chromatic lattice indexed `[lightness][hue]`
    const LATTICE: [[Color; Hue::COUNT]; Lightness::COUNT] = [
        [
            Color::LightRed,
            Color::LightYellow,
            Color::LightGreen,
            Color::LightCyan,
            Color::LightBlue,
            Color::LightMagenta,
        ],
        [
            Color::Red,
            Color::Yellow,
            Color::Green,
            Color::Cyan,
            Color::Blue,
            Color::Magenta,
        ],
        [
            Color::DarkRed,
            Color::DarkYellow,
            Color::DarkGreen,
            Color::DarkCyan,
            Color::DarkBlue,
            Color::DarkMagenta,
        ],
    ];

    /// Chromatic color at a lattice coordinate
    #[inline]
    pub const fn chromatic(lightness: Lightness, hue: Hue) -> Self {
        Self::LATTICE[lightness.index()][hue.index()]
    }

    /// (lightness, hue) coordinate; `None` for White and Black
    pub const fn coordinates(self) -> Option<(Lightness, Hue)> {
        use Color::*;
        let coords = match self {
            LightRed => (Lightness::Light, Hue::Red),
            Red => (Lightness::Normal, Hue::Red),
            DarkRed => (Lightness::Dark, Hue::Red),
            LightYellow => (Lightness::Light, Hue::Yellow),
            Yellow => (Lightness::Normal, Hue::Yellow),
            DarkYellow => (Lightness::Dark, Hue::Yellow),
            LightGreen => (Lightness::Light, Hue::Green),
            Green => (Lightness::Normal, Hue::Green),
            DarkGreen => (Lightness::Dark, Hue::Green),
            LightCyan => (Lightness::Light, Hue::Cyan),
            Cyan => (Lightness::Normal, Hue::Cyan),
            DarkCyan => (Lightness::Dark, Hue::Cyan),
            LightBlue => (Lightness::Light, Hue::Blue),
            Blue => (Lightness::Normal, Hue::Blue),
            DarkBlue => (Lightness::Dark, Hue::Blue),
            LightMagenta => (Lightness::Light, Hue::Magenta),
            Magenta => (Lightness::Normal, Hue::Magenta),
            DarkMagenta => (Lightness::Dark, Hue::Magenta),
            White | Black => return None,
        };
        Some(coords)
    }

    #[inline]
    pub const fn hue(self) -> Option<Hue> {
        match self.coordinates() {
            Some((_, hue)) => Some(hue),
            None => None,
        }
    }

    #[inline]
    pub const fn lightness(self) -> Option<Lightness> {
        match self.coordinates() {
            Some((lightness, _)) => Some(lightness),
            None => None,
        }
    }

    /// True for the eighteen lattice colors
    #[inline]
    pub const fn is_chromatic(self) -> bool {
        !matches!(self, Color::White | Color::Black)
    }

    /// Canonical RGB code
    pub const fn rgb(self) -> (u8, u8, u8) {
        const HI: u8 = 0xFF;
        const MID: u8 = 0xC0;
        const LO: u8 = 0x00;

        let Some((lightness, hue)) = self.coordinates() else {
            return match self {
                Color::Black => (LO, LO, LO),
                _ => (HI, HI, HI),
            };
        };

        // (on, off) channel values per lightness
        let (on, off) = match lightness {
            Lightness::Light => (HI, MID),
            Lightness::Normal => (HI, LO),
            Lightness::Dark => (MID, LO),
        };

        match hue {
            Hue::Red => (on, off, off),
            Hue::Yellow => (on, on, off),
            Hue::Green => (off, on, off),
            Hue::Cyan => (off, on, on),
            Hue::Blue => (off, off, on),
            Hue::Magenta => (on, off, on),
        }
    }

    /// Exact palette lookup of an RGB code
    pub fn from_rgb(r: u8, g: u8, b: u8) -> ColorResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|color| color.rgb() == (r, g, b))
            .ok_or(ColorError::UnknownRgb { r, g, b })
    }

    /// `#rrggbb` form of [`Color::rgb`]
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// snake_case name, as used in grid files
    pub const fn name(self) -> &'static str {
        use Color::*;
        match self {
            LightRed => "light_red",
            Red => "red",
            DarkRed => "dark_red",
            LightYellow => "light_yellow",
            Yellow => "yellow",
            DarkYellow => "dark_yellow",
            LightGreen => "light_green",
            Green => "green",
            DarkGreen => "dark_green",
            LightCyan => "light_cyan",
            Cyan => "cyan",
            DarkCyan => "dark_cyan",
            LightBlue => "light_blue",
            Blue => "blue",
            DarkBlue => "dark_blue",
            LightMagenta => "light_magenta",
            Magenta => "magenta",
            DarkMagenta => "dark_magenta",
            White => "white",
            Black => "black",
        }
    }

    /// Uniformly random palette color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn parse_hex(digits: &str) -> Option<(u8, u8, u8)> {
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `light_red`, `LightRed`, `light-red` or `#ffc0c0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(digits) = trimmed.strip_prefix('#') {
            let (r, g, b) = Self::parse_hex(digits)
                .ok_or_else(|| ColorError::UnknownName(s.to_string()))?;
            return Self::from_rgb(r, g, b);
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|color| color.name().replace('_', "") == folded)
            .ok_or_else(|| ColorError::UnknownName(s.to_string()))
    }
}
