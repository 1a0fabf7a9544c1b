// THEORY:
// The style mapper collapses any sampled color onto the seven-entry Suprematist
// palette. It is a pure total function of its RGB input with no hidden state.
//
// Rules, in order (first match wins):
// 1.  brightness (0.299R + 0.587G + 0.114B) below 50 -> black
// 2.  brightness above 200 -> white
// 3.  channel spread (max - min) below 30 -> gray
// 4.  a strictly dominant red, green or blue channel -> red, green or blue
// 5.  anything else -> orange
//
// All comparisons in rule 4 are strict. When the two strongest channels tie, no
// channel dominates and the color falls through to orange. This mirrors the
// behavior the palette was tuned with and is kept as is.

use crate::core_modules::color_quantizer::ColorSwatch;
use crate::core_modules::pixel::pixel::{Channel, Pixel};
use crate::core_modules::shape::{ClassifiedShape, GeneratedShape};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DARK_BRIGHTNESS: f64 = 50.0;
pub const LIGHT_BRIGHTNESS: f64 = 200.0;
pub const GRAY_SPREAD: Channel = 30;

/// Style mapper output: the color is one of the seven stylized entries.
pub type StylizedShape = GeneratedShape<SuprematistColor>;

/// A `#rrggbb` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl HexColor {
    pub const fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
        Self { red, green, blue }
    }

    pub fn as_pixel(&self) -> Pixel {
        Pixel::opaque(self.red, self.green, self.blue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a #rrggbb color")]
pub struct HexColorParseError(pub String);

impl FromStr for HexColor {
    type Err = HexColorParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || HexColorParseError(text.to_string());
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The fixed stylized palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "HexColor", try_from = "HexColor")]
pub enum SuprematistColor {
    Black,
    White,
    Gray,
    Red,
    Green,
    Blue,
    Orange,
}

impl SuprematistColor {
    pub const ALL: [SuprematistColor; 7] = [
        SuprematistColor::Black,
        SuprematistColor::White,
        SuprematistColor::Gray,
        SuprematistColor::Red,
        SuprematistColor::Green,
        SuprematistColor::Blue,
        SuprematistColor::Orange,
    ];

    pub const fn hex(&self) -> HexColor {
        match self {
            SuprematistColor::Black => HexColor::rgb(0x00, 0x00, 0x00),
            SuprematistColor::White => HexColor::rgb(0xff, 0xff, 0xff),
            SuprematistColor::Gray => HexColor::rgb(0x66, 0x66, 0x66),
            SuprematistColor::Red => HexColor::rgb(0xff, 0x00, 0x00),
            SuprematistColor::Green => HexColor::rgb(0x00, 0xaa, 0x00),
            SuprematistColor::Blue => HexColor::rgb(0x00, 0x66, 0xcc),
            SuprematistColor::Orange => HexColor::rgb(0xcc, 0x66, 0x00),
        }
    }
}

impl From<SuprematistColor> for HexColor {
    fn from(color: SuprematistColor) -> Self {
        color.hex()
    }
}

impl TryFrom<HexColor> for SuprematistColor {
    type Error = String;

    fn try_from(hex: HexColor) -> Result<Self, Self::Error> {
        SuprematistColor::ALL
            .into_iter()
            .find(|color| color.hex() == hex)
            .ok_or_else(|| format!("{} is not in the stylized palette", hex))
    }
}

impl fmt::Display for SuprematistColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hex().fmt(f)
    }
}

/// Maps one raw RGB triple onto the stylized palette.
pub fn suprematist_color_mapping(red: Channel, green: Channel, blue: Channel) -> SuprematistColor {
    let pixel = Pixel::opaque(red, green, blue);
    let brightness = pixel.luminance();

    if brightness < DARK_BRIGHTNESS {
        SuprematistColor::Black
    } else if brightness > LIGHT_BRIGHTNESS {
        SuprematistColor::White
    } else if pixel.chroma() < GRAY_SPREAD {
        SuprematistColor::Gray
    } else if red > green && red > blue {
        SuprematistColor::Red
    } else if green > red && green > blue {
        SuprematistColor::Green
    } else if blue > red && blue > green {
        SuprematistColor::Blue
    } else {
        SuprematistColor::Orange
    }
}

pub fn map_swatch(swatch: &ColorSwatch) -> SuprematistColor {
    suprematist_color_mapping(swatch.red, swatch.green, swatch.blue)
}

pub fn stylize_shape(shape: ClassifiedShape) -> StylizedShape {
    shape.map_color(|swatch| map_swatch(&swatch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_extremes_win_first() {
        assert_eq!(suprematist_color_mapping(0, 0, 0), SuprematistColor::Black);
        // Strong blue but dark overall: brightness 29.07.
        assert_eq!(suprematist_color_mapping(0, 0, 255), SuprematistColor::Black);
        assert_eq!(suprematist_color_mapping(224, 224, 224), SuprematistColor::White);
    }

    #[test]
    fn low_spread_is_gray() {
        assert_eq!(suprematist_color_mapping(120, 130, 110), SuprematistColor::Gray);
        assert_eq!(suprematist_color_mapping(120, 150, 110), SuprematistColor::Green);
    }

    #[test]
    fn dominant_channel_picks_the_hue() {
        assert_eq!(suprematist_color_mapping(224, 0, 0), SuprematistColor::Red);
        assert_eq!(suprematist_color_mapping(32, 160, 64), SuprematistColor::Green);
        assert_eq!(suprematist_color_mapping(64, 96, 224), SuprematistColor::Blue);
    }

    #[test]
    fn tied_leading_channels_fall_through_to_orange() {
        assert_eq!(suprematist_color_mapping(200, 200, 0), SuprematistColor::Orange);
        assert_eq!(suprematist_color_mapping(160, 64, 160), SuprematistColor::Orange);
    }

    #[test]
    fn mapping_is_a_pure_function() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let first = suprematist_color_mapping(r, g, b);
                    assert_eq!(first, suprematist_color_mapping(r, g, b));
                    assert!(SuprematistColor::ALL.contains(&first));
                }
            }
        }
    }

    #[test]
    fn hex_colors_parse_and_print() {
        let color: HexColor = "#CC6600".parse().unwrap();
        assert_eq!(color, SuprematistColor::Orange.hex());
        assert_eq!(color.to_string(), "#cc6600");
        assert!("cc6600".parse::<HexColor>().is_err());
        assert!("#cc66".parse::<HexColor>().is_err());
        assert!("#gg0000".parse::<HexColor>().is_err());
    }

    #[test]
    fn stylized_colors_serialize_as_hex() {
        let json = serde_json::to_string(&SuprematistColor::Blue).unwrap();
        assert_eq!(json, "\"#0066cc\"");
        let back: SuprematistColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SuprematistColor::Blue);
        assert!(serde_json::from_str::<SuprematistColor>("\"#123456\"").is_err());
    }
}
