use std::{fmt::Display, str::FromStr};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color: {0:?}")]
pub struct ParseColorError(pub String);

/// Straight (non premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, the same without the leading
    /// `#` (as GTFS writes `route_color`), or a basic color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let parsed = match value.strip_prefix('#') {
            Some(hex) => Self::from_hex(hex),
            None => Self::from_name(value).or_else(|| Self::from_hex(value)),
        };
        parsed.ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba> for tiny_skia::Color {
    fn from(value: Rgba) -> Self {
        tiny_skia::Color::from_rgba8(value.r, value.g, value.b, value.a)
    }
}

const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::rgb(0, 0, 0)),
    ("white", Rgba::rgb(255, 255, 255)),
    ("red", Rgba::rgb(255, 0, 0)),
    ("green", Rgba::rgb(0, 128, 0)),
    ("lime", Rgba::rgb(0, 255, 0)),
    ("blue", Rgba::rgb(0, 0, 255)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("aqua", Rgba::rgb(0, 255, 255)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("fuchsia", Rgba::rgb(255, 0, 255)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("purple", Rgba::rgb(128, 0, 128)),
    ("pink", Rgba::rgb(255, 192, 203)),
    ("brown", Rgba::rgb(165, 42, 42)),
    ("gray", Rgba::rgb(128, 128, 128)),
    ("grey", Rgba::rgb(128, 128, 128)),
    ("silver", Rgba::rgb(192, 192, 192)),
    ("maroon", Rgba::rgb(128, 0, 0)),
    ("olive", Rgba::rgb(128, 128, 0)),
    ("navy", Rgba::rgb(0, 0, 128)),
    ("teal", Rgba::rgb(0, 128, 128)),
    ("transparent", Rgba::TRANSPARENT),
];

#[test]
fn parse_hex_test() {
    assert_eq!("#ff0000".parse::<Rgba>().unwrap(), Rgba::RED);
    assert_eq!("00FF00".parse::<Rgba>().unwrap(), Rgba::rgb(0, 255, 0));
    assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::rgb(255, 255, 255));
    assert_eq!(
        "#11223380".parse::<Rgba>().unwrap(),
        Rgba::new(0x11, 0x22, 0x33, 0x80)
    );
}

#[test]
fn parse_name_test() {
    assert_eq!("Red".parse::<Rgba>().unwrap(), Rgba::RED);
    assert_eq!(" navy ".parse::<Rgba>().unwrap(), Rgba::rgb(0, 0, 128));
    // "add" is valid hex, not a name
    assert_eq!("add".parse::<Rgba>().unwrap(), Rgba::rgb(0xaa, 0xdd, 0xdd));
}

#[test]
fn parse_invalid_test() {
    assert!("".parse::<Rgba>().is_err());
    assert!("#12345".parse::<Rgba>().is_err());
    assert!("#gg0000".parse::<Rgba>().is_err());
    assert!("notacolor".parse::<Rgba>().is_err());
    assert!("#ÿÿÿ".parse::<Rgba>().is_err());
    assert!("#+f+f+f".parse::<Rgba>().is_err());
}

#[test]
fn display_test() {
    assert_eq!(Rgba::RED.to_string(), "#ff0000");
    assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
}
