/// RGB colour with `#rrggbb` string form
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Linear RGB triple, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` or the short `#rgb` form
    pub fn from_hex(input: &str) -> CoreResult<Self> {
        match all_consuming(parse_hex)(input.trim()) {
            Ok((_, (r, g, b))) => Ok(Self::from_rgb8(r, g, b)),
            Err(_) => Err(CoreError::InvalidColor(input.to_string())),
        }
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Component-wise product, used to tint a material by a light
    pub fn modulate(self, other: Color) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), |s| u8::from_str_radix(s, 16))(input)
}

fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

fn parse_hex(input: &str) -> IResult<&str, (u8, u8, u8)> {
    preceded(
        tag("#"),
        alt((
            tuple((hex_byte, hex_byte, hex_byte)),
            tuple((hex_nibble, hex_nibble, hex_nibble)),
        )),
    )(input)
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let color = Color::from_hex("#ffeded").unwrap();
        assert_eq!(color.to_rgb8(), (0xff, 0xed, 0xed));
        assert_eq!(color.to_hex(), "#ffeded");
    }

    #[test]
    fn test_parse_short_form() {
        let color = Color::from_hex("#0f8").unwrap();
        assert_eq!(color.to_rgb8(), (0x00, 0xff, 0x88));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["ffeded", "#ffed", "#ffedeg", "#ffededff", ""] {
            assert!(
                matches!(Color::from_hex(bad), Err(CoreError::InvalidColor(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let color: Color = serde_json::from_str("\"#ffff00\"").unwrap();
        assert_eq!(color, Color::new(1.0, 1.0, 0.0));
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#ffff00\"");
    }
}
