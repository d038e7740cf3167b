use serde::{Deserialize, Serialize};

/// Opaque 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb8(pub [u8; 3]);

/// 8-bit color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba8(pub [u8; 4]);

impl Rgb8 {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0]);

    pub fn with_alpha(self, a: u8) -> Rgba8 {
        let [r, g, b] = self.0;
        Rgba8([r, g, b, a])
    }
}

impl Rgba8 {
    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Hex(String),
    Arr(Vec<u8>),
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self([*r, *g, *b, 255])),
                [r, g, b, a] => Ok(Self([*r, *g, *b, *a])),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let Rgba8([r, g, b, a]) = Rgba8::deserialize(deserializer)?;
        if a != 255 {
            return Err(serde::de::Error::custom(
                "this color is opaque; alpha is not accepted here",
            ));
        }
        Ok(Self([r, g, b]))
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    match s.len() {
        6 => Ok(Rgba8([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ])),
        8 => Ok(Rgba8([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ])),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}
