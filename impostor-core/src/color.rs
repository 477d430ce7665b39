use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Solid card color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("invalid color {value:?}"))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color {value:?}: {e}"))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

const DARK_MAX: u8 = 150;
const BRIGHT_MIN: u8 = 200;

/// Generates a saturated color that keeps white text readable.
///
/// All channels start dark; exactly one, chosen uniformly, is pushed bright.
pub fn generate_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let mut channels = [
        rng.gen_range(0..=DARK_MAX),
        rng.gen_range(0..=DARK_MAX),
        rng.gen_range(0..=DARK_MAX),
    ];
    let bright = rng.gen_range(0..channels.len());
    channels[bright] = rng.gen_range(BRIGHT_MIN..=u8::MAX);

    let [r, g, b] = channels;
    Color { r, g, b }
}
