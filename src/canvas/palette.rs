use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colors handed out to players, in assignment order
pub const PALETTE: [&str; 8] = [
    "#FF0000", // Red
    "#00FF00", // Green
    "#0000FF", // Blue
    "#FFFF00", // Yellow
    "#FF00FF", // Magenta
    "#00FFFF", // Cyan
    "#FFA500", // Orange
    "#800080", // Purple
];

/// A `#RRGGBB` color string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the hex digits into RGB components
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }

        let value = u32::from_str_radix(hex, 16).ok()?;
        Some([(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }

    pub fn is_palette(&self) -> bool {
        PALETTE.contains(&self.0.as_str())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the first palette color nobody holds, or a random off-palette one
/// when every palette color is taken.
pub fn assign_color<'a>(in_use: impl IntoIterator<Item = &'a Color>) -> Color {
    let in_use: Vec<&Color> = in_use.into_iter().collect();

    PALETTE
        .iter()
        .map(|hex| Color::new(*hex))
        .find(|color| !in_use.contains(&color))
        .unwrap_or_else(|| random_color(&in_use))
}

fn random_color(in_use: &[&Color]) -> Color {
    let mut rng = rand::thread_rng();
    loop {
        let color = Color::new(format!("#{:06X}", rng.gen_range(0..=0xFF_FFFFu32)));
        if !color.is_palette() && !in_use.contains(&&color) {
            return color;
        }
    }
}
