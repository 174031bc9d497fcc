//! Embed color palette

use serde::Serialize;

use super::AnnouncementError;

/// RGB color of an embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmbedColor(pub u32);

/// Palette tokens accepted on recruitment posts
const PALETTE: &[(&str, u32)] = &[
    ("default", 0x000000),
    ("red", 0xE74C3C),
    ("blue", 0x3498DB),
    ("green", 0x2ECC71),
    ("gold", 0xF1C40F),
    ("orange", 0xE67E22),
    ("purple", 0x9B59B6),
    ("white", 0xFFFFFF),
    // 0 means "no color" to the platform
    ("black", 0x010101),
];

impl EmbedColor {
    pub const DEFAULT: EmbedColor = EmbedColor(0x000000);
    pub const BLUE: EmbedColor = EmbedColor(0x3498DB);
    pub const GREEN: EmbedColor = EmbedColor(0x2ECC71);

    /// Resolve a palette token; absent or unknown tokens give the default.
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token.map(|t| t.trim().to_lowercase()) else {
            return Self::DEFAULT;
        };

        PALETTE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, rgb)| EmbedColor(*rgb))
            .unwrap_or(Self::DEFAULT)
    }

    /// Whether the token names a palette entry
    pub fn is_palette_token(token: &str) -> bool {
        let token = token.trim().to_lowercase();
        PALETTE.iter().any(|(name, _)| *name == token)
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn parse_hex(input: &str) -> Result<Self, AnnouncementError> {
        let digits = input.trim().trim_start_matches('#');
        if digits.is_empty() || digits.len() > 6 {
            return Err(AnnouncementError::InvalidColor(input.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(EmbedColor)
            .map_err(|_| AnnouncementError::InvalidColor(input.to_string()))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for EmbedColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}
