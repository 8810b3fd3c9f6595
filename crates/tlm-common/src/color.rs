//! Deterministic chart colors for fields.
//!
//! The hue is seeded from a SHA-256 digest of the field title and offset by
//! the golden ratio so titles that hash close together still spread apart.
//! Collisions are tolerated; only determinism is required.

use sha2::{Digest, Sha256};

/// Saturation used for field colors.
pub const FIELD_SATURATION: f64 = 0.9;

/// Lightness used for field colors.
pub const FIELD_LIGHTNESS: f64 = 0.4;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// CSS `hsl()` color string for a field title.
pub fn field_color(title: &[u8]) -> String {
    hsl_color(title, FIELD_SATURATION, FIELD_LIGHTNESS)
}

/// CSS `hsl()` color string for an arbitrary seed.
pub fn hsl_color(seed: &[u8], saturation: f64, lightness: f64) -> String {
    let digest = Sha256::digest(seed);
    let word = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);

    let hue = (word as f64 / u32::MAX as f64 + GOLDEN_RATIO).fract();

    format!(
        "hsl({}, {}%, {}%)",
        (hue * 360.0) as u32,
        (saturation * 100.0) as u32,
        (lightness * 100.0) as u32
    )
}
